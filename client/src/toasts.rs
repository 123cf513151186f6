// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use sycamore::prelude::*;
use web_sys::Event as WebEvent;

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastKind {
	Success,
	Error,
	Info,
}

impl ToastKind {
	fn class(&self) -> &'static str {
		match self {
			Self::Success => "toast toast_success",
			Self::Error => "toast toast_error",
			Self::Info => "toast toast_info",
		}
	}

	fn default_duration(&self) -> Duration {
		match self {
			Self::Success => Duration::from_secs(2),
			Self::Error => Duration::from_secs(5),
			Self::Info => Duration::from_secs(3),
		}
	}
}

/// A message shown briefly over the page
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastData {
	pub id: u64,
	pub kind: ToastKind,
	message: String,
	details: Option<String>,
	pub duration: Duration,
}

impl ToastData {
	pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
		Self {
			id: NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed),
			kind,
			message: message.into(),
			details: None,
			duration: kind.default_duration(),
		}
	}

	pub fn success(message: impl Into<String>) -> Self {
		Self::new(ToastKind::Success, message)
	}

	pub fn info(message: impl Into<String>) -> Self {
		Self::new(ToastKind::Info, message)
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self::new(ToastKind::Error, message)
	}

	/// Creates an error toast that also shows the error that caused it
	pub fn error_with_details(message: impl Into<String>, error: impl Display) -> Self {
		let mut toast = Self::error(message);
		toast.details = Some(format!("{error}"));
		toast
	}

	pub fn with_duration(mut self, duration: Duration) -> Self {
		self.duration = duration;
		self
	}

	pub fn to_view<'a, G: Html>(&self, ctx: Scope<'a>, dismiss_handler: impl Fn(WebEvent) + 'a) -> View<G> {
		let class = self.kind.class();
		let message = self.message.clone();
		let details = self.details.clone();
		view! {
			ctx,
			li(class=class, role="status") {
				span(class="toast_text") { (message) }
				(if let Some(details) = details.clone() {
					view! {
						ctx,
						span(class="toast_details") { (details) }
					}
				} else {
					view! { ctx, }
				})
				button(type="button", class="toast_dismiss", title="Dismiss", on:click=dismiss_handler) { "×" }
			}
		}
	}
}

/// Shows a toast on the page
pub fn show_toast(ctx: Scope<'_>, toast: ToastData) {
	let toasts: &Signal<Vec<ToastData>> = use_context(ctx);
	toasts.modify().push(toast);
}

pub fn dismiss_toast(ctx: Scope<'_>, id: u64) {
	let toasts: &Signal<Vec<ToastData>> = use_context(ctx);
	toasts.modify().retain(|toast| toast.id != id);
}
