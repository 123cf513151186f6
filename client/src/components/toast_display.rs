// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::toasts::{dismiss_toast, ToastData};
use crate::transport::duration_millis;
use gloo_timers::future::TimeoutFuture;
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use web_sys::Event as WebEvent;

#[component]
pub fn ToastDisplay<G: Html>(ctx: Scope<'_>) -> View<G> {
	let toasts: &Signal<Vec<ToastData>> = use_context(ctx);
	let toast_list = create_memo(ctx, || (*toasts.get()).clone());

	view! {
		ctx,
		ul(id="toasts") {
			Keyed(
				iterable=toast_list,
				key=|toast| toast.id,
				view=|ctx, toast| {
					let id = toast.id;
					let duration = toast.duration;
					// The timer belongs to the toast's scope, so dismissing early also stops it.
					spawn_local_scoped(ctx, async move {
						TimeoutFuture::new(duration_millis(duration)).await;
						dismiss_toast(ctx, id);
					});
					toast.to_view(ctx, move |_event: WebEvent| dismiss_toast(ctx, id))
				}
			)
		}
	}
}
