// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use sycamore::prelude::*;

#[derive(Prop)]
pub struct ErrorMessageProps {
	message: &'static str,
	details: Option<String>,
}

/// A page-level error shown in place of content that couldn't load
#[component]
pub fn ErrorMessage<G: Html>(ctx: Scope, props: ErrorMessageProps) -> View<G> {
	let message = props.message;
	if let Some(details) = props.details {
		return view! {
			ctx,
			div(class="page_error") {
				(message)
				br {}
				span(class="page_error_details") { (details) }
			}
		};
	}

	view! {
		ctx,
		div(class="page_error") { (message) }
	}
}
