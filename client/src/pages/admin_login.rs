// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::page_utils::set_page_title;
use crate::session::{is_logged_in, PortalApi};
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use sycamore_router::navigate;
use web_sys::Event as WebEvent;

const DASHBOARD_PATH: &str = "/admin";

#[component]
pub fn AdminLoginView<G: Html>(ctx: Scope<'_>) -> View<G> {
	set_page_title("Admin Login");

	if is_logged_in(ctx) {
		spawn_local_scoped(ctx, async {
			navigate(DASHBOARD_PATH);
		});
		return view! { ctx, };
	}

	let username_signal = create_signal(ctx, String::new());
	let password_signal = create_signal(ctx, String::new());
	let show_password = create_signal(ctx, false);
	let logging_in = create_signal(ctx, false);
	let error_signal: &Signal<Option<&'static str>> = create_signal(ctx, None);

	let password_input_type = create_memo(ctx, || if *show_password.get() { "text" } else { "password" });
	let toggle_label = create_memo(ctx, || if *show_password.get() { "Hide" } else { "Show" });
	let button_label = create_memo(ctx, || if *logging_in.get() { "Logging in..." } else { "Login" });

	let form_submission_handler = move |event: WebEvent| {
		event.prevent_default();
		if *logging_in.get() {
			return;
		}

		let username = username_signal.get().trim().to_string();
		let password = (*password_signal.get()).clone();
		if username.is_empty() || password.is_empty() {
			error_signal.set(Some("Enter your username and password"));
			return;
		}

		error_signal.set(None);
		logging_in.set(true);
		spawn_local_scoped(ctx, async move {
			let api: &PortalApi = use_context(ctx);
			let result = api.login(&username, &password).await;
			logging_in.set(false);
			match result {
				Ok(true) => navigate(DASHBOARD_PATH),
				Ok(false) => error_signal.set(Some("Invalid username or password")),
				Err(error) => {
					log::error!("Login request failed: {}", error);
					error_signal.set(Some("Invalid username or password"));
				}
			}
		});
	};

	view! {
		ctx,
		div(class="admin_login") {
			form(class="admin_login_form", on:submit=form_submission_handler) {
				h1 { "Admin Login" }
				(if let Some(error) = *error_signal.get() {
					view! { ctx, p(class="admin_login_error") { (error) } }
				} else {
					view! { ctx, }
				})
				label {
					"Username"
					input(
						name="username",
						autocomplete="username",
						bind:value=username_signal,
						disabled=*logging_in.get()
					)
				}
				label {
					"Password"
					div(class="password_field") {
						input(
							name="password",
							type=password_input_type.get(),
							autocomplete="current-password",
							bind:value=password_signal,
							disabled=*logging_in.get()
						)
						button(
							type="button",
							class="password_toggle",
							disabled=*logging_in.get(),
							on:click=move |_| show_password.set(!*show_password.get())
						) {
							(toggle_label.get())
						}
					}
				}
				button(type="submit", disabled=*logging_in.get()) { (button_label.get()) }
			}
		}
	}
}
