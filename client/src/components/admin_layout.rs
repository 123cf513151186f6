// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::dom::alert;
use crate::download::save_bytes;
use crate::session::{log_out, PortalApi, LOGIN_PATH};
use nups_portal_shared::api::ApiError;
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use sycamore_router::navigate;

#[derive(Prop)]
pub struct AdminLayoutProps<'a, G: Html> {
	children: Children<'a, G>,
}

/// Wraps admin pages with the navigation sidebar
#[component]
pub fn AdminLayout<'a, G: Html>(ctx: Scope<'a>, props: AdminLayoutProps<'a, G>) -> View<G> {
	let children = props.children.call(ctx);
	let sidebar_open = create_signal(ctx, false);
	let backing_up = create_signal(ctx, false);

	let sidebar_class = create_memo(ctx, || {
		if *sidebar_open.get() {
			"admin_sidebar admin_sidebar_open"
		} else {
			"admin_sidebar"
		}
	});
	let backup_title = create_memo(ctx, || {
		if *backing_up.get() {
			"Creating backup..."
		} else {
			"Download Database Backup"
		}
	});
	let backup_label = create_memo(ctx, || if *backing_up.get() { "Backing up..." } else { "Backup" });

	let backup_handler = move |_| {
		if *backing_up.get() {
			return;
		}
		backing_up.set(true);
		spawn_local_scoped(ctx, async move {
			let api: &PortalApi = use_context(ctx);
			match api.download_backup().await {
				Ok(backup) => {
					if let Err(error) = save_bytes(&backup.file_name, &backup.content_type, &backup.bytes) {
						log::error!("Failed to save backup: {}", error);
						alert("Failed to create backup. Please try again.");
					}
				}
				// The page is already on its way back to the login page.
				Err(ApiError::SessionExpired) => (),
				Err(error) => {
					log::error!("Backup failed: {}", error);
					alert("Failed to create backup. Please try again.");
				}
			}
			backing_up.set(false);
		});
	};

	let logout_handler = move |_| {
		log_out(ctx);
		navigate(LOGIN_PATH);
	};

	view! {
		ctx,
		div(class="admin_layout") {
			aside(class=sidebar_class.get()) {
				nav(class="admin_nav") {
					a(href="/admin", title="Dashboard", on:click=move |_| sidebar_open.set(false)) {
						span(class="admin_nav_label") { "Dashboard" }
					}
					a(href="/admin/members", title="Members", on:click=move |_| sidebar_open.set(false)) {
						span(class="admin_nav_label") { "Members" }
					}
				}
				button(
					type="button",
					class="admin_backup",
					title=backup_title.get(),
					disabled=*backing_up.get(),
					on:click=backup_handler
				) {
					span(class="admin_nav_label") { (backup_label.get()) }
				}
				button(type="button", class="admin_logout", title="Logout", on:click=logout_handler) {
					span(class="admin_nav_label") { "Logout" }
				}
			}
			main(class="admin_main") {
				button(
					type="button",
					class="admin_sidebar_toggle",
					title="Toggle menu",
					on:click=move |_| sidebar_open.set(!*sidebar_open.get())
				) {
					(if *sidebar_open.get() { "‹" } else { "›" })
				}
				(children)
			}
		}
	}
}
