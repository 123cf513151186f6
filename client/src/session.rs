// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::storage::BrowserTokenStore;
use crate::transport::BrowserTransport;
use nups_portal_shared::config::PortalConfig;
use nups_portal_shared::session::ApiClient;
use sycamore::prelude::*;

pub const LOGIN_PATH: &str = "/admin-login";

pub type PortalApi = ApiClient<BrowserTransport, BrowserTokenStore>;

/// Creates the API client. When the admin session can't be renewed, the page is sent back to the login page.
pub fn build_api(config: &PortalConfig) -> PortalApi {
	ApiClient::new(config, BrowserTransport, BrowserTokenStore).on_session_expired(|| {
		log::info!("Admin session expired; returning to login");
		if let Some(window) = web_sys::window() {
			if let Err(error) = window.location().set_href(LOGIN_PATH) {
				log::error!("Failed to return to the login page: {:?}", error);
			}
		}
	})
}

/// Whether an admin is logged in, judged by the stored tokens
pub fn is_logged_in(ctx: Scope<'_>) -> bool {
	let api: &PortalApi = use_context(ctx);
	api.is_authenticated()
}

pub fn log_out(ctx: Scope<'_>) {
	let api: &PortalApi = use_context(ctx);
	api.logout();
	log::info!("Logged out");
}
