// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Report;
use nups_portal_shared::config::{parse_config, PortalConfig, CONFIG_FILE_NAME};
use std::fmt;
use web_sys::Url;

pub enum ConfigLoadError {
	Fetch(gloo_net::Error),
	Status(u16),
	Parse(Report),
}

impl fmt::Display for ConfigLoadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fetch(error) => write!(f, "Failed to fetch {}: {}", CONFIG_FILE_NAME, error),
			Self::Status(status) => write!(f, "Fetching {} returned status {}", CONFIG_FILE_NAME, status),
			Self::Parse(error) => write!(f, "Failed to parse {}: {:?}", CONFIG_FILE_NAME, error),
		}
	}
}

impl From<gloo_net::Error> for ConfigLoadError {
	fn from(error: gloo_net::Error) -> Self {
		Self::Fetch(error)
	}
}

/// Gets the URL of the config file, which is served next to the page.
///
/// # Panics
///
/// This function panics when the browser context (window, location, URL, etc.) is inaccessible.
fn config_endpoint() -> String {
	let js_location = web_sys::window()
		.expect("Failed to get browser window context")
		.location();
	let web_endpoint = js_location.href().expect("Failed to get current address");
	let url = Url::new(&web_endpoint).expect("Failed to generate URL instance");
	url.set_search("");
	url.set_hash("");
	url.set_pathname(&format!("/{}", CONFIG_FILE_NAME));
	url.to_string().into()
}

/// Fetches and parses the portal's config file
pub async fn load_config() -> Result<PortalConfig, ConfigLoadError> {
	let response = gloo_net::http::Request::get(&config_endpoint()).send().await?;
	if !response.ok() {
		return Err(ConfigLoadError::Status(response.status()));
	}
	let contents = response.text().await?;
	parse_config(&contents).map_err(ConfigLoadError::Parse)
}
