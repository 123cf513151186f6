// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nups_portal_shared::config::PortalConfig;
use sycamore::futures::spawn_local;
use sycamore::prelude::*;

mod app;
mod components;
mod config;
mod dom;
mod download;
mod files;
mod page_utils;
mod pages;
mod session;
mod storage;
mod toasts;
mod transport;
use app::App;
use config::load_config;

fn main() {
	console_error_panic_hook::set_once();

	spawn_local(async {
		let (config, config_error) = match load_config().await {
			Ok(config) => (config, None),
			Err(error) => (PortalConfig::default(), Some(error)),
		};

		wasm_logger::init(wasm_logger::Config::new(config.log_level));
		if let Some(error) = config_error {
			log::warn!("Using the default configuration: {}", error);
		}
		log::debug!("Using API at {}", config.api_base_url);

		sycamore::render(|ctx| {
			view! {
				ctx,
				App(config=config)
			}
		});
	});
}
