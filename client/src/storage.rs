// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nups_portal_shared::session::TokenStore;
use web_sys::Storage;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Keeps the admin's tokens in the browser's local storage so the session survives page reloads
#[derive(Default)]
pub struct BrowserTokenStore;

impl BrowserTokenStore {
	fn storage(&self) -> Option<Storage> {
		match web_sys::window().map(|window| window.local_storage()) {
			Some(Ok(Some(storage))) => Some(storage),
			_ => {
				log::error!("Local storage is unavailable; the admin session can't be kept");
				None
			}
		}
	}

	fn read(&self, key: &str) -> Option<String> {
		let storage = self.storage()?;
		match storage.get_item(key) {
			Ok(value) => value.filter(|value| !value.is_empty()),
			Err(error) => {
				log::error!("Failed to read {} from local storage: {:?}", key, error);
				None
			}
		}
	}

	fn write(&self, key: &str, value: &str) {
		if let Some(storage) = self.storage() {
			if let Err(error) = storage.set_item(key, value) {
				log::error!("Failed to store {} in local storage: {:?}", key, error);
			}
		}
	}
}

impl TokenStore for BrowserTokenStore {
	fn access_token(&self) -> Option<String> {
		self.read(ACCESS_TOKEN_KEY)
	}

	fn refresh_token(&self) -> Option<String> {
		self.read(REFRESH_TOKEN_KEY)
	}

	fn store_access_token(&self, access: &str) {
		self.write(ACCESS_TOKEN_KEY, access);
	}

	fn store_refresh_token(&self, refresh: &str) {
		self.write(REFRESH_TOKEN_KEY, refresh);
	}

	fn clear(&self) {
		if let Some(storage) = self.storage() {
			for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
				if let Err(error) = storage.remove_item(key) {
					log::error!("Failed to remove {} from local storage: {:?}", key, error);
				}
			}
		}
	}
}
