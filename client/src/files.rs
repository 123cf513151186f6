// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use js_sys::Uint8Array;
use nups_portal_shared::upload::UploadFile;
use std::fmt;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, Url};

pub struct FileReadError(JsValue);

impl fmt::Display for FileReadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Failed to read the chosen file: {:?}", self.0)
	}
}

/// Reads a file the user chose into memory
pub async fn read_file(file: &File) -> Result<UploadFile, FileReadError> {
	let buffer = JsFuture::from(file.array_buffer()).await.map_err(FileReadError)?;
	let bytes = Uint8Array::new(&buffer).to_vec();
	Ok(UploadFile::new(file.name(), file.type_(), bytes))
}

/// A temporary URL showing a file, revoked when dropped
pub struct ObjectUrl(String);

impl ObjectUrl {
	pub fn for_file(file: &File) -> Option<Self> {
		match Url::create_object_url_with_blob(file) {
			Ok(url) => Some(Self(url)),
			Err(error) => {
				log::warn!("Couldn't create a preview for {}: {:?}", file.name(), error);
				None
			}
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Drop for ObjectUrl {
	fn drop(&mut self) {
		if let Err(error) = Url::revoke_object_url(&self.0) {
			log::debug!("Failed to revoke object URL: {:?}", error);
		}
	}
}
