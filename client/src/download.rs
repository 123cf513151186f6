// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::transport::bytes_blob;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, Url};

/// Saves bytes to the user's downloads through a temporary link
pub fn save_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), String> {
	let blob = bytes_blob(bytes, mime_type).map_err(|error| error.to_string())?;
	let url = Url::create_object_url_with_blob(&blob).map_err(|error| format!("{:?}", error))?;

	let result = click_download_link(&url, file_name);
	if let Err(error) = Url::revoke_object_url(&url) {
		log::debug!("Failed to revoke download URL: {:?}", error);
	}
	result
}

fn click_download_link(url: &str, file_name: &str) -> Result<(), String> {
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| String::from("The page document is unavailable"))?;
	let body = document
		.body()
		.ok_or_else(|| String::from("The page has no body"))?;
	let link: HtmlAnchorElement = document
		.create_element("a")
		.map_err(|error| format!("{:?}", error))?
		.dyn_into()
		.map_err(|_| String::from("Created element wasn't a link"))?;

	link.set_href(url);
	link.set_download(file_name);
	body.append_child(&link).map_err(|error| format!("{:?}", error))?;
	link.click();
	link.remove();
	log::info!("Saved {}", file_name);
	Ok(())
}
