// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// A file chosen by the user, held in memory until it's uploaded
#[derive(Clone, Eq, PartialEq)]
pub struct UploadFile {
	pub file_name: String,
	pub mime_type: String,
	pub bytes: Vec<u8>,
}

impl UploadFile {
	pub fn new(file_name: String, mime_type: String, bytes: Vec<u8>) -> Self {
		Self {
			file_name,
			mime_type,
			bytes,
		}
	}

	pub fn size(&self) -> usize {
		self.bytes.len()
	}
}

// The contents are left out; they're frequently several megabytes.
impl fmt::Debug for UploadFile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UploadFile")
			.field("file_name", &self.file_name)
			.field("mime_type", &self.mime_type)
			.field("size", &self.bytes.len())
			.finish()
	}
}
