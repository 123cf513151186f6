// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub const DEFAULT_BACKUP_FILE_NAME: &str = "nups_backup.sql";

/// A database dump downloaded from the backend
#[derive(Debug)]
pub struct BackupFile {
	pub file_name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

/// Pulls the file name out of a `Content-Disposition` header value, accepting both quoted and bare names.
pub fn file_name_from_content_disposition(header: &str) -> Option<String> {
	header
		.split(';')
		.map(|part| part.trim())
		.find_map(|part| {
			let (key, value) = part.split_once('=')?;
			if key.trim().eq_ignore_ascii_case("filename") {
				Some(value.trim())
			} else {
				None
			}
		})
		.map(|value| value.trim_matches('"'))
		.filter(|value| !value.is_empty())
		.map(|value| value.to_string())
}
