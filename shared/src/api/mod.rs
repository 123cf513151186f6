// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::session::http::TransportError;
use std::error::Error;
use std::fmt;

pub mod backup;
pub mod endpoints;
pub mod lookups;
pub mod students;
pub mod tokens;

pub const PROGRAMS_PATH: &str = "/programs/";
pub const HALLS_PATH: &str = "/halls/";
pub const WINGS_PATH: &str = "/wings/";
pub const STUDENTS_PATH: &str = "/students/";
pub const TOKEN_PATH: &str = "/token/";
pub const TOKEN_REFRESH_PATH: &str = "/token/refresh/";
pub const BACKUP_PATH: &str = "/backup/";

/// Path of a single student profile
pub fn student_path(id: u64) -> String {
	format!("{}{}/", STUDENTS_PATH, id)
}

/// A single field error reported by the backend as (field name, message)
pub type FieldError = (String, String);

#[derive(Debug)]
pub enum ApiError {
	Transport(TransportError),
	Status { status: u16, body: String },
	SessionExpired,
	Rejected(Vec<FieldError>),
	Decode(serde_json::Error),
	Encode(serde_json::Error),
}

impl ApiError {
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Transport(error) => write!(f, "Failed to reach the server: {}", error),
			Self::Status { status, .. } => write!(f, "The server responded with status {}", status),
			Self::SessionExpired => write!(f, "The admin session has expired"),
			Self::Rejected(errors) => match errors.first() {
				Some((field, message)) => write!(f, "The server rejected the submission ({}: {})", field, message),
				None => write!(f, "The server rejected the submission"),
			},
			Self::Decode(error) => write!(f, "An invalid response was received: {}", error),
			Self::Encode(error) => write!(f, "Failed to encode the request: {}", error),
		}
	}
}

impl Error for ApiError {}

impl From<TransportError> for ApiError {
	fn from(error: TransportError) -> Self {
		Self::Transport(error)
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(error: serde_json::Error) -> Self {
		Self::Decode(error)
	}
}

/// Flattens a validation error body (`{"field": ["message", ...], "nested": {"field": [...]}}`) into one entry per
/// field, keeping the first message of each. Nested objects produce dotted names (`emergency_contact_data.phone`).
/// Returns `None` if the body isn't a JSON object.
pub fn parse_field_errors(body: &str) -> Option<Vec<FieldError>> {
	let value: serde_json::Value = serde_json::from_str(body).ok()?;
	let object = value.as_object()?;
	let mut errors = Vec::new();
	collect_field_errors("", object, &mut errors);
	Some(errors)
}

fn collect_field_errors(
	prefix: &str,
	object: &serde_json::Map<String, serde_json::Value>,
	errors: &mut Vec<FieldError>,
) {
	for (key, value) in object.iter() {
		let field = if prefix.is_empty() {
			key.clone()
		} else {
			format!("{}.{}", prefix, key)
		};
		match value {
			serde_json::Value::String(message) => errors.push((field, message.clone())),
			serde_json::Value::Array(messages) => {
				if let Some(message) = messages.iter().find_map(|message| message.as_str()) {
					errors.push((field, message.to_string()));
				}
			}
			serde_json::Value::Object(nested) => collect_field_errors(&field, nested, errors),
			_ => (),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn field_errors_keep_first_message_per_field() {
		let body = r#"{"email": ["student profile with this email already exists.", "second"], "contact": "Too long"}"#;
		let mut errors = parse_field_errors(body).unwrap();
		errors.sort();
		assert_eq!(
			errors,
			vec![
				(String::from("contact"), String::from("Too long")),
				(
					String::from("email"),
					String::from("student profile with this email already exists.")
				),
			]
		);
	}

	#[test]
	fn nested_field_errors_use_dotted_names() {
		let body = r#"{"emergency_contact_data": {"phone": ["Ensure this field has no more than 20 characters."]}}"#;
		let errors = parse_field_errors(body).unwrap();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].0, "emergency_contact_data.phone");
	}

	#[test]
	fn non_object_bodies_are_not_field_errors() {
		assert!(parse_field_errors("<html>Bad Request</html>").is_none());
		assert!(parse_field_errors(r#"["a"]"#).is_none());
	}

	#[test]
	fn student_paths_end_with_slash() {
		assert_eq!(student_path(42), "/students/42/");
	}
}
