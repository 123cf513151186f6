// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::backup::{file_name_from_content_disposition, BackupFile, DEFAULT_BACKUP_FILE_NAME};
use super::lookups::{Hall, Program, Wing};
use super::students::{StudentProfile, StudentSubmission};
use super::{
	parse_field_errors, student_path, ApiError, BACKUP_PATH, HALLS_PATH, PROGRAMS_PATH, STUDENTS_PATH, WINGS_PATH,
};
use crate::session::http::{RequestBody, Transport};
use crate::session::{ApiClient, TokenStore};
use serde::de::DeserializeOwned;

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
	async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
		let response = self.execute(self.get(path)).await?;
		Ok(response.json()?)
	}

	pub async fn programs(&self) -> Result<Vec<Program>, ApiError> {
		self.get_json(PROGRAMS_PATH).await
	}

	pub async fn halls(&self) -> Result<Vec<Hall>, ApiError> {
		self.get_json(HALLS_PATH).await
	}

	pub async fn wings(&self) -> Result<Vec<Wing>, ApiError> {
		self.get_json(WINGS_PATH).await
	}

	/// All submitted profiles, newest first
	pub async fn students(&self) -> Result<Vec<StudentProfile>, ApiError> {
		self.get_json(STUDENTS_PATH).await
	}

	pub async fn student(&self, id: u64) -> Result<StudentProfile, ApiError> {
		self.get_json(&student_path(id)).await
	}

	/// Submits a profile. Field errors from the backend come back as [`ApiError::Rejected`].
	///
	/// Any success status means the profile was stored. The created profile is returned when the response
	/// body can be read as one.
	pub async fn submit_student(&self, submission: StudentSubmission) -> Result<Option<StudentProfile>, ApiError> {
		log::info!(
			"Submitting profile for {} {} ({} byte picture)",
			submission.first_name,
			submission.last_name,
			submission.id_picture.size()
		);
		let request = self
			.post(STUDENTS_PATH, RequestBody::Multipart(submission.into_form_parts()))
			.with_timeout(self.upload_timeout());
		match self.execute(request).await {
			Ok(response) => match response.json() {
				Ok(profile) => Ok(Some(profile)),
				Err(error) => {
					log::warn!("Profile was stored but the response couldn't be read: {}", error);
					Ok(None)
				}
			},
			Err(ApiError::Status { status: 400, body }) => match parse_field_errors(&body) {
				Some(field_errors) => Err(ApiError::Rejected(field_errors)),
				None => Err(ApiError::Status { status: 400, body }),
			},
			Err(error) => Err(error),
		}
	}

	pub async fn download_backup(&self) -> Result<BackupFile, ApiError> {
		let request = self.get(BACKUP_PATH).with_timeout(self.backup_timeout());
		let response = self.execute(request).await?;
		let file_name = response
			.header("Content-Disposition")
			.and_then(file_name_from_content_disposition)
			.unwrap_or_else(|| String::from(DEFAULT_BACKUP_FILE_NAME));
		let content_type = response
			.header("Content-Type")
			.unwrap_or("application/octet-stream")
			.to_string();
		log::info!("Downloaded backup {} ({} bytes)", file_name, response.body.len());
		Ok(BackupFile {
			file_name,
			content_type,
			bytes: response.body,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::students::{EmergencyContact, Gender, MaritalStatus, SubmittedProgram};
	use crate::config::PortalConfig;
	use crate::session::http::FormValue;
	use crate::session::testing::{MemoryTokenStore, ScriptedTransport};
	use crate::upload::UploadFile;
	use chrono::NaiveDate;
	use futures::executor::block_on;
	use std::time::Duration;

	fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport, MemoryTokenStore> {
		let config = PortalConfig {
			api_base_url: String::from("http://localhost:8000/api"),
			upload_timeout: Duration::from_secs(120),
			..PortalConfig::default()
		};
		ApiClient::new(&config, transport, MemoryTokenStore::default())
	}

	fn submission() -> StudentSubmission {
		StudentSubmission {
			first_name: String::from("Ama"),
			last_name: String::from("Mensah"),
			other_name: Some(String::from("Serwaa")),
			date_of_birth: NaiveDate::from_ymd_opt(2002, 3, 14).unwrap(),
			gender: Gender::Female,
			marital_status: MaritalStatus::Single,
			contact: String::from("0244123456"),
			email: String::from("ama@example.com"),
			place_of_residence: String::from("Legon Hall"),
			program: SubmittedProgram::Listed(2),
			hall_id: 1,
			wing_ids: Vec::new(),
			emergency_contact: EmergencyContact {
				name: String::from("Kofi"),
				phone: String::from("0201234567"),
			},
			id_picture: UploadFile::new(String::from("me.jpg"), String::from("image/jpeg"), vec![0xff, 0xd8]),
		}
	}

	#[test]
	fn lookups_decode_lists() {
		let api = client(ScriptedTransport::default().respond(200, r#"[{"id": 1, "name": "Legon Hall"}]"#));
		let halls = block_on(api.halls()).unwrap();
		assert_eq!(
			halls,
			vec![Hall {
				id: 1,
				name: String::from("Legon Hall")
			}]
		);
		assert_eq!(api.transport().sent_urls(), vec!["http://localhost:8000/api/halls/"]);
	}

	#[test]
	fn submission_is_multipart_with_upload_timeout() {
		let created = r#"{
			"id": 9, "first_name": "Ama", "last_name": "Mensah", "other_name": "Serwaa",
			"date_of_birth": "2002-03-14", "gender": "Female", "marital_status": "Single",
			"contact": "0244123456", "email": "ama@example.com", "place_of_residence": "Legon Hall",
			"created_at": "2026-10-19T09:00:00Z"
		}"#;
		let api = client(ScriptedTransport::default().respond(201, created));
		let profile = block_on(api.submit_student(submission())).unwrap();
		assert_eq!(profile.map(|profile| profile.id), Some(9));

		let request = api.transport().sent.borrow()[0].clone();
		assert_eq!(request.timeout, Duration::from_secs(120));
		let RequestBody::Multipart(parts) = request.body else {
			panic!("submission wasn't multipart");
		};
		assert!(parts
			.iter()
			.any(|part| part.name == "program_id" && part.value == FormValue::Text(String::from("2"))));
		assert!(parts.iter().any(|part| part.name == "other_name"));
	}

	#[test]
	fn stored_submission_succeeds_even_with_an_unreadable_body() {
		let api = client(ScriptedTransport::default().respond(201, r#"{"id": 9, "message": "created"}"#));
		assert_eq!(block_on(api.submit_student(submission())).unwrap(), None);

		let api = client(ScriptedTransport::default().respond(204, ""));
		assert_eq!(block_on(api.submit_student(submission())).unwrap(), None);
	}

	#[test]
	fn single_student_is_fetched_with_the_admin_token() {
		let profile = r#"{
			"id": 42, "first_name": "Kwame", "last_name": "Asante", "other_name": null,
			"date_of_birth": "2001-07-09", "gender": "Male", "marital_status": "Single",
			"contact": "0501234567", "email": "kwame@example.com", "place_of_residence": "Commonwealth Hall",
			"hall": {"id": 4, "name": "Commonwealth Hall"}, "wings": [],
			"created_at": "2026-10-19T10:15:00Z"
		}"#;
		let config = PortalConfig {
			api_base_url: String::from("http://localhost:8000/api"),
			..PortalConfig::default()
		};
		let api = ApiClient::new(
			&config,
			ScriptedTransport::default().respond(200, profile),
			MemoryTokenStore::with_tokens("access-1", "refresh-1"),
		);

		let student = block_on(api.student(42)).unwrap();
		assert_eq!(student.id, 42);
		assert_eq!(student.display_name(), "Kwame Asante");
		assert_eq!(student.hall_name(), Some("Commonwealth Hall"));

		let sent = api.transport().sent.borrow();
		assert_eq!(sent[0].url, "http://localhost:8000/api/students/42/");
		assert_eq!(sent[0].header("Authorization"), Some("Bearer access-1"));
	}

	#[test]
	fn submission_field_errors_are_reported() {
		let api = client(ScriptedTransport::default().respond(
			400,
			r#"{"email": ["student profile with this email already exists."]}"#,
		));
		match block_on(api.submit_student(submission())) {
			Err(ApiError::Rejected(errors)) => assert_eq!(errors[0].0, "email"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn server_failures_during_submission_stay_status_errors() {
		let api = client(ScriptedTransport::default().respond(500, "<h1>Server Error</h1>"));
		assert_eq!(block_on(api.submit_student(submission())).unwrap_err().status(), Some(500));
	}

	#[test]
	fn backup_uses_header_file_name() {
		let transport = ScriptedTransport::default().respond_with_headers(
			200,
			vec![(
				String::from("content-disposition"),
				String::from(r#"attachment; filename="nups_2026-10-19.sql""#),
			)],
			b"-- dump",
		);
		let api = client(transport);
		let backup = block_on(api.download_backup()).unwrap();
		assert_eq!(backup.file_name, "nups_2026-10-19.sql");
		assert_eq!(backup.content_type, "application/octet-stream");
		assert_eq!(backup.bytes, b"-- dump");
	}

	#[test]
	fn backup_falls_back_to_default_name() {
		let api = client(ScriptedTransport::default().respond(200, "-- dump"));
		let backup = block_on(api.download_backup()).unwrap();
		assert_eq!(backup.file_name, DEFAULT_BACKUP_FILE_NAME);
	}
}
