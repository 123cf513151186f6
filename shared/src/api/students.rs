// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::lookups::{Hall, Program, Wing};
use crate::session::http::{FormPart, FormValue};
use crate::upload::UploadFile;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Eq, PartialEq)]
pub struct UnknownChoiceError(pub String);

impl fmt::Display for UnknownChoiceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "\"{}\" is not one of the available choices", self.0)
	}
}

impl Error for UnknownChoiceError {}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Gender {
	#[default]
	Male,
	Female,
}

impl Gender {
	pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Male => "Male",
			Self::Female => "Female",
		}
	}
}

impl fmt::Display for Gender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for Gender {
	type Err = UnknownChoiceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|gender| gender.as_str() == s)
			.ok_or_else(|| UnknownChoiceError(s.to_string()))
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MaritalStatus {
	#[default]
	Single,
	Married,
	Divorced,
	Widowed,
}

impl MaritalStatus {
	pub const ALL: [MaritalStatus; 4] = [
		MaritalStatus::Single,
		MaritalStatus::Married,
		MaritalStatus::Divorced,
		MaritalStatus::Widowed,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Single => "Single",
			Self::Married => "Married",
			Self::Divorced => "Divorced",
			Self::Widowed => "Widowed",
		}
	}
}

impl fmt::Display for MaritalStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for MaritalStatus {
	type Err = UnknownChoiceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| UnknownChoiceError(s.to_string()))
	}
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct EmergencyContact {
	pub name: String,
	pub phone: String,
}

/// A submitted profile as the backend returns it
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StudentProfile {
	pub id: u64,
	pub first_name: String,
	pub last_name: String,
	#[serde(default)]
	pub other_name: Option<String>,
	pub date_of_birth: NaiveDate,
	pub gender: Gender,
	pub marital_status: MaritalStatus,
	pub contact: String,
	pub email: String,
	#[serde(default)]
	pub emergency_contact: Option<EmergencyContact>,
	#[serde(default)]
	pub program: Option<Program>,
	#[serde(default)]
	pub hall: Option<Hall>,
	pub place_of_residence: String,
	#[serde(default)]
	pub wings: Vec<Wing>,
	#[serde(default)]
	pub id_picture: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl StudentProfile {
	/// First, other, and last names joined with single spaces, skipping any that are empty
	pub fn display_name(&self) -> String {
		let other_name = self.other_name.as_deref().unwrap_or_default();
		[self.first_name.as_str(), other_name, self.last_name.as_str()]
			.iter()
			.map(|name| name.trim())
			.filter(|name| !name.is_empty())
			.collect::<Vec<&str>>()
			.join(" ")
	}

	pub fn initials(&self) -> String {
		self.first_name
			.trim()
			.chars()
			.take(1)
			.chain(self.last_name.trim().chars().take(1))
			.flat_map(|c| c.to_uppercase())
			.collect()
	}

	pub fn program_name(&self) -> Option<&str> {
		self.program.as_ref().map(|program| program.name.as_str())
	}

	pub fn hall_name(&self) -> Option<&str> {
		self.hall.as_ref().map(|hall| hall.name.as_str())
	}

	/// Wing names joined with commas, or `None` if the student chose no wings
	pub fn wing_names(&self) -> Option<String> {
		if self.wings.is_empty() {
			None
		} else {
			Some(
				self.wings
					.iter()
					.map(|wing| wing.name.as_str())
					.collect::<Vec<&str>>()
					.join(", "),
			)
		}
	}

	pub fn picture_url(&self) -> Option<&str> {
		self.id_picture.as_deref().filter(|url| !url.is_empty())
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmittedProgram {
	Listed(u64),
	Custom(String),
}

/// A profile ready to be sent to the backend
#[derive(Clone, Debug, PartialEq)]
pub struct StudentSubmission {
	pub first_name: String,
	pub last_name: String,
	pub other_name: Option<String>,
	pub date_of_birth: NaiveDate,
	pub gender: Gender,
	pub marital_status: MaritalStatus,
	pub contact: String,
	pub email: String,
	pub place_of_residence: String,
	pub program: SubmittedProgram,
	pub hall_id: u64,
	pub wing_ids: Vec<u64>,
	pub emergency_contact: EmergencyContact,
	pub id_picture: UploadFile,
}

impl StudentSubmission {
	/// Lays the submission out as multipart form fields in the shape the backend expects.
	pub fn into_form_parts(self) -> Vec<FormPart> {
		let mut parts = vec![
			FormPart::text("first_name", self.first_name),
			FormPart::text("last_name", self.last_name),
		];
		if let Some(other_name) = self.other_name.filter(|name| !name.is_empty()) {
			parts.push(FormPart::text("other_name", other_name));
		}
		parts.push(FormPart::text(
			"date_of_birth",
			self.date_of_birth.format("%Y-%m-%d").to_string(),
		));
		parts.push(FormPart::text("gender", self.gender.as_str()));
		parts.push(FormPart::text("marital_status", self.marital_status.as_str()));
		parts.push(FormPart::text("contact", self.contact));
		parts.push(FormPart::text("email", self.email));
		parts.push(FormPart::text("place_of_residence", self.place_of_residence));
		match self.program {
			SubmittedProgram::Listed(id) => parts.push(FormPart::text("program_id", id.to_string())),
			SubmittedProgram::Custom(name) => parts.push(FormPart::text("custom_program_name", name)),
		}
		parts.push(FormPart::text("hall_id", self.hall_id.to_string()));
		for wing_id in self.wing_ids {
			parts.push(FormPart::text("wing_ids", wing_id.to_string()));
		}
		parts.push(FormPart::text("emergency_contact_data.name", self.emergency_contact.name));
		parts.push(FormPart::text(
			"emergency_contact_data.phone",
			self.emergency_contact.phone,
		));
		parts.push(FormPart {
			name: String::from("id_picture"),
			value: FormValue::File(self.id_picture),
		});
		parts
	}
}

#[cfg(test)]
pub(crate) fn test_profile(id: u64, first_name: &str, last_name: &str, gender: Gender) -> StudentProfile {
	StudentProfile {
		id,
		first_name: first_name.to_string(),
		last_name: last_name.to_string(),
		other_name: None,
		date_of_birth: NaiveDate::from_ymd_opt(2003, 5, 1).unwrap(),
		gender,
		marital_status: MaritalStatus::Single,
		contact: String::from("0244000000"),
		email: format!("{}@example.com", first_name.to_lowercase()),
		emergency_contact: None,
		program: None,
		hall: None,
		place_of_residence: String::from("Legon Hall"),
		wings: Vec::new(),
		id_picture: None,
		created_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile_json() -> &'static str {
		r#"{
			"id": 7,
			"first_name": "Ama",
			"last_name": "Mensah",
			"other_name": null,
			"date_of_birth": "2002-03-14",
			"gender": "Female",
			"marital_status": "Single",
			"contact": "0244123456",
			"email": "ama@example.com",
			"emergency_contact": {"name": "Kofi Mensah", "phone": "0201234567"},
			"program": {"id": 2, "name": "BSc. Information Technology"},
			"hall": {"id": 1, "name": "Legon Hall"},
			"place_of_residence": "Outside Campus: Ayeduase",
			"wings": [{"id": 1, "name": "Women's Wing"}, {"id": 3, "name": "Choir"}],
			"id_picture": "https://res.cloudinary.com/demo/id_pictures/ama.jpg",
			"created_at": "2026-10-19T08:40:12.345678Z"
		}"#
	}

	#[test]
	fn profile_reads_backend_shape() {
		let profile: StudentProfile = serde_json::from_str(profile_json()).unwrap();
		assert_eq!(profile.gender, Gender::Female);
		assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(2002, 3, 14).unwrap());
		assert_eq!(profile.display_name(), "Ama Mensah");
		assert_eq!(profile.initials(), "AM");
		assert_eq!(profile.wing_names().as_deref(), Some("Women's Wing, Choir"));
		assert_eq!(profile.program_name(), Some("BSc. Information Technology"));
	}

	#[test]
	fn profile_tolerates_missing_relations() {
		let json = r#"{
			"id": 8, "first_name": "Yaw", "last_name": "Boateng", "date_of_birth": "2001-01-01",
			"gender": "Male", "marital_status": "Married", "contact": "0501112222", "email": "yaw@example.com",
			"emergency_contact": null, "program": null, "hall": null, "place_of_residence": "Hall 3",
			"id_picture": "", "created_at": "2026-10-18T23:59:59+00:00"
		}"#;
		let profile: StudentProfile = serde_json::from_str(json).unwrap();
		assert!(profile.wings.is_empty());
		assert_eq!(profile.wing_names(), None);
		assert_eq!(profile.picture_url(), None);
		assert_eq!(profile.hall_name(), None);
	}

	#[test]
	fn display_name_includes_other_name_between() {
		let mut profile: StudentProfile = serde_json::from_str(profile_json()).unwrap();
		profile.other_name = Some(String::from("Serwaa"));
		assert_eq!(profile.display_name(), "Ama Serwaa Mensah");
	}

	#[test]
	fn choices_parse_from_their_labels() {
		assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
		assert_eq!("Widowed".parse::<MaritalStatus>(), Ok(MaritalStatus::Widowed));
		assert!("female".parse::<Gender>().is_err());
	}

	#[test]
	fn submission_parts_follow_backend_field_names() {
		let submission = StudentSubmission {
			first_name: String::from("Ama"),
			last_name: String::from("Mensah"),
			other_name: None,
			date_of_birth: NaiveDate::from_ymd_opt(2002, 3, 14).unwrap(),
			gender: Gender::Female,
			marital_status: MaritalStatus::Single,
			contact: String::from("0244123456"),
			email: String::from("ama@example.com"),
			place_of_residence: String::from("Legon Hall"),
			program: SubmittedProgram::Custom(String::from("MPhil. Music")),
			hall_id: 1,
			wing_ids: vec![1, 3],
			emergency_contact: EmergencyContact {
				name: String::from("Kofi"),
				phone: String::from("0201234567"),
			},
			id_picture: UploadFile::new(String::from("me.png"), String::from("image/png"), vec![1, 2, 3]),
		};
		let parts = submission.into_form_parts();
		let names: Vec<&str> = parts.iter().map(|part| part.name.as_str()).collect();
		assert_eq!(
			names,
			vec![
				"first_name",
				"last_name",
				"date_of_birth",
				"gender",
				"marital_status",
				"contact",
				"email",
				"place_of_residence",
				"custom_program_name",
				"hall_id",
				"wing_ids",
				"wing_ids",
				"emergency_contact_data.name",
				"emergency_contact_data.phone",
				"id_picture",
			]
		);
		assert_eq!(parts[2].value, FormValue::Text(String::from("2002-03-14")));
		assert!(matches!(parts.last().map(|part| &part.value), Some(FormValue::File(_))));
	}
}
