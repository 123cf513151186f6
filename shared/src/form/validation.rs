// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
	FormField, ProgramChoice, StudentForm, ValidationErrors, ALLOWED_PICTURE_TYPES, DATE_INPUT_FORMAT,
	MAX_PICTURE_BYTES, OUTSIDE_CAMPUS, PHONE_DIGITS,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
	static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
	EMAIL_PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Email pattern is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
	email_pattern().is_match(email)
}

/// Strips everything but digits, keeping at most enough for a phone number
pub fn normalize_phone(value: &str) -> String {
	value.chars().filter(|c| c.is_ascii_digit()).take(PHONE_DIGITS).collect()
}

pub fn is_allowed_picture_type(mime_type: &str) -> bool {
	ALLOWED_PICTURE_TYPES.contains(&mime_type)
}

pub(super) fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT).ok()
}

fn is_phone_number(value: &str) -> bool {
	value.len() == PHONE_DIGITS && value.chars().all(|c| c.is_ascii_digit())
}

pub(super) fn validate(form: &StudentForm) -> ValidationErrors {
	let mut errors = ValidationErrors::default();

	if form.first_name.trim().is_empty() {
		errors.insert(FormField::FirstName, "First name is required");
	}
	if form.last_name.trim().is_empty() {
		errors.insert(FormField::LastName, "Last name is required");
	}
	if form.date_of_birth.trim().is_empty() {
		errors.insert(FormField::DateOfBirth, "Date of birth is required");
	} else if parse_date_of_birth(&form.date_of_birth).is_none() {
		errors.insert(FormField::DateOfBirth, "Please enter a valid date of birth");
	}

	let contact = form.contact.trim();
	if contact.is_empty() {
		errors.insert(FormField::Contact, "Phone number is required");
	} else if !is_phone_number(contact) {
		errors.insert(FormField::Contact, "Phone number must be exactly 10 digits");
	}

	let email = form.email.trim();
	if email.is_empty() {
		errors.insert(FormField::Email, "Email is required");
	} else if !is_valid_email(email) {
		errors.insert(FormField::Email, "Please enter a valid email address");
	}

	let residence = form.place_of_residence();
	if residence.is_empty() || residence == OUTSIDE_CAMPUS {
		errors.insert(FormField::PlaceOfResidence, "Please specify your place of residence");
	}

	match form.program {
		ProgramChoice::Unselected => errors.insert(FormField::Program, "Program of study is required"),
		ProgramChoice::Other if form.custom_program_name.trim().is_empty() => {
			errors.insert(FormField::CustomProgramName, "Please specify your program name")
		}
		_ => (),
	}

	if form.hall_id.is_none() {
		errors.insert(FormField::Hall, "Hall of affiliation is required");
	}

	if form.emergency_name.trim().is_empty() {
		errors.insert(FormField::EmergencyName, "Emergency contact name is required");
	}
	let emergency_phone = form.emergency_phone.trim();
	if emergency_phone.is_empty() {
		errors.insert(FormField::EmergencyPhone, "Emergency contact phone number is required");
	} else if !is_phone_number(emergency_phone) {
		errors.insert(FormField::EmergencyPhone, "Emergency phone must be exactly 10 digits");
	}

	match form.id_picture.as_ref() {
		None => errors.insert(FormField::IdPicture, "Profile picture is required"),
		Some(picture) if !is_allowed_picture_type(&picture.mime_type) => {
			errors.insert(FormField::IdPicture, "Only JPG, PNG images allowed")
		}
		Some(picture) if picture.size() > MAX_PICTURE_BYTES => errors.insert(
			FormField::IdPicture,
			"Image too large. Max 10MB allowed (will be compressed)",
		),
		Some(_) => (),
	}

	errors
}

#[cfg(test)]
mod tests {
	use super::super::tests::{filled_form, jpeg};
	use super::*;
	use crate::upload::UploadFile;

	#[test]
	fn empty_form_reports_required_fields_in_order() {
		let errors = StudentForm::default().validate();
		let fields: Vec<FormField> = errors.iter().map(|(field, _)| field).collect();
		assert_eq!(
			fields,
			vec![
				FormField::FirstName,
				FormField::LastName,
				FormField::DateOfBirth,
				FormField::Contact,
				FormField::Email,
				FormField::PlaceOfResidence,
				FormField::Program,
				FormField::Hall,
				FormField::EmergencyName,
				FormField::EmergencyPhone,
				FormField::IdPicture,
			]
		);
		assert_eq!(errors.get(FormField::Contact), Some("Phone number is required"));
		assert_eq!(errors.get(FormField::IdPicture), Some("Profile picture is required"));
	}

	#[test]
	fn filled_form_is_valid() {
		assert!(filled_form().validate().is_empty());
	}

	#[test]
	fn short_phone_numbers_are_rejected() {
		let mut form = filled_form();
		form.set_text(FormField::Contact, "024412");
		form.set_text(FormField::EmergencyPhone, "020");
		let errors = form.validate();
		assert_eq!(
			errors.get(FormField::Contact),
			Some("Phone number must be exactly 10 digits")
		);
		assert_eq!(
			errors.get(FormField::EmergencyPhone),
			Some("Emergency phone must be exactly 10 digits")
		);
	}

	#[test]
	fn email_needs_an_at_and_a_dot() {
		assert!(is_valid_email("ama@example.com"));
		assert!(!is_valid_email("ama@example"));
		assert!(!is_valid_email("ama example@x.com"));

		let mut form = filled_form();
		form.set_text(FormField::Email, "ama.example.com");
		assert_eq!(
			form.validate().get(FormField::Email),
			Some("Please enter a valid email address")
		);
	}

	#[test]
	fn invalid_dates_are_rejected() {
		let mut form = filled_form();
		form.set_text(FormField::DateOfBirth, "2002-02-30");
		assert_eq!(
			form.validate().get(FormField::DateOfBirth),
			Some("Please enter a valid date of birth")
		);
	}

	#[test]
	fn outside_campus_needs_a_typed_residence() {
		let mut form = filled_form();
		form.set_text(FormField::PlaceOfResidence, OUTSIDE_CAMPUS);
		assert_eq!(
			form.validate().get(FormField::PlaceOfResidence),
			Some("Please specify your place of residence")
		);

		form.set_text(FormField::ResidenceDetail, "Madina");
		assert!(form.validate().is_empty());

		form.set_text(FormField::ResidenceDetail, OUTSIDE_CAMPUS);
		assert!(form.validate().get(FormField::PlaceOfResidence).is_some());
	}

	#[test]
	fn other_program_needs_a_name() {
		let mut form = filled_form();
		form.set_text(FormField::Program, ProgramChoice::OTHER_VALUE);
		let errors = form.validate();
		assert_eq!(
			errors.get(FormField::CustomProgramName),
			Some("Please specify your program name")
		);
		assert_eq!(errors.get(FormField::Program), None);
	}

	#[test]
	fn pictures_must_be_small_images() {
		let mut form = filled_form();
		form.set_picture(UploadFile::new(
			String::from("id.pdf"),
			String::from("application/pdf"),
			vec![0; 10],
		));
		assert_eq!(
			form.validate().get(FormField::IdPicture),
			Some("Only JPG, PNG images allowed")
		);

		form.set_picture(jpeg(MAX_PICTURE_BYTES + 1));
		assert_eq!(
			form.validate().get(FormField::IdPicture),
			Some("Image too large. Max 10MB allowed (will be compressed)")
		);

		form.set_picture(jpeg(MAX_PICTURE_BYTES));
		assert!(form.validate().is_empty());
	}
}
