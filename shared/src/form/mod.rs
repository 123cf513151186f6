// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::students::{EmergencyContact, Gender, MaritalStatus, StudentSubmission, SubmittedProgram};
use crate::api::FieldError;
use crate::upload::UploadFile;
use std::str::FromStr;

mod validation;
pub use validation::{is_allowed_picture_type, is_valid_email, normalize_phone};

/// Residence choice for students living off campus; the actual residence is typed in separately.
pub const OUTSIDE_CAMPUS: &str = "Outside Campus";
pub const PHONE_DIGITS: usize = 10;
pub const MAX_PICTURE_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_PICTURE_TYPES: [&str; 5] = ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FormField {
	FirstName,
	LastName,
	OtherName,
	DateOfBirth,
	Gender,
	MaritalStatus,
	Contact,
	Email,
	PlaceOfResidence,
	ResidenceDetail,
	Program,
	CustomProgramName,
	Hall,
	Wings,
	EmergencyName,
	EmergencyPhone,
	IdPicture,
}

impl FormField {
	/// Every field in the order it appears on the form
	pub const ALL: [FormField; 17] = [
		FormField::FirstName,
		FormField::LastName,
		FormField::OtherName,
		FormField::DateOfBirth,
		FormField::Gender,
		FormField::MaritalStatus,
		FormField::Contact,
		FormField::Email,
		FormField::PlaceOfResidence,
		FormField::ResidenceDetail,
		FormField::Program,
		FormField::CustomProgramName,
		FormField::Hall,
		FormField::Wings,
		FormField::EmergencyName,
		FormField::EmergencyPhone,
		FormField::IdPicture,
	];

	/// The name of the field's input element
	pub fn name(&self) -> &'static str {
		match self {
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::OtherName => "other_name",
			Self::DateOfBirth => "date_of_birth",
			Self::Gender => "gender",
			Self::MaritalStatus => "marital_status",
			Self::Contact => "contact",
			Self::Email => "email",
			Self::PlaceOfResidence => "place_of_residence",
			Self::ResidenceDetail => "residence_detail",
			Self::Program => "program_id",
			Self::CustomProgramName => "custom_program_name",
			Self::Hall => "hall_id",
			Self::Wings => "wing_ids",
			Self::EmergencyName => "emergency_name",
			Self::EmergencyPhone => "emergency_phone",
			Self::IdPicture => "id_picture",
		}
	}

	/// Finds the field for an input name or for a field name used in backend validation errors.
	pub fn from_name(name: &str) -> Option<Self> {
		let field = match name {
			"program" => Self::Program,
			"hall" | "hall_of_affiliation" => Self::Hall,
			"wings" => Self::Wings,
			"emergency_contact_data.name" | "emergency_contact.name" => Self::EmergencyName,
			"emergency_contact_data.phone" | "emergency_contact.phone" => Self::EmergencyPhone,
			_ => return Self::ALL.iter().copied().find(|field| field.name() == name),
		};
		Some(field)
	}
}

/// The student's selection in the program dropdown
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProgramChoice {
	#[default]
	Unselected,
	Listed(u64),
	/// The program isn't listed and the student types its name instead
	Other,
}

impl ProgramChoice {
	pub const UNSELECTED_VALUE: &'static str = "0";
	pub const OTHER_VALUE: &'static str = "-1";

	pub fn from_value(value: &str) -> Self {
		match value.trim() {
			Self::OTHER_VALUE => Self::Other,
			value => match value.parse::<u64>() {
				Ok(0) | Err(_) => Self::Unselected,
				Ok(id) => Self::Listed(id),
			},
		}
	}

	pub fn value(&self) -> String {
		match self {
			Self::Unselected => String::from(Self::UNSELECTED_VALUE),
			Self::Listed(id) => id.to_string(),
			Self::Other => String::from(Self::OTHER_VALUE),
		}
	}
}

/// Validation messages keyed by field, in the order they were found
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationErrors {
	errors: Vec<(FormField, String)>,
}

impl ValidationErrors {
	/// Sets the message for a field, replacing any message it already had
	pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
		let message = message.into();
		match self.errors.iter_mut().find(|(error_field, _)| *error_field == field) {
			Some((_, existing)) => *existing = message,
			None => self.errors.push((field, message)),
		}
	}

	pub fn get(&self, field: FormField) -> Option<&str> {
		self.errors
			.iter()
			.find(|(error_field, _)| *error_field == field)
			.map(|(_, message)| message.as_str())
	}

	pub fn remove(&mut self, field: FormField) {
		self.errors.retain(|(error_field, _)| *error_field != field);
	}

	pub fn first_field(&self) -> Option<FormField> {
		self.errors.first().map(|(field, _)| *field)
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
		self.errors.iter().map(|(field, message)| (*field, message.as_str()))
	}
}

/// State of the student registration form.
///
/// Each edit clears the edited field's validation error so messages disappear as soon as the student starts
/// fixing them. The full rule set only runs through [`StudentForm::validate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentForm {
	first_name: String,
	last_name: String,
	other_name: String,
	date_of_birth: String,
	gender: Gender,
	marital_status: MaritalStatus,
	contact: String,
	email: String,
	residence_choice: String,
	residence_detail: String,
	program: ProgramChoice,
	custom_program_name: String,
	hall_id: Option<u64>,
	wing_ids: Vec<u64>,
	emergency_name: String,
	emergency_phone: String,
	id_picture: Option<UploadFile>,
	errors: ValidationErrors,
}

impl StudentForm {
	/// The field's current value as its input element shows it
	pub fn value(&self, field: FormField) -> String {
		match field {
			FormField::FirstName => self.first_name.clone(),
			FormField::LastName => self.last_name.clone(),
			FormField::OtherName => self.other_name.clone(),
			FormField::DateOfBirth => self.date_of_birth.clone(),
			FormField::Gender => String::from(self.gender.as_str()),
			FormField::MaritalStatus => String::from(self.marital_status.as_str()),
			FormField::Contact => self.contact.clone(),
			FormField::Email => self.email.clone(),
			FormField::PlaceOfResidence => self.residence_choice.clone(),
			FormField::ResidenceDetail => self.residence_detail.clone(),
			FormField::Program => self.program.value(),
			FormField::CustomProgramName => self.custom_program_name.clone(),
			FormField::Hall => self.hall_id.unwrap_or_default().to_string(),
			FormField::Wings => self
				.wing_ids
				.iter()
				.map(|id| id.to_string())
				.collect::<Vec<String>>()
				.join(","),
			FormField::EmergencyName => self.emergency_name.clone(),
			FormField::EmergencyPhone => self.emergency_phone.clone(),
			FormField::IdPicture => self
				.id_picture
				.as_ref()
				.map(|picture| picture.file_name.clone())
				.unwrap_or_default(),
		}
	}

	/// Updates a field from its input element's value and clears that field's error.
	///
	/// Phone numbers keep only their first ten digits. Values that don't belong to a choice field are ignored.
	/// Wings and the picture have their own setters.
	pub fn set_text(&mut self, field: FormField, value: &str) {
		match field {
			FormField::FirstName => self.first_name = value.to_string(),
			FormField::LastName => self.last_name = value.to_string(),
			FormField::OtherName => self.other_name = value.to_string(),
			FormField::DateOfBirth => self.date_of_birth = value.to_string(),
			FormField::Gender => match Gender::from_str(value) {
				Ok(gender) => self.gender = gender,
				Err(error) => log::warn!("Ignoring gender selection: {}", error),
			},
			FormField::MaritalStatus => match MaritalStatus::from_str(value) {
				Ok(status) => self.marital_status = status,
				Err(error) => log::warn!("Ignoring marital status selection: {}", error),
			},
			FormField::Contact => self.contact = normalize_phone(value),
			FormField::Email => self.email = value.to_string(),
			FormField::PlaceOfResidence => {
				self.residence_choice = value.to_string();
				if !self.is_outside_campus() {
					self.residence_detail.clear();
				}
			}
			FormField::ResidenceDetail => {
				self.residence_detail = value.to_string();
				self.errors.remove(FormField::PlaceOfResidence);
			}
			FormField::Program => {
				self.program = ProgramChoice::from_value(value);
				if self.program != ProgramChoice::Other {
					self.custom_program_name.clear();
					self.errors.remove(FormField::CustomProgramName);
				}
			}
			FormField::CustomProgramName => self.custom_program_name = value.to_string(),
			FormField::Hall => self.hall_id = value.trim().parse::<u64>().ok().filter(|id| *id != 0),
			FormField::EmergencyName => self.emergency_name = value.to_string(),
			FormField::EmergencyPhone => self.emergency_phone = normalize_phone(value),
			FormField::Wings | FormField::IdPicture => {
				log::warn!("{} can't be set from text", field.name());
				return;
			}
		}
		self.errors.remove(field);
	}

	pub fn toggle_wing(&mut self, wing_id: u64, checked: bool) {
		if checked {
			if !self.wing_ids.contains(&wing_id) {
				self.wing_ids.push(wing_id);
			}
		} else {
			self.wing_ids.retain(|id| *id != wing_id);
		}
		self.errors.remove(FormField::Wings);
	}

	pub fn wing_ids(&self) -> &[u64] {
		&self.wing_ids
	}

	pub fn set_picture(&mut self, picture: UploadFile) {
		self.id_picture = Some(picture);
		self.errors.remove(FormField::IdPicture);
	}

	pub fn picture(&self) -> Option<&UploadFile> {
		self.id_picture.as_ref()
	}

	pub fn program_choice(&self) -> ProgramChoice {
		self.program
	}

	pub fn is_outside_campus(&self) -> bool {
		self.residence_choice == OUTSIDE_CAMPUS
	}

	/// The residence sent to the backend: the typed residence for off-campus students, otherwise the chosen one
	pub fn place_of_residence(&self) -> &str {
		if self.is_outside_campus() {
			self.residence_detail.trim()
		} else {
			self.residence_choice.trim()
		}
	}

	/// Checks every field, returning one message per invalid field in form order
	pub fn validate(&self) -> ValidationErrors {
		validation::validate(self)
	}

	pub fn set_errors(&mut self, errors: ValidationErrors) {
		self.errors = errors;
	}

	pub fn errors(&self) -> &ValidationErrors {
		&self.errors
	}

	pub fn error(&self, field: FormField) -> Option<&str> {
		self.errors.get(field)
	}

	/// Builds the submission from the trimmed form values, or returns the validation errors if the form isn't valid.
	pub fn to_submission(&self) -> Result<StudentSubmission, ValidationErrors> {
		let errors = self.validate();
		if !errors.is_empty() {
			return Err(errors);
		}

		let (date_of_birth, hall_id, id_picture) = match (
			validation::parse_date_of_birth(&self.date_of_birth),
			self.hall_id,
			self.id_picture.as_ref(),
		) {
			(Some(date_of_birth), Some(hall_id), Some(id_picture)) => (date_of_birth, hall_id, id_picture.clone()),
			_ => return Err(errors),
		};
		let program = match self.program {
			ProgramChoice::Listed(id) => SubmittedProgram::Listed(id),
			ProgramChoice::Other | ProgramChoice::Unselected => {
				SubmittedProgram::Custom(self.custom_program_name.trim().to_string())
			}
		};
		let other_name = Some(self.other_name.trim())
			.filter(|name| !name.is_empty())
			.map(|name| name.to_string());

		Ok(StudentSubmission {
			first_name: self.first_name.trim().to_string(),
			last_name: self.last_name.trim().to_string(),
			other_name,
			date_of_birth,
			gender: self.gender,
			marital_status: self.marital_status,
			contact: self.contact.trim().to_string(),
			email: self.email.trim().to_string(),
			place_of_residence: self.place_of_residence().to_string(),
			program,
			hall_id,
			wing_ids: self.wing_ids.clone(),
			emergency_contact: EmergencyContact {
				name: self.emergency_name.trim().to_string(),
				phone: self.emergency_phone.trim().to_string(),
			},
			id_picture,
		})
	}

	/// Shows the backend's field errors on the form.
	/// Errors for fields the form doesn't have are returned so they can be shown some other way.
	pub fn apply_server_errors(&mut self, field_errors: &[FieldError]) -> Vec<FieldError> {
		let mut unmatched = Vec::new();
		for (name, message) in field_errors.iter() {
			match FormField::from_name(name) {
				Some(field) => self.errors.insert(field, message.as_str()),
				None => unmatched.push((name.clone(), message.clone())),
			}
		}
		unmatched
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	pub(super) fn jpeg(size: usize) -> UploadFile {
		UploadFile::new(String::from("me.jpg"), String::from("image/jpeg"), vec![0; size])
	}

	pub(super) fn filled_form() -> StudentForm {
		let mut form = StudentForm::default();
		form.set_text(FormField::FirstName, "  Ama ");
		form.set_text(FormField::LastName, "Mensah");
		form.set_text(FormField::DateOfBirth, "2002-03-14");
		form.set_text(FormField::Gender, "Female");
		form.set_text(FormField::Contact, "0244123456");
		form.set_text(FormField::Email, "ama@example.com");
		form.set_text(FormField::PlaceOfResidence, "Legon Hall");
		form.set_text(FormField::Program, "2");
		form.set_text(FormField::Hall, "1");
		form.set_text(FormField::EmergencyName, "Kofi Mensah");
		form.set_text(FormField::EmergencyPhone, "0201234567");
		form.set_picture(jpeg(2048));
		form
	}

	#[test]
	fn field_names_round_trip() {
		for field in FormField::ALL {
			assert_eq!(FormField::from_name(field.name()), Some(field));
		}
	}

	#[test]
	fn backend_field_names_map_to_form_fields() {
		assert_eq!(
			FormField::from_name("emergency_contact_data.phone"),
			Some(FormField::EmergencyPhone)
		);
		assert_eq!(FormField::from_name("hall_of_affiliation"), Some(FormField::Hall));
		assert_eq!(FormField::from_name("non_field_errors"), None);
	}

	#[test]
	fn program_choice_values() {
		assert_eq!(ProgramChoice::from_value("0"), ProgramChoice::Unselected);
		assert_eq!(ProgramChoice::from_value("-1"), ProgramChoice::Other);
		assert_eq!(ProgramChoice::from_value("12"), ProgramChoice::Listed(12));
		assert_eq!(ProgramChoice::from_value("abc"), ProgramChoice::Unselected);
		assert_eq!(ProgramChoice::Listed(12).value(), "12");
	}

	#[test]
	fn editing_a_field_clears_only_its_error() {
		let mut form = StudentForm::default();
		form.set_errors(form.validate());
		assert!(form.error(FormField::FirstName).is_some());

		form.set_text(FormField::FirstName, "A");
		assert_eq!(form.error(FormField::FirstName), None);
		assert_eq!(form.error(FormField::LastName), Some("Last name is required"));
	}

	#[test]
	fn phone_numbers_keep_ten_digits() {
		let mut form = StudentForm::default();
		form.set_text(FormField::Contact, "024-412 3456 789");
		assert_eq!(form.value(FormField::Contact), "0244123456");
		form.set_text(FormField::EmergencyPhone, "+233 20");
		assert_eq!(form.value(FormField::EmergencyPhone), "23320");
	}

	#[test]
	fn choosing_a_listed_program_clears_the_custom_name() {
		let mut form = StudentForm::default();
		form.set_text(FormField::Program, ProgramChoice::OTHER_VALUE);
		form.set_text(FormField::CustomProgramName, "Marine Biology");
		assert_eq!(form.program_choice(), ProgramChoice::Other);

		form.set_text(FormField::Program, "3");
		assert_eq!(form.program_choice(), ProgramChoice::Listed(3));
		assert_eq!(form.value(FormField::CustomProgramName), "");
	}

	#[test]
	fn wings_toggle_without_duplicates() {
		let mut form = StudentForm::default();
		form.toggle_wing(4, true);
		form.toggle_wing(4, true);
		form.toggle_wing(5, true);
		assert_eq!(form.wing_ids(), &[4, 5]);
		form.toggle_wing(4, false);
		assert_eq!(form.wing_ids(), &[5]);
	}

	#[test]
	fn outside_campus_uses_typed_residence() {
		let mut form = StudentForm::default();
		form.set_text(FormField::PlaceOfResidence, OUTSIDE_CAMPUS);
		form.set_text(FormField::ResidenceDetail, "  East Legon ");
		assert!(form.is_outside_campus());
		assert_eq!(form.place_of_residence(), "East Legon");

		form.set_text(FormField::PlaceOfResidence, "Volta Hall");
		assert_eq!(form.place_of_residence(), "Volta Hall");
		assert_eq!(form.value(FormField::ResidenceDetail), "");
	}

	#[test]
	fn submission_is_trimmed() {
		let mut form = filled_form();
		form.set_text(FormField::OtherName, "   ");
		form.toggle_wing(7, true);
		let submission = form.to_submission().unwrap();
		assert_eq!(submission.first_name, "Ama");
		assert_eq!(submission.other_name, None);
		assert_eq!(submission.gender, Gender::Female);
		assert_eq!(submission.date_of_birth, NaiveDate::from_ymd_opt(2002, 3, 14).unwrap());
		assert_eq!(submission.program, SubmittedProgram::Listed(2));
		assert_eq!(submission.hall_id, 1);
		assert_eq!(submission.wing_ids, vec![7]);
		assert_eq!(submission.emergency_contact.name, "Kofi Mensah");
	}

	#[test]
	fn other_program_submits_custom_name() {
		let mut form = filled_form();
		form.set_text(FormField::Program, "-1");
		form.set_text(FormField::CustomProgramName, " Marine Biology ");
		assert_eq!(
			form.to_submission().unwrap().program,
			SubmittedProgram::Custom(String::from("Marine Biology"))
		);
	}

	#[test]
	fn invalid_forms_do_not_submit() {
		let errors = StudentForm::default().to_submission().unwrap_err();
		assert_eq!(errors.first_field(), Some(FormField::FirstName));
	}

	#[test]
	fn server_errors_land_on_fields() {
		let mut form = filled_form();
		let unmatched = form.apply_server_errors(&[
			(
				String::from("email"),
				String::from("student profile with this email already exists."),
			),
			(
				String::from("emergency_contact_data.phone"),
				String::from("Enter a valid phone number."),
			),
			(String::from("non_field_errors"), String::from("Try again later.")),
		]);
		assert_eq!(
			form.error(FormField::Email),
			Some("student profile with this email already exists.")
		);
		assert_eq!(
			form.error(FormField::EmergencyPhone),
			Some("Enter a valid phone number.")
		);
		assert_eq!(
			unmatched,
			vec![(String::from("non_field_errors"), String::from("Try again later."))]
		);
	}

	#[test]
	fn server_wing_errors_show_until_a_wing_is_toggled() {
		let mut form = filled_form();
		let unmatched = form.apply_server_errors(&[(
			String::from("wings"),
			String::from("Invalid pk \"99\" - object does not exist."),
		)]);
		assert!(unmatched.is_empty());
		assert_eq!(
			form.error(FormField::Wings),
			Some("Invalid pk \"99\" - object does not exist.")
		);
		form.toggle_wing(2, true);
		assert_eq!(form.error(FormField::Wings), None);
	}

	#[test]
	fn reset_restores_defaults() {
		let mut form = filled_form();
		form.set_errors(StudentForm::default().validate());
		form.reset();
		assert_eq!(form, StudentForm::default());
		assert_eq!(form.value(FormField::Gender), "Male");
		assert_eq!(form.value(FormField::MaritalStatus), "Single");
		assert_eq!(form.value(FormField::Program), "0");
	}
}
