// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::students::{Gender, StudentProfile};

/// The admin's member list filters. Unset filters match every member.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemberFilter {
	pub gender: Option<Gender>,
	pub hall: Option<String>,
	pub program: Option<String>,
}

impl MemberFilter {
	pub fn is_empty(&self) -> bool {
		self.gender.is_none() && self.hall.is_none() && self.program.is_none()
	}

	pub fn matches(&self, student: &StudentProfile) -> bool {
		if let Some(gender) = self.gender {
			if student.gender != gender {
				return false;
			}
		}
		if let Some(hall) = self.hall.as_deref() {
			if student.hall_name() != Some(hall) {
				return false;
			}
		}
		if let Some(program) = self.program.as_deref() {
			if student.program_name() != Some(program) {
				return false;
			}
		}
		true
	}
}

pub fn filter_students<'a>(students: &'a [StudentProfile], filter: &MemberFilter) -> Vec<&'a StudentProfile> {
	students.iter().filter(|student| filter.matches(student)).collect()
}

/// Program names of the given students without duplicates, in the order they first appear
pub fn distinct_programs(students: &[StudentProfile]) -> Vec<String> {
	distinct_names(students.iter().filter_map(|student| student.program_name()))
}

/// Hall names of the given students without duplicates, in the order they first appear
pub fn distinct_halls(students: &[StudentProfile]) -> Vec<String> {
	distinct_names(students.iter().filter_map(|student| student.hall_name()))
}

fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
	let mut distinct: Vec<String> = Vec::new();
	for name in names {
		if !distinct.iter().any(|existing| existing == name) {
			distinct.push(name.to_string());
		}
	}
	distinct
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::lookups::{Hall, Program};
	use crate::api::students::test_profile;

	fn students() -> Vec<StudentProfile> {
		let mut ama = test_profile(1, "Ama", "Mensah", Gender::Female);
		ama.hall = Some(Hall {
			id: 1,
			name: String::from("Legon Hall"),
		});
		ama.program = Some(Program {
			id: 2,
			name: String::from("Computer Science"),
		});

		let mut yaw = test_profile(2, "Yaw", "Boateng", Gender::Male);
		yaw.hall = Some(Hall {
			id: 2,
			name: String::from("Volta Hall"),
		});
		yaw.program = Some(Program {
			id: 2,
			name: String::from("Computer Science"),
		});

		let mut esi = test_profile(3, "Esi", "Owusu", Gender::Female);
		esi.hall = Some(Hall {
			id: 2,
			name: String::from("Volta Hall"),
		});

		vec![ama, yaw, esi]
	}

	fn ids(students: &[&StudentProfile]) -> Vec<u64> {
		students.iter().map(|student| student.id).collect()
	}

	#[test]
	fn empty_filter_matches_everyone() {
		let students = students();
		assert!(MemberFilter::default().is_empty());
		assert_eq!(ids(&filter_students(&students, &MemberFilter::default())), vec![1, 2, 3]);
	}

	#[test]
	fn filters_combine() {
		let students = students();
		let filter = MemberFilter {
			gender: Some(Gender::Female),
			hall: Some(String::from("Volta Hall")),
			program: None,
		};
		assert_eq!(ids(&filter_students(&students, &filter)), vec![3]);

		let filter = MemberFilter {
			program: Some(String::from("Computer Science")),
			..MemberFilter::default()
		};
		assert_eq!(ids(&filter_students(&students, &filter)), vec![1, 2]);
	}

	#[test]
	fn members_without_a_program_never_match_a_program_filter() {
		let students = students();
		let filter = MemberFilter {
			program: Some(String::new()),
			..MemberFilter::default()
		};
		assert!(filter_students(&students, &filter).is_empty());
	}

	#[test]
	fn distinct_names_keep_first_seen_order() {
		let students = students();
		assert_eq!(distinct_halls(&students), vec!["Legon Hall", "Volta Hall"]);
		assert_eq!(distinct_programs(&students), vec!["Computer Science"]);
	}
}
