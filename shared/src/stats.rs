// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::students::{Gender, StudentProfile};
use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DashboardStats {
	pub total: usize,
	/// Profiles submitted on the given day (UTC)
	pub today: usize,
	pub male: usize,
	pub female: usize,
}

impl DashboardStats {
	pub fn from_students(students: &[StudentProfile], today: NaiveDate) -> Self {
		students.iter().fold(Self::default(), |mut stats, student| {
			stats.total += 1;
			if student.created_at.date_naive() == today {
				stats.today += 1;
			}
			match student.gender {
				Gender::Male => stats.male += 1,
				Gender::Female => stats.female += 1,
			}
			stats
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::students::test_profile;
	use chrono::{TimeZone, Utc};

	#[test]
	fn counts_members() {
		let mut yesterday = test_profile(3, "Esi", "Owusu", Gender::Female);
		yesterday.created_at = Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 59).unwrap();
		let students = vec![
			test_profile(1, "Ama", "Mensah", Gender::Female),
			test_profile(2, "Yaw", "Boateng", Gender::Male),
			yesterday,
		];

		let stats = DashboardStats::from_students(&students, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
		assert_eq!(
			stats,
			DashboardStats {
				total: 3,
				today: 2,
				male: 1,
				female: 2,
			}
		);
	}

	#[test]
	fn no_members() {
		let stats = DashboardStats::from_students(&[], NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
		assert_eq!(stats, DashboardStats::default());
	}
}
