// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::NaiveDate;

/// Formats a date like "19 October 2026"
pub fn format_day_month_year(date: NaiveDate) -> String {
	date.format("%-d %B %Y").to_string()
}

/// Formats a date like "Monday, October 19, 2026"
pub fn format_full_date(date: NaiveDate) -> String {
	date.format("%A, %B %-d, %Y").to_string()
}
