// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
	pub username: &'a str,
	pub password: &'a str,
}

/// Tokens issued on a successful login
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenPair {
	pub access: String,
	pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
	pub refresh: &'a str,
}

/// The refresh token is only present when the backend rotates refresh tokens.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RefreshResponse {
	pub access: String,
	#[serde(default)]
	pub refresh: Option<String>,
}
