// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use knuffel::Decode;
use miette::{miette, IntoDiagnostic, Result};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.kdl";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Decode)]
pub struct ConfigDocument {
	#[knuffel(child, unwrap(argument), default)]
	api_base_url: Option<String>,
	#[knuffel(child, unwrap(argument), default)]
	request_timeout_seconds: Option<u64>,
	#[knuffel(child, unwrap(argument), default)]
	upload_timeout_seconds: Option<u64>,
	#[knuffel(child, unwrap(argument), default)]
	backup_timeout_seconds: Option<u64>,
	#[knuffel(child, unwrap(argument), default)]
	lookup_stale_minutes: Option<u64>,
	#[knuffel(child, unwrap(argument), default)]
	log_level: Option<String>,
}

/// Runtime settings for the portal
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortalConfig {
	pub api_base_url: String,
	pub request_timeout: Duration,
	pub upload_timeout: Duration,
	pub backup_timeout: Duration,
	/// How long fetched programs, halls, and wings are reused before they're fetched again
	pub lookup_stale_after: Duration,
	pub log_level: log::Level,
}

impl Default for PortalConfig {
	fn default() -> Self {
		Self {
			api_base_url: String::from(option_env!("NUPS_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)),
			request_timeout: Duration::from_secs(10),
			upload_timeout: Duration::from_secs(120),
			backup_timeout: Duration::from_secs(120),
			lookup_stale_after: Duration::from_secs(30 * 60),
			log_level: log::Level::Info,
		}
	}
}

/// Parses the contents of a config file. Settings not in the file keep their defaults.
pub fn parse_config(contents: &str) -> Result<PortalConfig> {
	let document: ConfigDocument = knuffel::parse(CONFIG_FILE_NAME, contents).into_diagnostic()?;
	let mut config = PortalConfig::default();

	if let Some(api_base_url) = document.api_base_url {
		if api_base_url.trim().is_empty() {
			return Err(miette!("api-base-url must not be empty"));
		}
		config.api_base_url = api_base_url;
	}
	if let Some(seconds) = document.request_timeout_seconds {
		config.request_timeout = positive_duration("request-timeout-seconds", seconds, 1)?;
	}
	if let Some(seconds) = document.upload_timeout_seconds {
		config.upload_timeout = positive_duration("upload-timeout-seconds", seconds, 1)?;
	}
	if let Some(seconds) = document.backup_timeout_seconds {
		config.backup_timeout = positive_duration("backup-timeout-seconds", seconds, 1)?;
	}
	if let Some(minutes) = document.lookup_stale_minutes {
		config.lookup_stale_after = positive_duration("lookup-stale-minutes", minutes, 60)?;
	}
	if let Some(level) = document.log_level {
		config.log_level =
			log::Level::from_str(&level).map_err(|_| miette!("log-level {:?} isn't a valid log level", level))?;
	}

	Ok(config)
}

fn positive_duration(setting: &str, amount: u64, unit_seconds: u64) -> Result<Duration> {
	if amount == 0 {
		Err(miette!("{} must be greater than zero", setting))
	} else {
		Ok(Duration::from_secs(amount.saturating_mul(unit_seconds)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(parse_config("").unwrap(), PortalConfig::default());
	}

	#[test]
	fn all_settings_are_read() {
		let contents = r#"
			api-base-url "https://nups.example.org/api"
			request-timeout-seconds 15
			upload-timeout-seconds 300
			backup-timeout-seconds 600
			lookup-stale-minutes 5
			log-level "debug"
		"#;
		let config = parse_config(contents).unwrap();
		assert_eq!(config.api_base_url, "https://nups.example.org/api");
		assert_eq!(config.request_timeout, Duration::from_secs(15));
		assert_eq!(config.upload_timeout, Duration::from_secs(300));
		assert_eq!(config.backup_timeout, Duration::from_secs(600));
		assert_eq!(config.lookup_stale_after, Duration::from_secs(300));
		assert_eq!(config.log_level, log::Level::Debug);
	}

	#[test]
	fn unknown_log_levels_are_rejected() {
		assert!(parse_config(r#"log-level "chatty""#).is_err());
	}

	#[test]
	fn zero_timeouts_are_rejected() {
		assert!(parse_config("request-timeout-seconds 0").is_err());
	}

	#[test]
	fn malformed_documents_are_rejected() {
		assert!(parse_config("request-timeout-seconds \"soon\"").is_err());
	}
}
