// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::upload::UploadFile;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
	Get,
	Post,
}

/// Whether a request carries the stored access token (and is eligible for a token refresh when rejected)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Authentication {
	Bearer,
	Anonymous,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
	Text(String),
	File(UploadFile),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormPart {
	pub name: String,
	pub value: FormValue,
}

impl FormPart {
	pub fn text(name: &str, value: impl Into<String>) -> Self {
		Self {
			name: name.to_string(),
			value: FormValue::Text(value.into()),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	Empty,
	Json(String),
	Multipart(Vec<FormPart>),
}

#[derive(Clone, Debug)]
pub struct HttpRequest {
	pub method: Method,
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub body: RequestBody,
	pub timeout: Duration,
	pub authentication: Authentication,
}

impl HttpRequest {
	pub fn new(method: Method, url: String, body: RequestBody, timeout: Duration) -> Self {
		Self {
			method,
			url,
			headers: Vec::new(),
			body,
			timeout,
			authentication: Authentication::Bearer,
		}
	}

	pub fn anonymous(mut self) -> Self {
		self.authentication = Authentication::Anonymous;
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Sets a header, replacing any existing header with the same (case-insensitive) name.
	pub fn set_header(&mut self, name: &str, value: String) {
		self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
		self.headers.push((name.to_string(), value));
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
	pub status: u16,
	pub headers: Vec<(String, String)>,
	pub body: Vec<u8>,
}

impl HttpResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(header_name, _)| header_name.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}

#[derive(Debug)]
pub enum TransportError {
	Timeout(Duration),
	Network(String),
}

impl fmt::Display for TransportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Timeout(timeout) => write!(f, "The request timed out after {} seconds", timeout.as_secs()),
			Self::Network(message) => write!(f, "{}", message),
		}
	}
}

impl Error for TransportError {}

/// Sends requests over the network. Implementations enforce the request's timeout.
#[allow(async_fn_in_trait)]
pub trait Transport {
	async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
