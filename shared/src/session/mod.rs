// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::tokens::{LoginRequest, RefreshRequest, RefreshResponse, TokenPair};
use crate::api::{ApiError, TOKEN_PATH, TOKEN_REFRESH_PATH};
use crate::config::PortalConfig;
use std::time::Duration;

pub mod http;
use self::http::{Authentication, HttpRequest, HttpResponse, Method, RequestBody, Transport};

/// Persistent storage for the admin's bearer tokens
pub trait TokenStore {
	fn access_token(&self) -> Option<String>;
	fn refresh_token(&self) -> Option<String>;
	fn store_access_token(&self, access: &str);
	fn store_refresh_token(&self, refresh: &str);
	fn clear(&self);
}

/// Talks to the REST backend, keeping the admin session alive.
///
/// When a request using the stored access token is rejected as unauthorized, the client exchanges the refresh
/// token for a new access token and retries the request once. If that exchange fails, the stored tokens are
/// cleared and the session-expired hook runs.
pub struct ApiClient<T, S> {
	base_url: String,
	request_timeout: Duration,
	upload_timeout: Duration,
	backup_timeout: Duration,
	transport: T,
	tokens: S,
	session_expired_hook: Option<Box<dyn Fn()>>,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
	pub fn new(config: &PortalConfig, transport: T, tokens: S) -> Self {
		Self {
			base_url: config.api_base_url.trim_end_matches('/').to_string(),
			request_timeout: config.request_timeout,
			upload_timeout: config.upload_timeout,
			backup_timeout: config.backup_timeout,
			transport,
			tokens,
			session_expired_hook: None,
		}
	}

	/// Sets a function to run after the session has expired and the stored tokens were cleared
	pub fn on_session_expired(mut self, hook: impl Fn() + 'static) -> Self {
		self.session_expired_hook = Some(Box::new(hook));
		self
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn get(&self, path: &str) -> HttpRequest {
		HttpRequest::new(Method::Get, self.url(path), RequestBody::Empty, self.request_timeout)
	}

	pub fn post(&self, path: &str, body: RequestBody) -> HttpRequest {
		HttpRequest::new(Method::Post, self.url(path), body, self.request_timeout)
	}

	pub fn upload_timeout(&self) -> Duration {
		self.upload_timeout
	}

	pub fn backup_timeout(&self) -> Duration {
		self.backup_timeout
	}

	pub fn is_authenticated(&self) -> bool {
		self.tokens.access_token().is_some()
	}

	/// Exchanges credentials for tokens. Returns whether the credentials were accepted.
	pub async fn login(&self, username: &str, password: &str) -> Result<bool, ApiError> {
		let body = serde_json::to_string(&LoginRequest { username, password }).map_err(ApiError::Encode)?;
		let request = self.post(TOKEN_PATH, RequestBody::Json(body)).anonymous();
		let tokens: TokenPair = match self.execute(request).await {
			Ok(response) => response.json()?,
			Err(ApiError::Status { status: 400 | 401, .. }) => {
				log::info!("Login rejected for {}", username);
				return Ok(false);
			}
			Err(error) => return Err(error),
		};
		self.tokens.store_access_token(&tokens.access);
		self.tokens.store_refresh_token(&tokens.refresh);
		log::info!("Logged in as {}", username);
		Ok(true)
	}

	pub fn logout(&self) {
		self.tokens.clear();
	}

	/// Sends a request, handling a single token refresh and retry if the access token was rejected.
	/// Responses with a non-success status become [`ApiError::Status`].
	pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
		let response = self.send_authorized(&request, self.tokens.access_token()).await?;
		if response.status != 401 || request.authentication == Authentication::Anonymous {
			return check_status(response);
		}

		log::debug!("Access token rejected for {}; attempting refresh", request.url);
		let access_token = match self.refresh_access_token().await {
			Ok(token) => token,
			Err(error) => {
				log::warn!("Failed to refresh the admin session: {}", error);
				self.expire_session();
				return Err(ApiError::SessionExpired);
			}
		};

		// The retried request is final; another rejection goes back to the caller.
		let retry_response = self.send_authorized(&request, Some(access_token)).await?;
		check_status(retry_response)
	}

	async fn send_authorized(
		&self,
		request: &HttpRequest,
		access_token: Option<String>,
	) -> Result<HttpResponse, ApiError> {
		match (request.authentication, access_token) {
			(Authentication::Bearer, Some(token)) => {
				let mut request = request.clone();
				request.set_header("Authorization", format!("Bearer {}", token));
				Ok(self.transport.send(&request).await?)
			}
			_ => Ok(self.transport.send(request).await?),
		}
	}

	async fn refresh_access_token(&self) -> Result<String, ApiError> {
		let Some(refresh_token) = self.tokens.refresh_token() else {
			return Err(ApiError::SessionExpired);
		};
		let body = serde_json::to_string(&RefreshRequest {
			refresh: &refresh_token,
		})
		.map_err(ApiError::Encode)?;
		let request = self.post(TOKEN_REFRESH_PATH, RequestBody::Json(body)).anonymous();
		let response = check_status(self.transport.send(&request).await?)?;
		let refreshed: RefreshResponse = response.json()?;

		self.tokens.store_access_token(&refreshed.access);
		if let Some(rotated) = refreshed.refresh.as_ref() {
			self.tokens.store_refresh_token(rotated);
		}
		Ok(refreshed.access)
	}

	fn expire_session(&self) {
		self.tokens.clear();
		if let Some(hook) = self.session_expired_hook.as_ref() {
			hook();
		}
	}
}

#[cfg(test)]
impl<T, S> ApiClient<T, S> {
	pub(crate) fn transport(&self) -> &T {
		&self.transport
	}
}

fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
	if response.is_success() {
		Ok(response)
	} else {
		Err(ApiError::Status {
			status: response.status,
			body: response.text(),
		})
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use super::http::{HttpRequest, HttpResponse, Transport, TransportError};
	use super::TokenStore;
	use std::cell::RefCell;
	use std::collections::VecDeque;

	#[derive(Default)]
	pub struct MemoryTokenStore {
		pub access: RefCell<Option<String>>,
		pub refresh: RefCell<Option<String>>,
	}

	impl MemoryTokenStore {
		pub fn with_tokens(access: &str, refresh: &str) -> Self {
			Self {
				access: RefCell::new(Some(access.to_string())),
				refresh: RefCell::new(Some(refresh.to_string())),
			}
		}
	}

	impl TokenStore for MemoryTokenStore {
		fn access_token(&self) -> Option<String> {
			self.access.borrow().clone()
		}

		fn refresh_token(&self) -> Option<String> {
			self.refresh.borrow().clone()
		}

		fn store_access_token(&self, access: &str) {
			*self.access.borrow_mut() = Some(access.to_string());
		}

		fn store_refresh_token(&self, refresh: &str) {
			*self.refresh.borrow_mut() = Some(refresh.to_string());
		}

		fn clear(&self) {
			*self.access.borrow_mut() = None;
			*self.refresh.borrow_mut() = None;
		}
	}

	/// Replays queued responses in order and records every request it was asked to send
	#[derive(Default)]
	pub struct ScriptedTransport {
		pub responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
		pub sent: RefCell<Vec<HttpRequest>>,
	}

	impl ScriptedTransport {
		pub fn respond(self, status: u16, body: &str) -> Self {
			self.respond_with_headers(status, Vec::new(), body.as_bytes())
		}

		pub fn respond_with_headers(self, status: u16, headers: Vec<(String, String)>, body: &[u8]) -> Self {
			self.responses.borrow_mut().push_back(Ok(HttpResponse {
				status,
				headers,
				body: body.to_vec(),
			}));
			self
		}

		pub fn fail(self, error: TransportError) -> Self {
			self.responses.borrow_mut().push_back(Err(error));
			self
		}

		pub fn sent_urls(&self) -> Vec<String> {
			self.sent.borrow().iter().map(|request| request.url.clone()).collect()
		}
	}

	impl Transport for ScriptedTransport {
		async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
			self.sent.borrow_mut().push(request.clone());
			self.responses
				.borrow_mut()
				.pop_front()
				.unwrap_or_else(|| Err(TransportError::Network(String::from("no scripted response"))))
		}
	}
}
