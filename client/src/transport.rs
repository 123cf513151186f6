// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Uint8Array};
use nups_portal_shared::session::http::{
	FormPart, FormValue, HttpRequest, HttpResponse, Method, RequestBody, Transport, TransportError,
};
use nups_portal_shared::upload::UploadFile;
use std::time::Duration;
use wasm_bindgen::JsValue;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData};

/// Sends requests with the browser's fetch API
#[derive(Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
	async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
		let controller = AbortController::new().map_err(js_error)?;
		let signal = controller.signal();

		let mut builder = match request.method {
			Method::Get => Request::get(&request.url),
			Method::Post => Request::post(&request.url),
		};
		builder = builder.abort_signal(Some(&signal));
		for (name, value) in request.headers.iter() {
			builder = builder.header(name, value);
		}
		let fetch_request = build_request(builder, &request.body)?;

		// Dropping the timer cancels it, so it stays alive until the whole body has been read.
		let timer = Timeout::new(duration_millis(request.timeout), move || controller.abort());
		let result = read_response(fetch_request).await;
		drop(timer);

		result.map_err(|error| {
			if signal.aborted() {
				log::warn!("Request to {} timed out", request.url);
				TransportError::Timeout(request.timeout)
			} else {
				TransportError::Network(error.to_string())
			}
		})
	}
}

fn build_request(builder: RequestBuilder, body: &RequestBody) -> Result<Request, TransportError> {
	let request = match body {
		RequestBody::Empty => builder.build(),
		RequestBody::Json(json) => builder.header("Content-Type", "application/json").body(json.clone()),
		// The browser sets the multipart content type along with its boundary.
		RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
	};
	request.map_err(|error| TransportError::Network(error.to_string()))
}

async fn read_response(request: Request) -> Result<HttpResponse, gloo_net::Error> {
	let response: Response = request.send().await?;
	let status = response.status();
	let headers: Vec<(String, String)> = response.headers().entries().collect();
	let body = response.binary().await?;
	Ok(HttpResponse { status, headers, body })
}

fn form_data(parts: &[FormPart]) -> Result<FormData, TransportError> {
	let form_data = FormData::new().map_err(js_error)?;
	for part in parts.iter() {
		let appended = match &part.value {
			FormValue::Text(text) => form_data.append_with_str(&part.name, text),
			FormValue::File(file) => {
				form_data.append_with_blob_and_filename(&part.name, &file_blob(file)?, &file.file_name)
			}
		};
		appended.map_err(js_error)?;
	}
	Ok(form_data)
}

/// Copies bytes into a browser blob
pub fn bytes_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, TransportError> {
	let contents = Array::of1(&Uint8Array::from(bytes));
	let mut options = BlobPropertyBag::new();
	options.type_(mime_type);
	Blob::new_with_u8_array_sequence_and_options(&contents, &options).map_err(js_error)
}

fn file_blob(file: &UploadFile) -> Result<Blob, TransportError> {
	bytes_blob(&file.bytes, &file.mime_type)
}

pub fn duration_millis(duration: Duration) -> u32 {
	u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

fn js_error(error: JsValue) -> TransportError {
	TransportError::Network(format!("{:?}", error))
}
