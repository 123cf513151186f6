// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wasm_bindgen::JsCast;
use web_sys::{
	Event as WebEvent, HtmlElement, HtmlInputElement, HtmlSelectElement, ScrollBehavior, ScrollIntoViewOptions,
	ScrollLogicalPosition,
};

/// Gets the current value of the input or select element that fired an event
pub fn event_target_value(event: &WebEvent) -> String {
	let Some(target) = event.target() else {
		return String::new();
	};
	if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
		input.value()
	} else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
		select.value()
	} else {
		String::new()
	}
}

pub fn event_target_checked(event: &WebEvent) -> bool {
	event
		.target()
		.and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
		.map(|input| input.checked())
		.unwrap_or(false)
}

/// Gets the first file chosen in the file input that fired an event
pub fn event_target_file(event: &WebEvent) -> Option<web_sys::File> {
	event
		.target()
		.and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
		.and_then(|input| input.files())
		.and_then(|files| files.get(0))
}

/// Scrolls the element with the given name into the middle of the screen and focuses it
pub fn focus_field(name: &str) {
	let Some(document) = web_sys::window().and_then(|window| window.document()) else {
		return;
	};
	let element = match document.query_selector(&format!("[name=\"{}\"]", name)) {
		Ok(Some(element)) => element,
		_ => {
			log::debug!("No element named {} to focus", name);
			return;
		}
	};
	let Ok(element) = element.dyn_into::<HtmlElement>() else {
		return;
	};

	let mut options = ScrollIntoViewOptions::new();
	options.behavior(ScrollBehavior::Smooth).block(ScrollLogicalPosition::Center);
	element.scroll_into_view_with_scroll_into_view_options(&options);
	if let Err(error) = element.focus() {
		log::debug!("Failed to focus {}: {:?}", name, error);
	}
}

/// Clears the chosen file from a file input
pub fn clear_file_input(id: &str) {
	let input = web_sys::window()
		.and_then(|window| window.document())
		.and_then(|document| document.get_element_by_id(id))
		.and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
	if let Some(input) = input {
		input.set_value("");
	}
}

pub fn alert(message: &str) {
	if let Some(window) = web_sys::window() {
		if let Err(error) = window.alert_with_message(message) {
			log::error!("Failed to show alert \"{}\": {:?}", message, error);
		}
	}
}
