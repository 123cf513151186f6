// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::Local;
use gloo_timers::future::TimeoutFuture;
use nups_portal_shared::api::students::StudentProfile;
use nups_portal_shared::dates::{format_day_month_year, format_full_date};
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use web_sys::Event as WebEvent;

const CLOSE_ANIMATION_MILLIS: u32 = 300;

#[derive(Prop)]
pub struct StudentDetailModalProps<'a> {
	student: StudentProfile,
	selected: &'a Signal<Option<StudentProfile>>,
}

#[component]
pub fn StudentDetailModal<'a, G: Html>(ctx: Scope<'a>, props: StudentDetailModalProps<'a>) -> View<G> {
	let selected = props.selected;
	let student = props.student;

	let closing = create_signal(ctx, false);
	let photo_failed = create_signal(ctx, false);

	let close = move || {
		if *closing.get() {
			return;
		}
		closing.set(true);
		spawn_local_scoped(ctx, async move {
			TimeoutFuture::new(CLOSE_ANIMATION_MILLIS).await;
			selected.set(None);
		});
	};

	let backdrop_class = create_memo(ctx, || {
		if *closing.get() {
			"modal_backdrop modal_closing"
		} else {
			"modal_backdrop"
		}
	});

	let name = student.display_name();
	let initials = student.initials();
	let picture_url = student.picture_url().map(String::from);
	let email = student.email.clone();
	let gender = student.gender.as_str();
	let marital_status = student.marital_status.as_str();
	let date_of_birth = format_day_month_year(student.date_of_birth);
	let contact = student.contact.clone();
	let program = student.program_name().unwrap_or("-").to_string();
	let hall = student.hall_name().unwrap_or("-").to_string();
	let wings = student.wing_names();
	let emergency_contact = student.emergency_contact.clone();
	let residence = student.place_of_residence.clone();
	let joined_on = format_full_date(student.created_at.with_timezone(&Local).date_naive());

	let photo_view = if let Some(url) = picture_url {
		let photo_name = name.clone();
		let photo_initials = initials.clone();
		view! {
			ctx,
			(if *photo_failed.get() {
				let photo_initials = photo_initials.clone();
				view! { ctx, div(class="member_initials") { (photo_initials) } }
			} else {
				let url = url.clone();
				let alt = photo_name.clone();
				view! {
					ctx,
					img(
						class="member_photo",
						src=url,
						alt=alt,
						on:error=move |_event: WebEvent| photo_failed.set(true)
					)
				}
			})
		}
	} else {
		view! { ctx, div(class="member_initials") { (initials) } }
	};

	let wings_view = match wings {
		Some(wings) => view! { ctx, p { (wings) } },
		None => view! { ctx, p(class="member_detail_empty") { "No wings selected" } },
	};

	let emergency_view = match emergency_contact {
		Some(contact) => {
			let contact_name = contact.name;
			let contact_phone = contact.phone;
			view! {
				ctx,
				dl(class="member_detail_list") {
					dt { "Name:" }
					dd { (contact_name) }
					dt { "Phone:" }
					dd { (contact_phone) }
				}
			}
		}
		None => view! { ctx, p(class="member_detail_empty") { "No emergency contact provided" } },
	};

	view! {
		ctx,
		div(class=backdrop_class.get(), on:click=move |_| close()) {
			div(class="modal_card", on:click=|event: WebEvent| event.stop_propagation()) {
				button(type="button", class="modal_close", title="Close", on:click=move |_| close()) { "×" }
				div(class="member_header") {
					(photo_view)
					div {
						h2 { (name) }
						p(class="member_email") { (email) }
					}
				}
				section(class="member_detail_section") {
					h3 { "Personal Information" }
					dl(class="member_detail_list") {
						dt { "Gender:" }
						dd { (gender) }
						dt { "Marital Status:" }
						dd { (marital_status) }
						dt { "Date of Birth:" }
						dd { (date_of_birth) }
						dt { "Contact:" }
						dd { (contact) }
					}
				}
				section(class="member_detail_section") {
					h3 { "Academic Information" }
					dl(class="member_detail_list") {
						dt { "Program:" }
						dd { (program) }
						dt { "Hall of Affiliation:" }
						dd { (hall) }
					}
				}
				section(class="member_detail_section") {
					h3 { "Wings" }
					(wings_view)
				}
				section(class="member_detail_section") {
					h3 { "Emergency Contact" }
					(emergency_view)
				}
				section(class="member_detail_section") {
					h3 { "Residence" }
					p { (residence) }
				}
				p(class="member_joined") { "Joined on: " (joined_on) }
			}
		}
	}
}
