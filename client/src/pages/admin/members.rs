// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::components::admin_layout::AdminLayout;
use crate::components::student_detail_modal::StudentDetailModal;
use crate::download::save_bytes;
use crate::page_utils::set_page_title;
use crate::pages::error::ErrorMessage;
use crate::session::{is_logged_in, PortalApi, LOGIN_PATH};
use crate::toasts::{show_toast, ToastData};
use chrono::{Local, Utc};
use nups_portal_shared::api::students::{Gender, StudentProfile};
use nups_portal_shared::api::ApiError;
use nups_portal_shared::export::{export_file_name, members_pdf};
use nups_portal_shared::members::{distinct_halls, distinct_programs, filter_students, MemberFilter};
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use sycamore::suspense::Suspense;
use sycamore_router::navigate;

fn selected_name(value: &str) -> Option<String> {
	if value.is_empty() {
		None
	} else {
		Some(value.to_string())
	}
}

#[component]
async fn MembersLoadedView<G: Html>(ctx: Scope<'_>) -> View<G> {
	let api: &PortalApi = use_context(ctx);

	let students = match api.students().await {
		Ok(students) => students,
		Err(ApiError::SessionExpired) => return view! { ctx, },
		Err(error) => {
			log::error!("Failed to load members: {}", error);
			return view! {
				ctx,
				ErrorMessage(message="Failed to load members.", details=Some(error.to_string()))
			};
		}
	};

	let programs = create_signal(ctx, distinct_programs(&students));
	let halls = create_signal(ctx, distinct_halls(&students));
	let students = create_signal(ctx, students);

	let gender_signal = create_signal(ctx, String::new());
	let program_signal = create_signal(ctx, String::new());
	let hall_signal = create_signal(ctx, String::new());
	let selected_student: &Signal<Option<StudentProfile>> = create_signal(ctx, None);

	let filter = create_memo(ctx, || MemberFilter {
		gender: gender_signal.get().parse::<Gender>().ok(),
		hall: selected_name(&hall_signal.get()),
		program: selected_name(&program_signal.get()),
	});
	let filtered = create_memo(ctx, || {
		let students = students.get();
		filter_students(&students, &filter.get())
			.into_iter()
			.cloned()
			.collect::<Vec<StudentProfile>>()
	});
	let filtered_count = create_memo(ctx, || filtered.get().len());

	let export_handler = move |_| {
		let members = filtered.get();
		let today = Local::now().date_naive();
		let pdf = match members_pdf(&members, today) {
			Ok(pdf) => pdf,
			Err(error) => {
				log::error!("Failed to build member list PDF: {}", error);
				show_toast(ctx, ToastData::error_with_details("Failed to export the member list.", error));
				return;
			}
		};
		// The file is named by the UTC date, while the document shows the local one.
		match save_bytes(&export_file_name(Utc::now().date_naive()), "application/pdf", &pdf) {
			Ok(()) => show_toast(ctx, ToastData::success("Member list exported.")),
			Err(error) => {
				log::error!("Failed to save member list PDF: {}", error);
				show_toast(ctx, ToastData::error_with_details("Failed to export the member list.", error));
			}
		}
	};

	view! {
		ctx,
		div(class="members_header") {
			h1 { "Total Members (" (filtered_count.get()) ")" }
			button(type="button", class="members_export", on:click=export_handler) { "Export List" }
		}
		div(class="members_filters") {
			label {
				"Gender"
				select(bind:value=gender_signal) {
					option(value="") { "All Genders" }
					(View::new_fragment(
						Gender::ALL
							.iter()
							.map(|gender| {
								let name = gender.as_str();
								view! { ctx, option(value=name) { (name) } }
							})
							.collect()
					))
				}
			}
			label {
				"Program"
				select(bind:value=program_signal) {
					option(value="") { "All Programs" }
					Indexed(
						iterable=programs,
						view=|ctx, program| {
							let value = program.clone();
							view! { ctx, option(value=value) { (program) } }
						}
					)
				}
			}
			label {
				"Hall"
				select(bind:value=hall_signal) {
					option(value="") { "All Halls" }
					Indexed(
						iterable=halls,
						view=|ctx, hall| {
							let value = hall.clone();
							view! { ctx, option(value=value) { (hall) } }
						}
					)
				}
			}
		}
		table(class="members_table") {
			thead {
				tr {
					th { "Name" }
					th { "Contact" }
					th { "Gender" }
					th { "Hall" }
					th { "Program" }
					th { "Details" }
				}
			}
			tbody {
				Keyed(
					iterable=filtered,
					key=|student| student.id,
					view=move |ctx, student| {
						let name = student.display_name();
						let contact = student.contact.clone();
						let gender = student.gender.as_str();
						let hall = student.hall_name().unwrap_or("-").to_string();
						let program = student.program_name().unwrap_or("-").to_string();
						view! {
							ctx,
							tr {
								td(class="members_name") { (name) }
								td { (contact) }
								td { (gender) }
								td { (hall) }
								td { (program) }
								td {
									button(
										type="button",
										class="members_details",
										on:click=move |_| selected_student.set(Some(student.clone()))
									) {
										"View"
									}
								}
							}
						}
					}
				)
			}
		}
		(if filtered.get().is_empty() {
			view! { ctx, p(class="members_empty") { "No members match the selected filters." } }
		} else {
			view! { ctx, }
		})
		(if let Some(student) = (*selected_student.get()).clone() {
			view! { ctx, StudentDetailModal(student=student, selected=selected_student) }
		} else {
			view! { ctx, }
		})
	}
}

#[component]
pub fn MembersView<G: Html>(ctx: Scope<'_>) -> View<G> {
	set_page_title("Members");

	if !is_logged_in(ctx) {
		spawn_local_scoped(ctx, async {
			navigate(LOGIN_PATH);
		});
		return view! { ctx, };
	}

	view! {
		ctx,
		AdminLayout {
			Suspense(fallback=view! { ctx, p(class="members_loading") { "Loading members..." } }) {
				MembersLoadedView
			}
		}
	}
}
