// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::components::field_error::FieldError;
use crate::dom::{clear_file_input, event_target_checked, event_target_file, event_target_value, focus_field};
use crate::files::{read_file, ObjectUrl};
use crate::page_utils::set_page_title;
use crate::pages::error::ErrorMessage;
use crate::session::PortalApi;
use crate::toasts::{show_toast, ToastData};
use chrono::Utc;
use gloo_timers::future::TimeoutFuture;
use nups_portal_shared::api::students::{Gender, MaritalStatus};
use nups_portal_shared::api::ApiError;
use nups_portal_shared::cache::{refresh_lookups, LookupCache};
use nups_portal_shared::config::PortalConfig;
use nups_portal_shared::form::{FormField, ProgramChoice, StudentForm, OUTSIDE_CAMPUS};
use nups_portal_shared::images::{compress_for_upload, CompressionSettings};
use std::time::Duration;
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use sycamore::suspense::Suspense;
use web_sys::Event as WebEvent;

const PICTURE_INPUT_ID: &str = "id_picture";
const VALIDATION_TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Prop)]
struct TextFieldProps<'a> {
	form: &'a Signal<StudentForm>,
	field: FormField,
	label: &'static str,
	input_type: &'static str,
	placeholder: &'static str,
}

#[component]
fn TextField<'a, G: Html>(ctx: Scope<'a>, props: TextFieldProps<'a>) -> View<G> {
	let form = props.form;
	let field = props.field;
	let value = create_selector(ctx, move || form.get().value(field));
	let input_class = create_selector(ctx, move || {
		if form.get().error(field).is_some() {
			"form_input error"
		} else {
			"form_input"
		}
	});

	view! {
		ctx,
		div(class="form_field") {
			label {
				span(class="form_label") { (props.label) }
				input(
					class=input_class.get(),
					type=props.input_type,
					name=field.name(),
					placeholder=props.placeholder,
					prop:value=(*value.get()).clone(),
					on:input=move |event: WebEvent| form.modify().set_text(field, &event_target_value(&event))
				)
			}
			FieldError(form=form, field=field)
		}
	}
}

/// A dropdown option that stays selected while the field holds its value
fn choice_option<'a, G: Html>(
	ctx: Scope<'a>,
	form: &'a Signal<StudentForm>,
	field: FormField,
	value: String,
	label: String,
) -> View<G> {
	let selected = {
		let value = value.clone();
		create_selector(ctx, move || form.get().value(field) == value)
	};
	view! {
		ctx,
		option(value=value, prop:selected=*selected.get()) { (label) }
	}
}

#[derive(Prop)]
struct SelectFieldProps<'a, G: Html> {
	form: &'a Signal<StudentForm>,
	field: FormField,
	label: &'static str,
	options: View<G>,
}

#[component]
fn SelectField<'a, G: Html>(ctx: Scope<'a>, props: SelectFieldProps<'a, G>) -> View<G> {
	let form = props.form;
	let field = props.field;
	let options = props.options;
	let select_class = create_selector(ctx, move || {
		if form.get().error(field).is_some() {
			"form_input error"
		} else {
			"form_input"
		}
	});

	view! {
		ctx,
		div(class="form_field") {
			label {
				span(class="form_label") { (props.label) }
				select(
					class=select_class.get(),
					name=field.name(),
					on:change=move |event: WebEvent| form.modify().set_text(field, &event_target_value(&event))
				) {
					(options)
				}
			}
			FieldError(form=form, field=field)
		}
	}
}

#[component]
async fn StudentFormLoadedView<G: Html>(ctx: Scope<'_>) -> View<G> {
	let api: &PortalApi = use_context(ctx);
	let config: &PortalConfig = use_context(ctx);
	let lookup_cache: &Signal<LookupCache> = use_context(ctx);

	let cached = (*lookup_cache.get()).clone();
	let lookups = match refresh_lookups(api, &cached, Utc::now(), config.lookup_stale_after).await {
		Ok(updated) => {
			let lookups = updated.lookups();
			lookup_cache.set(updated);
			lookups
		}
		Err(error) => {
			log::error!("Failed to load form options: {}", error);
			return view! {
				ctx,
				ErrorMessage(message="Failed to load form options. Please refresh the page", details=None)
			};
		}
	};

	let form = create_signal(ctx, StudentForm::default());
	let submitting = create_signal(ctx, false);
	let picture_preview: &Signal<Option<ObjectUrl>> = create_signal(ctx, None);

	let outside_campus = create_selector(ctx, || form.get().is_outside_campus());
	let other_program = create_selector(ctx, || form.get().program_choice() == ProgramChoice::Other);
	let wings_class = create_selector(ctx, || {
		if form.get().error(FormField::Wings).is_some() {
			"form_checkbox_group error"
		} else {
			"form_checkbox_group"
		}
	});
	let submit_label = create_memo(ctx, || if *submitting.get() { "Submitting..." } else { "Submit" });

	let gender_options = View::new_fragment(
		Gender::ALL
			.iter()
			.map(|gender| {
				let name = gender.as_str().to_string();
				choice_option(ctx, form, FormField::Gender, name.clone(), name)
			})
			.collect(),
	);
	let marital_status_options = View::new_fragment(
		MaritalStatus::ALL
			.iter()
			.map(|status| {
				let name = status.as_str().to_string();
				choice_option(ctx, form, FormField::MaritalStatus, name.clone(), name)
			})
			.collect(),
	);

	let mut residence_options = vec![choice_option(
		ctx,
		form,
		FormField::PlaceOfResidence,
		String::new(),
		String::from("Select your residence"),
	)];
	residence_options.extend(
		lookups
			.halls
			.iter()
			.map(|hall| choice_option(ctx, form, FormField::PlaceOfResidence, hall.name.clone(), hall.name.clone())),
	);
	residence_options.push(choice_option(
		ctx,
		form,
		FormField::PlaceOfResidence,
		String::from(OUTSIDE_CAMPUS),
		String::from(OUTSIDE_CAMPUS),
	));
	let residence_options = View::new_fragment(residence_options);

	let mut program_options = vec![choice_option(
		ctx,
		form,
		FormField::Program,
		ProgramChoice::Unselected.value(),
		String::from("Select your program"),
	)];
	program_options.extend(lookups.programs.iter().map(|program| {
		choice_option(
			ctx,
			form,
			FormField::Program,
			ProgramChoice::Listed(program.id).value(),
			program.name.clone(),
		)
	}));
	program_options.push(choice_option(
		ctx,
		form,
		FormField::Program,
		ProgramChoice::Other.value(),
		String::from("Other (not listed)"),
	));
	let program_options = View::new_fragment(program_options);

	let mut hall_options = vec![choice_option(
		ctx,
		form,
		FormField::Hall,
		String::from("0"),
		String::from("Select your hall of affiliation"),
	)];
	hall_options.extend(
		lookups
			.halls
			.iter()
			.map(|hall| choice_option(ctx, form, FormField::Hall, hall.id.to_string(), hall.name.clone())),
	);
	let hall_options = View::new_fragment(hall_options);

	let wing_checkboxes = View::new_fragment(
		lookups
			.wings
			.iter()
			.map(|wing| {
				let wing_id = wing.id;
				let wing_name = wing.name.clone();
				let checked = create_selector(ctx, move || form.get().wing_ids().contains(&wing_id));
				view! {
					ctx,
					label(class="form_checkbox") {
						input(
							type="checkbox",
							name=FormField::Wings.name(),
							value=wing_id.to_string(),
							prop:checked=*checked.get(),
							on:change=move |event: WebEvent| form.modify().toggle_wing(wing_id, event_target_checked(&event))
						)
						span { (wing_name) }
					}
				}
			})
			.collect(),
	);

	let picture_change_handler = move |event: WebEvent| {
		let Some(file) = event_target_file(&event) else {
			return;
		};
		picture_preview.set(ObjectUrl::for_file(&file));
		spawn_local_scoped(ctx, async move {
			match read_file(&file).await {
				Ok(picture) => {
					log::debug!("Chose picture {:?}", picture);
					form.modify().set_picture(picture);
				}
				Err(error) => {
					log::error!("{}", error);
					show_toast(ctx, ToastData::error("Couldn't read the chosen picture. Please choose it again."));
				}
			}
		});
	};

	let form_submission_handler = move |event: WebEvent| {
		event.prevent_default();
		if *submitting.get() {
			return;
		}

		let submission = match form.get().to_submission() {
			Ok(submission) => submission,
			Err(errors) => {
				let first_invalid = errors.first_field();
				form.modify().set_errors(errors);
				show_toast(
					ctx,
					ToastData::error("Please fix the errors below before submitting.").with_duration(VALIDATION_TOAST_DURATION),
				);
				if let Some(field) = first_invalid {
					focus_field(field.name());
				}
				return;
			}
		};

		submitting.set(true);
		spawn_local_scoped(ctx, async move {
			let mut submission = submission;
			let settings = CompressionSettings::default();
			if settings.should_compress(&submission.id_picture) {
				show_toast(ctx, ToastData::info("Compressing image for faster upload..."));
				// Lets the toast show before the page is busy compressing
				TimeoutFuture::new(0).await;
				submission.id_picture = compress_for_upload(submission.id_picture, &settings);
			}

			let api: &PortalApi = use_context(ctx);
			match api.submit_student(submission).await {
				Ok(profile) => {
					if let Some(profile) = profile {
						log::info!("Submitted profile {} for {}", profile.id, profile.display_name());
					}
					show_toast(ctx, ToastData::success("Profile submitted successfully! Thank you."));
					form.modify().reset();
					picture_preview.set(None);
					clear_file_input(PICTURE_INPUT_ID);
				}
				Err(ApiError::Rejected(field_errors)) if !field_errors.is_empty() => {
					log::warn!("Submission rejected with {} field errors", field_errors.len());
					let unmatched = form.modify().apply_server_errors(&field_errors);
					for (field, message) in unmatched {
						show_toast(ctx, ToastData::error(format!("{}: {}", field, message)));
					}
					let first_invalid = form.get().errors().first_field();
					if let Some(field) = first_invalid {
						show_toast(
							ctx,
							ToastData::error("Please fix the errors below before submitting.")
								.with_duration(VALIDATION_TOAST_DURATION),
						);
						focus_field(field.name());
					}
				}
				Err(error) => {
					log::error!("Submission failed: {}", error);
					show_toast(ctx, ToastData::error_with_details("Submission failed. Please try again.", error));
				}
			}
			submitting.set(false);
		});
	};

	view! {
		ctx,
		form(class="student_form", novalidate=true, on:submit=form_submission_handler) {
			section(class="form_section") {
				h2 { "Personal Details" }
				TextField(form=form, field=FormField::FirstName, label="First Name", input_type="text", placeholder="Enter your first name")
				TextField(form=form, field=FormField::LastName, label="Last Name", input_type="text", placeholder="Enter your last name")
				TextField(form=form, field=FormField::OtherName, label="Other Name(s)", input_type="text", placeholder="Optional")
				TextField(form=form, field=FormField::DateOfBirth, label="Date of Birth", input_type="date", placeholder="")
				SelectField(form=form, field=FormField::Gender, label="Gender", options=gender_options)
				SelectField(form=form, field=FormField::MaritalStatus, label="Marital Status", options=marital_status_options)
			}
			section(class="form_section") {
				h2 { "Contact Information" }
				TextField(form=form, field=FormField::Contact, label="Phone Number", input_type="tel", placeholder="0XXXXXXXXX")
				TextField(form=form, field=FormField::Email, label="Email", input_type="email", placeholder="you@example.com")
				SelectField(form=form, field=FormField::PlaceOfResidence, label="Place of Residence", options=residence_options)
				(if *outside_campus.get() {
					view! {
						ctx,
						TextField(
							form=form,
							field=FormField::ResidenceDetail,
							label="Residence Outside Campus",
							input_type="text",
							placeholder="Where do you live?"
						)
					}
				} else {
					view! { ctx, }
				})
			}
			section(class="form_section") {
				h2 { "Education & Affiliation" }
				SelectField(form=form, field=FormField::Program, label="Program of Study", options=program_options)
				(if *other_program.get() {
					view! {
						ctx,
						TextField(
							form=form,
							field=FormField::CustomProgramName,
							label="Program Name",
							input_type="text",
							placeholder="Enter your program"
						)
					}
				} else {
					view! { ctx, }
				})
				SelectField(form=form, field=FormField::Hall, label="Hall of Affiliation", options=hall_options)
				div(class="form_field") {
					span(class="form_label") { "Wings" }
					div(class=wings_class.get()) {
						(wing_checkboxes)
					}
					FieldError(form=form, field=FormField::Wings)
				}
			}
			section(class="form_section") {
				h2 { "Emergency Contact" }
				TextField(form=form, field=FormField::EmergencyName, label="Contact Name", input_type="text", placeholder="Full name")
				TextField(form=form, field=FormField::EmergencyPhone, label="Contact Phone", input_type="tel", placeholder="0XXXXXXXXX")
			}
			section(class="form_section") {
				h2 { "Profile Picture" }
				div(class="form_field") {
					label {
						span(class="form_label") { "ID Picture" }
						input(
							id=PICTURE_INPUT_ID,
							type="file",
							name=FormField::IdPicture.name(),
							accept="image/jpeg,image/png,image/gif,image/webp",
							on:change=picture_change_handler
						)
					}
					FieldError(form=form, field=FormField::IdPicture)
					(if let Some(preview) = picture_preview.get().as_ref() {
						let preview_url = preview.as_str().to_string();
						view! { ctx, img(class="picture_preview", src=preview_url, alt="Selected picture") }
					} else {
						view! { ctx, }
					})
				}
			}
			section(class="form_section form_submit") {
				button(type="submit", disabled=*submitting.get()) { (submit_label.get()) }
			}
		}
	}
}

#[component]
pub fn StudentFormView<G: Html>(ctx: Scope<'_>) -> View<G> {
	set_page_title("Membership Form");

	view! {
		ctx,
		div(class="student_form_page") {
			h1 { "NUPS Membership Form" }
			Suspense(fallback=view! { ctx, p(class="form_loading") { "Loading form..." } }) {
				StudentFormLoadedView
			}
		}
	}
}
