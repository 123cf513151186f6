// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nups_portal_shared::form::{FormField, StudentForm};
use sycamore::prelude::*;

#[derive(Prop)]
pub struct FieldErrorProps<'a> {
	form: &'a Signal<StudentForm>,
	field: FormField,
}

/// Shows the validation message for a form field, if it has one
#[component]
pub fn FieldError<'a, G: Html>(ctx: Scope<'a>, props: FieldErrorProps<'a>) -> View<G> {
	let form = props.form;
	let field = props.field;
	let message = create_memo(ctx, move || form.get().error(field).map(String::from));

	view! {
		ctx,
		(if let Some(message) = (*message.get()).clone() {
			view! {
				ctx,
				p(class="field_error") { (message) }
			}
		} else {
			view! { ctx, }
		})
	}
}
