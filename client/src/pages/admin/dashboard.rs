// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::components::admin_layout::AdminLayout;
use crate::page_utils::set_page_title;
use crate::session::{is_logged_in, PortalApi, LOGIN_PATH};
use crate::toasts::{show_toast, ToastData};
use chrono::{Local, Utc};
use nups_portal_shared::api::ApiError;
use nups_portal_shared::dates::format_full_date;
use nups_portal_shared::stats::DashboardStats;
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use sycamore::suspense::Suspense;
use sycamore_router::navigate;

#[derive(Prop)]
struct StatCardsProps {
	total: String,
	today: String,
	male: String,
	female: String,
}

#[component]
fn StatCards<G: Html>(ctx: Scope, props: StatCardsProps) -> View<G> {
	let today_date = format_full_date(Local::now().date_naive());
	let StatCardsProps {
		total,
		today,
		male,
		female,
	} = props;

	view! {
		ctx,
		div(class="dashboard_cards") {
			div(class="dashboard_card") {
				h2 { "Total Members" }
				p(class="dashboard_card_value") { (total) }
			}
			div(class="dashboard_card") {
				h2 { "Today's Submissions" }
				p(class="dashboard_card_value") { (today) }
				p(class="dashboard_card_note") { (today_date) }
			}
			div(class="dashboard_card") {
				h2 { "Gender Breakdown" }
				dl(class="dashboard_gender") {
					dt { "Male" }
					dd { (male) }
					dt { "Female" }
					dd { (female) }
				}
			}
		}
	}
}

#[component]
async fn DashboardLoadedView<G: Html>(ctx: Scope<'_>) -> View<G> {
	let api: &PortalApi = use_context(ctx);

	let stats = match api.students().await {
		Ok(students) => DashboardStats::from_students(&students, Utc::now().date_naive()),
		// Already redirecting to the login page
		Err(ApiError::SessionExpired) => DashboardStats::default(),
		Err(error) => {
			log::error!("Failed to load dashboard stats: {}", error);
			show_toast(ctx, ToastData::error_with_details("Failed to load dashboard data.", error));
			DashboardStats::default()
		}
	};

	view! {
		ctx,
		StatCards(
			total=stats.total.to_string(),
			today=stats.today.to_string(),
			male=stats.male.to_string(),
			female=stats.female.to_string()
		)
	}
}

#[component]
pub fn DashboardView<G: Html>(ctx: Scope<'_>) -> View<G> {
	set_page_title("Dashboard");

	if !is_logged_in(ctx) {
		spawn_local_scoped(ctx, async {
			navigate(LOGIN_PATH);
		});
		return view! { ctx, };
	}

	view! {
		ctx,
		AdminLayout {
			h1 { "Dashboard" }
			Suspense(
				fallback=view! {
					ctx,
					StatCards(
						total="...".to_string(),
						today="...".to_string(),
						male="...".to_string(),
						female="...".to_string()
					)
				}
			) {
				DashboardLoadedView
			}
		}
	}
}
