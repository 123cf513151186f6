// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::components::toast_display::ToastDisplay;
use crate::pages::admin::dashboard::DashboardView;
use crate::pages::admin::members::MembersView;
use crate::pages::admin_login::AdminLoginView;
use crate::pages::not_found::NotFoundView;
use crate::pages::student_form::StudentFormView;
use crate::session::build_api;
use crate::toasts::ToastData;
use nups_portal_shared::cache::LookupCache;
use nups_portal_shared::config::PortalConfig;
use sycamore::prelude::*;
use sycamore_router::{HistoryIntegration, Route, Router};

#[derive(Route)]
enum AppRoutes {
	#[to("/")]
	StudentForm,
	#[to("/admin-login")]
	AdminLogin,
	#[to("/admin")]
	AdminDashboard,
	#[to("/admin/members")]
	AdminMembers,
	#[not_found]
	NotFound,
}

#[derive(Prop)]
pub struct AppProps {
	config: PortalConfig,
}

#[component]
pub fn App<G: Html>(ctx: Scope<'_>, props: AppProps) -> View<G> {
	provide_context(ctx, build_api(&props.config));
	provide_context(ctx, props.config);
	provide_context_ref(ctx, create_signal(ctx, LookupCache::default()));
	let toasts: &Signal<Vec<ToastData>> = create_signal(ctx, Vec::new());
	provide_context_ref(ctx, toasts);

	view! {
		ctx,
		Router(
			integration=HistoryIntegration::new(),
			view=|ctx, route: &ReadSignal<AppRoutes>| {
				view! {
					ctx,
					(match route.get().as_ref() {
						AppRoutes::StudentForm => view! { ctx, StudentFormView },
						AppRoutes::AdminLogin => view! { ctx, AdminLoginView },
						AppRoutes::AdminDashboard => view! { ctx, DashboardView },
						AppRoutes::AdminMembers => view! { ctx, MembersView },
						AppRoutes::NotFound => view! { ctx, NotFoundView }
					})
				}
			}
		)
		ToastDisplay
	}
}
