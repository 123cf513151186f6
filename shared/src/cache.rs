// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::api::lookups::{Hall, Program, Wing};
use crate::api::ApiError;
use crate::session::http::Transport;
use crate::session::{ApiClient, TokenStore};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

/// A list fetched from the backend along with when it was fetched
#[derive(Clone, Debug, PartialEq)]
pub struct CachedList<T> {
	pub items: Vec<T>,
	pub fetched_at: DateTime<Utc>,
}

impl<T> CachedList<T> {
	pub fn new(items: Vec<T>, fetched_at: DateTime<Utc>) -> Self {
		Self { items, fetched_at }
	}

	/// Whether the list was fetched less than `stale_after` before `now`. Lists from the future count as fresh.
	pub fn is_fresh(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
		match now.signed_duration_since(self.fetched_at).to_std() {
			Ok(age) => age < stale_after,
			Err(_) => true,
		}
	}
}

/// The dropdown options for the student form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookups {
	pub programs: Vec<Program>,
	pub halls: Vec<Hall>,
	pub wings: Vec<Wing>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupCache {
	programs: Option<CachedList<Program>>,
	halls: Option<CachedList<Hall>>,
	wings: Option<CachedList<Wing>>,
}

impl LookupCache {
	/// The cached options. Lists that were never fetched are empty.
	pub fn lookups(&self) -> Lookups {
		Lookups {
			programs: cached_items(&self.programs),
			halls: cached_items(&self.halls),
			wings: cached_items(&self.wings),
		}
	}

	pub fn is_fresh(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
		is_list_fresh(&self.programs, now, stale_after)
			&& is_list_fresh(&self.halls, now, stale_after)
			&& is_list_fresh(&self.wings, now, stale_after)
	}
}

fn cached_items<T: Clone>(list: &Option<CachedList<T>>) -> Vec<T> {
	list.as_ref().map(|list| list.items.clone()).unwrap_or_default()
}

fn is_list_fresh<T>(list: &Option<CachedList<T>>, now: DateTime<Utc>, stale_after: Duration) -> bool {
	list.as_ref().is_some_and(|list| list.is_fresh(now, stale_after))
}

async fn reuse_or_fetch<T: Clone>(
	cached: &Option<CachedList<T>>,
	now: DateTime<Utc>,
	stale_after: Duration,
	fetch: impl Future<Output = Result<Vec<T>, ApiError>>,
) -> Result<Option<CachedList<T>>, ApiError> {
	match cached {
		Some(list) if list.is_fresh(now, stale_after) => Ok(Some(list.clone())),
		_ => Ok(Some(CachedList::new(fetch.await?, now))),
	}
}

/// Brings the cache up to date, fetching the stale lists concurrently. Fresh lists are reused without a request.
pub async fn refresh_lookups<T: Transport, S: TokenStore>(
	api: &ApiClient<T, S>,
	cache: &LookupCache,
	now: DateTime<Utc>,
	stale_after: Duration,
) -> Result<LookupCache, ApiError> {
	let (programs, halls, wings) = futures::try_join!(
		reuse_or_fetch(&cache.programs, now, stale_after, api.programs()),
		reuse_or_fetch(&cache.halls, now, stale_after, api.halls()),
		reuse_or_fetch(&cache.wings, now, stale_after, api.wings()),
	)?;
	let cache = LookupCache { programs, halls, wings };
	let lookups = cache.lookups();
	log::info!(
		"Form options ready: {} programs, {} halls, {} wings",
		lookups.programs.len(),
		lookups.halls.len(),
		lookups.wings.len()
	);
	Ok(cache)
}
