// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod api;
pub mod cache;
pub mod config;
pub mod dates;
pub mod export;
pub mod form;
pub mod images;
pub mod members;
pub mod session;
pub mod stats;
pub mod upload;
