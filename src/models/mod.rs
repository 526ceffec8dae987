// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod camper;
pub mod major;

pub use camper::{CamperRecord, SessionUser};
pub use major::{CampPath, MajorCatalog};
