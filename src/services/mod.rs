// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod analytics;
pub mod identity;
pub mod resolution;
pub mod resolver;
pub mod ui;

pub use analytics::HttpAnalyticsSink;
pub use identity::{CampEvent, IdentityFanout, IdentitySink, TracingSink, Traits};
pub use resolution::{decide, Outcome};
pub use resolver::{CamperResolver, Resolution};
pub use ui::{Directive, DirectiveRecorder, LoadingFlag, Navigator, Notifier};
