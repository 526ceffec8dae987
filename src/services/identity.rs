// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity, analytics and error-tracking fan-out.
//!
//! Every collaborator that wants to know who the camper is implements
//! [`IdentitySink`]; [`IdentityFanout`] calls them all the same way.

use crate::error::AppError;
use crate::models::SessionUser;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Analytics events emitted by the resolver.
///
/// The names are a contract with the dashboards and must not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampEvent {
    Arrived { major: String },
    Returned { major: String },
    ReturnedAfterSubmitted { major: String },
    MajorMissingInRecord { major: String },
    ChangeDenied { old_major: String, new_major: String },
}

impl CampEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CampEvent::Arrived { .. } => "Arrived",
            CampEvent::Returned { .. } => "Returned",
            CampEvent::ReturnedAfterSubmitted { .. } => "Returned after Submitted",
            CampEvent::MajorMissingInRecord { .. } => "Major Missing In Record",
            CampEvent::ChangeDenied { .. } => "Change Denied",
        }
    }

    pub fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        match self {
            CampEvent::Arrived { major }
            | CampEvent::Returned { major }
            | CampEvent::ReturnedAfterSubmitted { major }
            | CampEvent::MajorMissingInRecord { major } => {
                props.insert("major".to_string(), Value::from(major.as_str()));
            }
            CampEvent::ChangeDenied {
                old_major,
                new_major,
            } => {
                props.insert("oldMajor".to_string(), Value::from(old_major.as_str()));
                props.insert("newMajor".to_string(), Value::from(new_major.as_str()));
            }
        }
        props
    }
}

/// Profile traits sent with `identify`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Traits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&SessionUser> for Traits {
    fn from(user: &SessionUser) -> Self {
        Self {
            name: user.display_name.clone(),
            email: user.email.clone(),
            avatar: user.photo_url.clone(),
        }
    }
}

/// An analytics or error-tracking collaborator.
///
/// Calls are fire-and-forget: a sink must not block the resolver and
/// reports its own delivery failures.
pub trait IdentitySink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn identify(&self, user_id: &str, traits: &Traits);

    fn track(&self, user_id: &str, event: &CampEvent);

    /// Attach the user to subsequent error reports.
    fn set_error_context(&self, _user: &SessionUser) {}

    /// Report a failure that ended a resolution.
    fn capture_error(&self, _user_id: Option<&str>, _error: &AppError) {}
}

/// The list of sinks, invoked uniformly.
#[derive(Clone, Default)]
pub struct IdentityFanout {
    sinks: Vec<Arc<dyn IdentitySink>>,
}

impl IdentityFanout {
    pub fn new(sinks: Vec<Arc<dyn IdentitySink>>) -> Self {
        Self { sinks }
    }

    pub fn with_sink(mut self, sink: Arc<dyn IdentitySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Identify the user everywhere and bind them to error reports.
    pub fn identify(&self, user: &SessionUser) {
        let Some(user_id) = user.id() else {
            return;
        };
        let traits = Traits::from(user);
        for sink in &self.sinks {
            sink.identify(user_id, &traits);
            sink.set_error_context(user);
        }
    }

    pub fn track(&self, user_id: &str, event: &CampEvent) {
        for sink in &self.sinks {
            sink.track(user_id, event);
        }
    }

    pub fn capture_error(&self, user_id: Option<&str>, error: &AppError) {
        for sink in &self.sinks {
            sink.capture_error(user_id, error);
        }
    }
}

/// Sink that writes identities, events and errors to the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl IdentitySink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn identify(&self, user_id: &str, traits: &Traits) {
        tracing::debug!(user_id, name = ?traits.name, "Camper identified");
    }

    fn track(&self, user_id: &str, event: &CampEvent) {
        tracing::info!(
            user_id,
            event = event.name(),
            properties = %serde_json::Value::Object(event.properties()),
            "Analytics event"
        );
    }

    fn set_error_context(&self, user: &SessionUser) {
        tracing::debug!(
            user_id = user.id(),
            email = user.email.as_deref(),
            "Error context bound to camper"
        );
    }

    fn capture_error(&self, user_id: Option<&str>, error: &AppError) {
        tracing::error!(user_id, error = %error, "Camper resolution failed");
    }
}
