// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP analytics sink speaking the Segment tracking API.
//!
//! Requests are spawned onto the runtime so the resolver never waits on
//! analytics delivery. Failures are logged and dropped.

use crate::error::AppError;
use crate::services::identity::{CampEvent, IdentitySink, Traits};
use serde::Serialize;
use serde_json::{Map, Value};

/// Segment-compatible analytics client.
#[derive(Clone)]
pub struct HttpAnalyticsSink {
    http: reqwest::Client,
    base_url: String,
    write_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentifyCall<'a> {
    user_id: &'a str,
    traits: &'a Traits,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackCall<'a> {
    user_id: &'a str,
    event: &'static str,
    properties: Map<String, Value>,
}

impl HttpAnalyticsSink {
    pub fn new(base_url: &str, write_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            write_key,
        }
    }

    /// POST one call and check the status.
    async fn send<T: Serialize>(&self, call: &str, body: &T) -> Result<(), AppError> {
        let url = format!("{}/{}", self.base_url, call);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.write_key, Option::<&str>::None)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Analytics(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Analytics(format!("HTTP {}: {}", status, body)))
    }

    /// Send in the background. Outside a runtime the call is dropped.
    fn dispatch<T: Serialize>(&self, call: &'static str, body: &T) {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(call, error = %e, "Failed to encode analytics call");
                return;
            }
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(call, "No async runtime; analytics call dropped");
            return;
        };

        let sink = self.clone();
        handle.spawn(async move {
            if let Err(e) = sink.send(call, &body).await {
                tracing::warn!(call, error = %e, "Analytics delivery failed");
            }
        });
    }
}

impl IdentitySink for HttpAnalyticsSink {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn identify(&self, user_id: &str, traits: &Traits) {
        self.dispatch("identify", &IdentifyCall { user_id, traits });
    }

    fn track(&self, user_id: &str, event: &CampEvent) {
        let call = TrackCall {
            user_id,
            event: event.name(),
            properties: event.properties(),
        };
        self.dispatch("track", &call);
    }
}
