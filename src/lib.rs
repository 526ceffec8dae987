// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camp registrar: registration backend for the summer camp site
//!
//! This crate resolves a signed-in camper's registration record against the
//! page they opened, persists new records to Firestore and tells the web
//! client where to go next.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{CamperStore, FirestoreDb};
use services::{CamperResolver, HttpAnalyticsSink, IdentityFanout, TracingSink};
use std::sync::Arc;

/// Shared application state.
pub struct AppState<S = FirestoreDb> {
    pub config: Config,
    pub resolver: CamperResolver<S>,
}

impl<S: CamperStore> AppState<S> {
    /// Build state with the sinks the configuration enables.
    pub fn new(config: Config, store: S) -> Self {
        let identity = identity_sinks(&config);
        Self::with_identity(config, store, identity)
    }

    pub fn with_identity(config: Config, store: S, identity: IdentityFanout) -> Self {
        let resolver = CamperResolver::new(
            store,
            config.majors.clone(),
            identity,
            config.main_site_url.clone(),
        );
        Self { config, resolver }
    }

    pub fn store(&self) -> &S {
        self.resolver.store()
    }
}

/// Structured logging always; HTTP analytics when a write key is set.
pub fn identity_sinks(config: &Config) -> IdentityFanout {
    let mut identity = IdentityFanout::default().with_sink(Arc::new(TracingSink));
    if let Some(write_key) = &config.analytics_write_key {
        identity = identity.with_sink(Arc::new(HttpAnalyticsSink::new(
            &config.analytics_endpoint,
            write_key.clone(),
        )));
    }
    identity
}
