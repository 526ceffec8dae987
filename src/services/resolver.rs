// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camper record resolution: the effects half.
//!
//! Runs once per page load: fetch the record, identify the camper, pick an
//! [`Outcome`] and apply it. Effect budget per run: at most one read, one
//! write, one navigation and one notice or modal; exactly one identify.

use crate::db::CamperStore;
use crate::error::AppError;
use crate::models::major::{change_denied_path, step_path};
use crate::models::{CamperRecord, MajorCatalog, SessionUser};
use crate::services::identity::{CampEvent, IdentityFanout};
use crate::services::resolution::{decide, Outcome};
use crate::services::ui::{LoadingFlag, LoadingGuard, Modal, ModalAction, Navigator, Notifier};
use crate::time_utils::format_utc_rfc3339;

const LOADING_TEXT: &str = "Loading your application...";
const TRANSIENT_ERROR_TEXT: &str =
    "Something went wrong while loading your application. Please refresh and try again.";

/// How a resolution ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No user id; nothing was done.
    Skipped,
    /// The outcome was applied in full.
    Applied(Outcome),
    /// A remote call failed; the camper was shown an error notice.
    Failed { error: String },
}

/// Resolves a camper's record against the page they opened.
#[derive(Clone)]
pub struct CamperResolver<S> {
    store: S,
    majors: MajorCatalog,
    identity: IdentityFanout,
    loading: LoadingFlag,
    main_site_url: String,
}

impl<S: CamperStore> CamperResolver<S> {
    pub fn new(
        store: S,
        majors: MajorCatalog,
        identity: IdentityFanout,
        main_site_url: String,
    ) -> Self {
        Self {
            store,
            majors,
            identity,
            loading: LoadingFlag::default(),
            main_site_url,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn majors(&self) -> &MajorCatalog {
        &self.majors
    }

    pub fn identity(&self) -> &IdentityFanout {
        &self.identity
    }

    pub fn loading_flag(&self) -> &LoadingFlag {
        &self.loading
    }

    /// Run the procedure for `user` on `path`.
    ///
    /// Never returns an error: remote failures are shown to the camper,
    /// reported to the error sinks and ended without retry.
    pub async fn resolve<U>(&self, user: &SessionUser, path: &str, ui: &U) -> Resolution
    where
        U: Navigator + Notifier,
    {
        let _loading = LoadingGuard::acquire(&self.loading, ui, LOADING_TEXT);

        let Some(user_id) = user.id() else {
            // Callers authenticate before resolving; this is a bug upstream.
            tracing::error!(path, error = %AppError::AuthenticationMissing, "Resolution aborted");
            return Resolution::Skipped;
        };

        match self.run(user_id, user, path, ui).await {
            Ok(outcome) => {
                tracing::info!(user_id, path, outcome = outcome.kind(), "Camper resolved");
                Resolution::Applied(outcome)
            }
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(user_id, path, error = %e, "Camper resolution failed");
                } else {
                    tracing::error!(user_id, path, error = %e, "Camper resolution failed");
                }
                ui.error(TRANSIENT_ERROR_TEXT);
                self.identity.capture_error(Some(user_id), &e);
                Resolution::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run<U>(
        &self,
        user_id: &str,
        user: &SessionUser,
        path: &str,
        ui: &U,
    ) -> Result<Outcome, AppError>
    where
        U: Navigator + Notifier,
    {
        let parsed = self.majors.parse_path(path);

        // Identify even when the read fails.
        let fetched = self.store.get_camper(user_id).await;
        self.identity.identify(user);
        let record = fetched?;

        let outcome = decide(record.as_ref(), &parsed);
        tracing::debug!(user_id, outcome = outcome.kind(), "Outcome decided");

        self.apply(user_id, user, record.as_ref(), &outcome, ui).await?;
        Ok(outcome)
    }

    async fn apply<U>(
        &self,
        user_id: &str,
        user: &SessionUser,
        record: Option<&CamperRecord>,
        outcome: &Outcome,
        ui: &U,
    ) -> Result<(), AppError>
    where
        U: Navigator + Notifier,
    {
        match outcome {
            Outcome::Noop => {}

            Outcome::CreateRecord {
                major,
                to_first_step,
            } => {
                let now = format_utc_rfc3339(chrono::Utc::now());
                let new_record = CamperRecord::arrival(user, major, now);
                self.store.create_camper(user_id, &new_record).await?;
                self.track(user_id, CampEvent::Arrived {
                    major: major.clone(),
                });
                if *to_first_step {
                    ui.navigate(&step_path(major, 1)).await?;
                }
            }

            Outcome::RedirectToMajor { major } => {
                // Notices follow a successful navigation; a failure shows only the error.
                ui.navigate(&step_path(major, 1)).await?;
                ui.info(&format!(
                    "Welcome back! Taking you to your {} application.",
                    major
                ));
            }

            Outcome::BackfillMajor { major } => {
                tracing::error!(
                    severity = "critical",
                    user_id,
                    major = %major,
                    "Camper record has no major; backfilling from path"
                );
                self.track(user_id, CampEvent::MajorMissingInRecord {
                    major: major.clone(),
                });
                self.store.merge_camper_major(user_id, major).await?;
                ui.navigate(&step_path(major, 1)).await?;
            }

            Outcome::ShowSubmitted { major } => {
                self.track(user_id, CampEvent::ReturnedAfterSubmitted {
                    major: major.clone(),
                });
                let name = record
                    .and_then(CamperRecord::display_name)
                    .or_else(|| user.display_name.clone())
                    .unwrap_or_else(|| "Camper".to_string());
                ui.show_modal(self.submitted_modal(&name, major));
            }

            Outcome::DenyChange {
                committed,
                attempted,
            } => {
                ui.navigate(&change_denied_path(attempted)).await?;
                ui.warn(&format!(
                    "You have already applied to {}. Switching to {} is not allowed.",
                    committed, attempted
                ));
                self.track(user_id, CampEvent::ChangeDenied {
                    old_major: committed.clone(),
                    new_major: attempted.clone(),
                });
            }

            Outcome::Returned {
                major,
                to_first_step,
            } => {
                if *to_first_step {
                    ui.navigate(&step_path(major, 1)).await?;
                }
                self.track(user_id, CampEvent::Returned {
                    major: major.clone(),
                });
            }
        }

        Ok(())
    }

    fn track(&self, user_id: &str, event: CampEvent) {
        self.identity.track(user_id, &event);
    }

    fn submitted_modal(&self, name: &str, major: &str) -> Modal {
        Modal {
            title: "Application submitted".to_string(),
            content: format!(
                "{}, your application to the {} track has been submitted. \
                 We will be in touch soon.",
                name, major
            ),
            actions: vec![ModalAction {
                label: "Back to the camp site".to_string(),
                href: self.main_site_url.clone(),
            }],
        }
    }
}
