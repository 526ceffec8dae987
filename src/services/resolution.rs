// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camper record resolution: the decision half.
//!
//! [`decide`] looks at the stored record (if any) and the parsed path and
//! picks exactly one [`Outcome`]. It does no I/O; `CamperResolver` applies
//! the outcome.

use crate::models::{CampPath, CamperRecord};

/// What to do for this page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do (non-major page, or no record and no major in the path).
    Noop,
    /// First visit: create the record. `to_first_step` when at the major root.
    CreateRecord { major: String, to_first_step: bool },
    /// Committed camper opened the app root; send them to their application.
    RedirectToMajor { major: String },
    /// Record exists without a major; fill it in from the path.
    BackfillMajor { major: String },
    /// Application already finalized; show the summary.
    ShowSubmitted { major: String },
    /// Camper tried to open a different major than the one committed to.
    DenyChange { committed: String, attempted: String },
    /// Returning camper on their own major.
    Returned { major: String, to_first_step: bool },
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Noop => "noop",
            Outcome::CreateRecord { .. } => "create_record",
            Outcome::RedirectToMajor { .. } => "redirect_to_major",
            Outcome::BackfillMajor { .. } => "backfill_major",
            Outcome::ShowSubmitted { .. } => "show_submitted",
            Outcome::DenyChange { .. } => "deny_change",
            Outcome::Returned { .. } => "returned",
        }
    }

    /// Whether applying this outcome writes the record.
    pub fn writes_record(&self) -> bool {
        matches!(
            self,
            Outcome::CreateRecord { .. } | Outcome::BackfillMajor { .. }
        )
    }
}

/// Pick the outcome for a record snapshot and the current path.
///
/// Guards are checked in order and the first match wins. A major mismatch
/// is checked before the submitted flag so a submitted camper probing
/// another major is still denied rather than shown their summary.
pub fn decide(record: Option<&CamperRecord>, path: &CampPath<'_>) -> Outcome {
    let Some(record) = record else {
        return match path.major {
            Some(major) => Outcome::CreateRecord {
                major: major.to_string(),
                to_first_step: path.is_major_root,
            },
            None => Outcome::Noop,
        };
    };

    if let (Some(major), true) = (record.major.as_deref(), path.is_app_root) {
        return Outcome::RedirectToMajor {
            major: major.to_string(),
        };
    }

    let Some(path_major) = path.major else {
        return Outcome::Noop;
    };

    let Some(committed) = record.major.as_deref() else {
        return Outcome::BackfillMajor {
            major: path_major.to_string(),
        };
    };

    if committed != path_major {
        return Outcome::DenyChange {
            committed: committed.to_string(),
            attempted: path_major.to_string(),
        };
    }

    if record.is_submitted() {
        return Outcome::ShowSubmitted {
            major: committed.to_string(),
        };
    }

    Outcome::Returned {
        major: committed.to_string(),
        to_first_step: path.is_major_root,
    }
}
