//! Camper record model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Registration record stored in Firestore, keyed by user id.
///
/// Field names on the wire are the camelCase names the web client reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(default)]
pub struct CamperRecord {
    /// Committed major. Written once; never changed afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    /// Set when the application has been finalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(
        rename = "facebookDisplayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub facebook_display_name: Option<String>,
    #[serde(rename = "facebookEmail", skip_serializing_if = "Option::is_none")]
    pub facebook_email: Option<String>,
    #[serde(rename = "facebookPhotoURL", skip_serializing_if = "Option::is_none")]
    pub facebook_photo_url: Option<String>,
    /// When the record was created (RFC 3339)
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl CamperRecord {
    /// Fresh record for a camper arriving on a major for the first time.
    pub fn arrival(user: &SessionUser, major: &str, created_at: String) -> Self {
        Self {
            major: Some(major.to_string()),
            submitted: None,
            firstname: None,
            lastname: None,
            facebook_display_name: user.display_name.clone(),
            facebook_email: user.email.clone(),
            facebook_photo_url: user.photo_url.clone(),
            created_at: Some(created_at),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted == Some(true)
    }

    /// Name shown to the camper: form name first, then the social profile name.
    pub fn display_name(&self) -> Option<String> {
        let full = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full.is_empty() {
            return Some(full);
        }
        self.facebook_display_name
            .as_ref()
            .filter(|name| !name.trim().is_empty())
            .cloned()
    }
}

/// The signed-in user the resolver runs for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUser {
    /// None when the session carries no usable id
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The user id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
