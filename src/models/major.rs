// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Majors and the path conventions built around them.
//!
//! Application pages live under `/{major}/step{N}`, the landing page of a
//! major is `/{major}`, and `/` is the application root.

/// Route a camper lands on when they try to switch majors.
pub const CHANGE_DENIED_PATH: &str = "/change_denied";

/// The fixed set of majors a camper can apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorCatalog {
    majors: Vec<String>,
}

impl Default for MajorCatalog {
    fn default() -> Self {
        Self::new(["design", "engineering", "product", "operation"])
    }
}

impl MajorCatalog {
    /// Build a catalog, dropping blanks and duplicates while keeping order.
    pub fn new<I, S>(majors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for major in majors {
            let major = major.as_ref().trim();
            if !major.is_empty() && !list.iter().any(|m| m == major) {
                list.push(major.to_string());
            }
        }
        Self { majors: list }
    }

    /// Parse a comma separated list such as `design,engineering`.
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn majors(&self) -> &[String] {
        &self.majors
    }

    pub fn contains(&self, major: &str) -> bool {
        self.majors.iter().any(|m| m == major)
    }

    /// Parse a navigation path against this catalog.
    pub fn parse_path<'a>(&self, raw: &'a str) -> CampPath<'a> {
        CampPath::parse(raw, self)
    }
}

/// A navigation path split into the parts the resolver cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampPath<'a> {
    /// First segment, if it names a known major.
    pub major: Option<&'a str>,
    /// `/` (or empty).
    pub is_app_root: bool,
    /// Exactly `/{major}`, with no step suffix.
    pub is_major_root: bool,
}

impl<'a> CampPath<'a> {
    fn parse(raw: &'a str, catalog: &MajorCatalog) -> Self {
        // Query string and fragment are not part of the route.
        let route = raw.split(['?', '#']).next().unwrap_or("");
        let route = route.trim_end_matches('/');

        let mut segments = route.split('/').filter(|s| !s.is_empty());
        let first = segments.next();
        let has_more = segments.next().is_some();

        let major = first.filter(|segment| catalog.contains(segment));

        Self {
            major,
            is_app_root: first.is_none(),
            is_major_root: major.is_some() && !has_more,
        }
    }
}

/// `/{major}/step{n}`
pub fn step_path(major: &str, step: u32) -> String {
    format!("/{}/step{}", major, step)
}

/// `/change_denied?major={attempted}`
pub fn change_denied_path(attempted: &str) -> String {
    format!(
        "{}?major={}",
        CHANGE_DENIED_PATH,
        urlencoding::encode(attempted)
    )
}
