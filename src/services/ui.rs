// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! UI collaborators: navigation, notices and the loading indicator.
//!
//! The resolver runs server side, so [`DirectiveRecorder`] collects what
//! the browser should do and the API hands the list back to the client.

use crate::error::AppError;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Client-side route changes.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Transient messages, modals and the loading indicator.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, text: &str);

    fn show_modal(&self, modal: Modal);

    fn show_loading(&self, text: &str);

    fn dismiss_loading(&self);

    fn info(&self, text: &str) {
        self.notify(NoticeLevel::Info, text);
    }

    fn warn(&self, text: &str) {
        self.notify(NoticeLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.notify(NoticeLevel::Error, text);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Modal dialog content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Modal {
    pub title: String,
    pub content: String,
    pub actions: Vec<ModalAction>,
}

/// A link button at the bottom of a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModalAction {
    pub label: String,
    pub href: String,
}

/// One UI effect for the browser to apply, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    Navigate { path: String },
    Notice { level: NoticeLevel, text: String },
    Modal { modal: Modal },
}

/// Records UI effects for one request.
#[derive(Debug, Default)]
pub struct DirectiveRecorder {
    directives: Mutex<Vec<Directive>>,
    loading: AtomicBool,
}

impl DirectiveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Directive>> {
        // A poisoned list is still a valid list.
        self.directives
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, directive: Directive) {
        self.lock().push(directive);
    }

    pub fn directives(&self) -> Vec<Directive> {
        self.lock().clone()
    }

    pub fn into_directives(self) -> Vec<Directive> {
        self.directives
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a loading indicator is currently shown.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

impl Navigator for DirectiveRecorder {
    async fn navigate(&self, path: &str) -> Result<(), AppError> {
        if !path.starts_with('/') {
            return Err(AppError::Navigation(format!("not an app route: {}", path)));
        }
        self.push(Directive::Navigate {
            path: path.to_string(),
        });
        Ok(())
    }
}

impl Notifier for DirectiveRecorder {
    fn notify(&self, level: NoticeLevel, text: &str) {
        self.push(Directive::Notice {
            level,
            text: text.to_string(),
        });
    }

    fn show_modal(&self, modal: Modal) {
        self.push(Directive::Modal { modal });
    }

    fn show_loading(&self, _text: &str) {
        self.loading.store(true, Ordering::SeqCst);
    }

    fn dismiss_loading(&self) {
        self.loading.store(false, Ordering::SeqCst);
    }
}

/// Process-wide "resolution in progress" indicator.
///
/// Not a lock: overlapping resolutions each set it and the first to
/// finish clears it.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }
}

/// Holds the loading indicator up until dropped.
#[must_use = "the loading indicator is released when the guard is dropped"]
pub struct LoadingGuard<'a, N: Notifier> {
    flag: &'a LoadingFlag,
    notifier: &'a N,
}

impl<'a, N: Notifier> LoadingGuard<'a, N> {
    pub fn acquire(flag: &'a LoadingFlag, notifier: &'a N, text: &str) -> Self {
        flag.set(true);
        notifier.show_loading(text);
        Self { flag, notifier }
    }
}

impl<N: Notifier> Drop for LoadingGuard<'_, N> {
    fn drop(&mut self) {
        self.notifier.dismiss_loading();
        self.flag.set(false);
    }
}
