// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end resolution tests against the in-memory store.
//!
//! Each test seeds a record (or not), resolves a path and checks the
//! writes, navigation, notices and analytics that came out.

use camp_registrar::models::{CamperRecord, SessionUser};
use camp_registrar::services::ui::NoticeLevel;
use camp_registrar::services::{
    CampEvent, Directive, DirectiveRecorder, Outcome, Resolution,
};

mod common;
use common::{test_resolver, BrokenNavigator, SinkCall};

fn camper() -> SessionUser {
    SessionUser {
        id: Some("camper-1".to_string()),
        display_name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        photo_url: Some("https://example.com/ada.png".to_string()),
    }
}

fn record(major: Option<&str>, submitted: Option<bool>) -> CamperRecord {
    CamperRecord {
        major: major.map(str::to_string),
        submitted,
        ..Default::default()
    }
}

fn navigations(directives: &[Directive]) -> Vec<String> {
    directives
        .iter()
        .filter_map(|d| match d {
            Directive::Navigate { path } => Some(path.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_new_camper_on_major_root_creates_and_navigates() {
    let (resolver, store, sink) = test_resolver();
    let ui = DirectiveRecorder::new();

    let resolution = resolver.resolve(&camper(), "/design", &ui).await;

    assert!(matches!(
        resolution,
        Resolution::Applied(Outcome::CreateRecord { .. })
    ));
    let stored = store.record("camper-1").expect("record created");
    assert_eq!(stored.major.as_deref(), Some("design"));
    assert_eq!(stored.facebook_display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(stored.facebook_email.as_deref(), Some("ada@example.com"));
    assert!(stored.created_at.is_some());
    assert_eq!(store.writes(), 1);

    assert_eq!(navigations(&ui.directives()), ["/design/step1"]);
    assert_eq!(sink.event_names(), ["Arrived"]);
}

#[tokio::test]
async fn test_new_camper_mid_application_is_not_moved() {
    let (resolver, store, sink) = test_resolver();
    let ui = DirectiveRecorder::new();

    resolver
        .resolve(&camper(), "/engineering/step2", &ui)
        .await;

    let stored = store.record("camper-1").expect("record created");
    assert_eq!(stored.major.as_deref(), Some("engineering"));
    assert!(ui.directives().is_empty());
    assert_eq!(
        sink.events(),
        [CampEvent::Arrived {
            major: "engineering".to_string()
        }]
    );
}

#[tokio::test]
async fn test_new_camper_off_major_does_nothing() {
    let (resolver, store, sink) = test_resolver();
    let ui = DirectiveRecorder::new();

    let resolution = resolver.resolve(&camper(), "/about", &ui).await;

    assert_eq!(resolution, Resolution::Applied(Outcome::Noop));
    assert_eq!(store.writes(), 0);
    assert!(ui.directives().is_empty());
    assert!(sink.events().is_empty());
    // Identify still happens
    assert_eq!(sink.identify_count(), 1);
}

#[tokio::test]
async fn test_committed_camper_at_root_is_redirected() {
    for submitted in [None, Some(true)] {
        let (resolver, store, _sink) = test_resolver();
        store.insert("camper-1", record(Some("product"), submitted));
        let ui = DirectiveRecorder::new();

        resolver.resolve(&camper(), "/", &ui).await;

        let directives = ui.directives();
        assert_eq!(navigations(&directives), ["/product/step1"]);
        assert!(matches!(
            &directives[1],
            Directive::Notice {
                level: NoticeLevel::Info,
                ..
            }
        ));
        assert_eq!(store.writes(), 0);
    }
}

#[tokio::test]
async fn test_returning_camper_on_major_root() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(Some("design"), None));
    let ui = DirectiveRecorder::new();

    resolver.resolve(&camper(), "/design", &ui).await;

    assert_eq!(navigations(&ui.directives()), ["/design/step1"]);
    assert_eq!(
        sink.events(),
        [CampEvent::Returned {
            major: "design".to_string()
        }]
    );
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_missing_major_is_backfilled() {
    let (resolver, store, sink) = test_resolver();
    store.insert(
        "camper-1",
        CamperRecord {
            firstname: Some("Ada".to_string()),
            ..Default::default()
        },
    );
    let ui = DirectiveRecorder::new();

    resolver
        .resolve(&camper(), "/engineering/step3", &ui)
        .await;

    let stored = store.record("camper-1").unwrap();
    assert_eq!(stored.major.as_deref(), Some("engineering"));
    assert_eq!(stored.firstname.as_deref(), Some("Ada"));
    assert_eq!(store.writes(), 1);
    assert_eq!(navigations(&ui.directives()), ["/engineering/step1"]);
    assert_eq!(sink.event_names(), ["Major Missing In Record"]);
}

#[tokio::test]
async fn test_submitted_camper_sees_summary() {
    let (resolver, store, sink) = test_resolver();
    store.insert(
        "camper-1",
        CamperRecord {
            major: Some("design".to_string()),
            submitted: Some(true),
            firstname: Some("Grace".to_string()),
            lastname: Some("Hopper".to_string()),
            ..Default::default()
        },
    );
    let ui = DirectiveRecorder::new();

    resolver.resolve(&camper(), "/design/step2", &ui).await;

    let directives = ui.directives();
    assert_eq!(directives.len(), 1);
    let Directive::Modal { modal } = &directives[0] else {
        panic!("expected a modal, got {:?}", directives[0]);
    };
    assert!(modal.content.contains("Grace Hopper"));
    assert!(modal.content.contains("design"));
    assert_eq!(modal.actions[0].href, "https://camp.example.com");

    assert_eq!(store.writes(), 0);
    assert_eq!(sink.event_names(), ["Returned after Submitted"]);
}

#[tokio::test]
async fn test_switching_major_is_denied_without_write() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(Some("design"), Some(true)));
    let ui = DirectiveRecorder::new();

    resolver.resolve(&camper(), "/engineering", &ui).await;

    let directives = ui.directives();
    assert!(matches!(
        &directives[1],
        Directive::Notice {
            level: NoticeLevel::Warning,
            ..
        }
    ));
    assert_eq!(
        navigations(&directives),
        ["/change_denied?major=engineering"]
    );
    assert_eq!(
        sink.events(),
        [CampEvent::ChangeDenied {
            old_major: "design".to_string(),
            new_major: "engineering".to_string(),
        }]
    );
    assert_eq!(store.writes(), 0);
    assert_eq!(store.record("camper-1").unwrap().major.as_deref(), Some("design"));
}

#[tokio::test]
async fn test_repeat_resolution_is_idempotent() {
    let (resolver, store, _sink) = test_resolver();
    let seeded = record(Some("design"), Some(false));
    store.insert("camper-1", seeded.clone());

    // Landing on the major root moves the camper to step 1 ...
    let first = DirectiveRecorder::new();
    resolver.resolve(&camper(), "/design", &first).await;
    assert_eq!(navigations(&first.directives()), ["/design/step1"]);

    // ... and resolving again on that page leaves them there.
    let second = DirectiveRecorder::new();
    resolver.resolve(&camper(), "/design/step1", &second).await;
    assert!(navigations(&second.directives()).is_empty());

    assert_eq!(store.writes(), 0);
    assert_eq!(store.record("camper-1"), Some(seeded));
}

#[tokio::test]
async fn test_missing_user_id_has_no_side_effects() {
    let (resolver, store, sink) = test_resolver();
    let ui = DirectiveRecorder::new();

    let anonymous = SessionUser {
        id: Some(String::new()),
        ..camper()
    };
    let resolution = resolver.resolve(&anonymous, "/design", &ui).await;

    assert_eq!(resolution, Resolution::Skipped);
    assert_eq!(store.reads(), 0);
    assert_eq!(store.writes(), 0);
    assert!(ui.directives().is_empty());
    assert!(sink.calls().is_empty());
    assert!(!resolver.loading_flag().is_set());
}

#[tokio::test]
async fn test_store_failure_shows_error_and_reports() {
    let (resolver, store, sink) = test_resolver();
    store.set_failing(true);
    let ui = DirectiveRecorder::new();

    let resolution = resolver.resolve(&camper(), "/design", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    assert_eq!(
        ui.directives(),
        [Directive::Notice {
            level: NoticeLevel::Error,
            text: "Something went wrong while loading your application. Please refresh and try again."
                .to_string(),
        }]
    );
    // Identified once even though the read failed, then reported
    assert_eq!(sink.identify_count(), 1);
    assert_eq!(sink.errors().len(), 1);
    assert_eq!(store.reads(), 1);
    assert!(!resolver.loading_flag().is_set());
    assert!(!ui.is_loading());
}

#[tokio::test]
async fn test_navigation_failure_is_terminal() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(Some("design"), None));
    let ui = BrokenNavigator::default();

    let resolution = resolver.resolve(&camper(), "/design", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    // No "Returned" event: the run stopped at the failed navigation
    assert!(sink.events().is_empty());
    assert!(matches!(
        sink.calls().last(),
        Some(SinkCall::Error(Some(id), _)) if id == "camper-1"
    ));
    assert!(matches!(
        ui.inner.directives().as_slice(),
        [Directive::Notice {
            level: NoticeLevel::Error,
            ..
        }]
    ));
    assert!(!resolver.loading_flag().is_set());
}

#[tokio::test]
async fn test_identify_fans_out_once_with_error_context() {
    let (resolver, _store, sink) = test_resolver();
    let ui = DirectiveRecorder::new();

    resolver.resolve(&camper(), "/design/step1", &ui).await;

    assert_eq!(
        sink.calls()[..2],
        [
            SinkCall::Identify("camper-1".to_string()),
            SinkCall::ErrorContext("camper-1".to_string()),
        ]
    );
    assert_eq!(sink.identify_count(), 1);
}

fn error_notice_count(directives: &[Directive]) -> usize {
    directives
        .iter()
        .filter(|d| {
            matches!(
                d,
                Directive::Notice {
                    level: NoticeLevel::Error,
                    ..
                }
            )
        })
        .count()
}

fn notice_count(directives: &[Directive]) -> usize {
    directives
        .iter()
        .filter(|d| matches!(d, Directive::Notice { .. }))
        .count()
}

#[tokio::test]
async fn test_failed_redirect_shows_only_the_error() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(Some("design"), None));
    let ui = BrokenNavigator::default();

    let resolution = resolver.resolve(&camper(), "/", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    let directives = ui.inner.directives();
    assert_eq!(notice_count(&directives), 1);
    assert_eq!(error_notice_count(&directives), 1);
    assert!(sink.events().is_empty());
    assert!(!resolver.loading_flag().is_set());
}

#[tokio::test]
async fn test_failed_change_denied_navigation_shows_only_the_error() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(Some("design"), None));
    let ui = BrokenNavigator::default();

    let resolution = resolver.resolve(&camper(), "/engineering", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    let directives = ui.inner.directives();
    assert_eq!(notice_count(&directives), 1);
    assert_eq!(error_notice_count(&directives), 1);
    // Not tracked: the camper never reached the denied page
    assert!(sink.events().is_empty());
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_failed_create_is_not_tracked() {
    let (resolver, store, sink) = test_resolver();
    store.set_failing_writes(true);
    let ui = DirectiveRecorder::new();

    let resolution = resolver.resolve(&camper(), "/design", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    let directives = ui.directives();
    assert_eq!(notice_count(&directives), 1);
    assert_eq!(error_notice_count(&directives), 1);
    assert!(navigations(&directives).is_empty());
    assert!(!sink.event_names().contains(&"Arrived"));
    assert_eq!(sink.errors().len(), 1);
    assert_eq!(store.writes(), 0);
    assert_eq!(store.record("camper-1"), None);
    assert!(!resolver.loading_flag().is_set());
    assert!(!ui.is_loading());
}

#[tokio::test]
async fn test_failed_backfill_stops_before_navigation() {
    let (resolver, store, sink) = test_resolver();
    store.insert("camper-1", record(None, None));
    store.set_failing_writes(true);
    let ui = DirectiveRecorder::new();

    let resolution = resolver.resolve(&camper(), "/design/step2", &ui).await;

    assert!(matches!(resolution, Resolution::Failed { .. }));
    let directives = ui.directives();
    assert_eq!(error_notice_count(&directives), 1);
    assert!(navigations(&directives).is_empty());
    // The missing major is reported before the write is attempted
    assert_eq!(sink.event_names(), ["Major Missing In Record"]);
    assert_eq!(store.record("camper-1").unwrap().major, None);
    assert!(!resolver.loading_flag().is_set());
    assert!(!ui.is_loading());
}
