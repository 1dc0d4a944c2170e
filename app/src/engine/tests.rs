use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use twitch_client::Token;

use super::session_log::SESSION_LOG_CAPACITY;
use super::{EngineOptions, PollEngine};
use crate::WatchError;
use crate::model::{DEFAULT_BADGE_COLOR, LiveSession, SUSPENDED_BADGE_COLOR, SoundKind, session};
use crate::testing::{Effect, Harness};

const FOO_URL: &str = "https://www.twitch.tv/foo";

/// Engine that already ran its baseline cycle over `initial`, with the
/// recorded effects cleared.
async fn after_baseline(h: &Harness, initial: Vec<LiveSession>) -> Arc<PollEngine> {
    h.source.set_followed(initial);
    let engine = h.engine();
    engine.request_streams().await.unwrap();
    h.effects.clear();
    engine
}

#[tokio::test]
async fn first_cycle_records_baseline_without_side_effects() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    h.source
        .set_followed(vec![session("s1", "u1", "foo"), session("s2", "u2", "bar")]);

    let engine = h.engine();
    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.effects(), vec![Effect::BadgeCount(2)]);
    assert_eq!(engine.processed_count().await, 2);
}

#[tokio::test]
async fn new_session_is_handled_exactly_once() {
    let h = Harness::connected();
    let engine = after_baseline(&h, vec![session("s1", "u1", "foo")]).await;

    h.source
        .set_followed(vec![session("s1", "u1", "foo"), session("s2", "u2", "bar")]);
    engine.request_streams().await.unwrap();
    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.notification_ids().len(), 1);
    assert_eq!(h.effects.sounds(), vec![SoundKind::Secondary]);
    assert_eq!(engine.processed_count().await, 2);
}

#[tokio::test]
async fn roster_member_gets_page_opened_with_primary_sound() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    *h.preferences.volume.lock().unwrap() = 0.4;
    let engine = after_baseline(&h, Vec::new()).await;

    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    engine.request_streams().await.unwrap();

    assert_eq!(
        h.effects.effects(),
        vec![
            Effect::BadgeCount(1),
            Effect::Notification {
                id: "n1".into(),
                title: "FOO started streaming".into(),
            },
            Effect::OpenPage(FOO_URL.into()),
            Effect::Sound(SoundKind::Primary, 0.4),
        ]
    );
}

#[tokio::test]
async fn disabled_notifications_still_auto_open() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    *h.preferences.show_notification.lock().unwrap() = false;
    let engine = after_baseline(&h, Vec::new()).await;

    h.source
        .set_followed(vec![session("s1", "u1", "foo"), session("s2", "u2", "bar")]);
    engine.request_streams().await.unwrap();

    assert!(h.effects.notification_ids().is_empty());
    assert_eq!(h.effects.opened(), vec![FOO_URL.to_string()]);
    // nothing at all for the non-roster session
    assert_eq!(h.effects.sounds(), vec![SoundKind::Primary]);
}

#[tokio::test]
async fn suspended_engine_notifies_but_never_opens() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    *h.preferences.suspend_from.lock().unwrap() = Some(Utc::now());
    let engine = after_baseline(&h, Vec::new()).await;

    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.notification_ids().len(), 1);
    assert!(h.effects.opened().is_empty());
    assert!(h.effects.sounds().is_empty());
}

#[tokio::test]
async fn exact_channel_page_already_open_is_not_reopened() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    *h.effects.open_urls.lock().unwrap() = vec!["https://www.twitch.tv/FOO".into()];
    let engine = after_baseline(&h, Vec::new()).await;

    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    engine.request_streams().await.unwrap();

    assert!(h.effects.opened().is_empty());
    assert_eq!(h.effects.sounds(), vec![SoundKind::Secondary]);
}

#[tokio::test]
async fn channel_sub_page_does_not_count_as_open() {
    let h = Harness::connected();
    h.add_to_roster("u1");
    *h.effects.open_urls.lock().unwrap() = vec!["https://www.twitch.tv/foo/videos".into()];
    let engine = after_baseline(&h, Vec::new()).await;

    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.opened(), vec![FOO_URL.to_string()]);
}

#[tokio::test]
async fn missing_token_sets_warning_badge_without_fetching() {
    let h = Harness::disconnected();
    let engine = h.engine();

    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.effects(), vec![Effect::BadgeWarning]);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_user_id_sets_warning_badge_without_fetching() {
    let h = Harness::connected();
    *h.credentials.user_id.lock().unwrap() = None;
    let engine = h.engine();

    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.effects(), vec![Effect::BadgeWarning]);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_token_fails_cycle_and_keeps_baseline_pending() {
    let h = Harness::connected();
    h.source.reject_token.store(true, Ordering::SeqCst);
    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    let engine = h.engine();

    let err = engine.request_streams().await.unwrap_err();
    assert!(matches!(err, WatchError::InvalidCredential));
    assert!(h.effects.effects().is_empty());

    // the next successful cycle is still treated as the baseline
    h.source.reject_token.store(false, Ordering::SeqCst);
    engine.request_streams().await.unwrap();
    assert!(h.effects.notification_ids().is_empty());
}

#[tokio::test]
async fn session_log_stays_bounded() {
    let h = Harness::connected();
    let sessions = (0..SESSION_LOG_CAPACITY + 50)
        .map(|i| session(&format!("s{i}"), &format!("u{i}"), &format!("user{i}")))
        .collect();
    h.source.set_followed(sessions);

    let engine = h.engine();
    engine.request_streams().await.unwrap();

    assert_eq!(engine.processed_count().await, SESSION_LOG_CAPACITY);
}

#[tokio::test]
async fn clicked_notification_opens_channel_page() {
    let h = Harness::connected();
    let engine = after_baseline(&h, Vec::new()).await;
    h.source.set_followed(vec![session("s1", "u1", "foo")]);
    engine.request_streams().await.unwrap();
    h.effects.clear();

    engine.open_notification("n1").await.unwrap();

    assert_eq!(h.effects.opened(), vec![FOO_URL.to_string()]);
}

#[tokio::test]
async fn unknown_notification_id_is_ignored() {
    let h = Harness::connected();
    let engine = h.engine();

    engine.open_notification("nope").await.unwrap();

    assert!(h.effects.effects().is_empty());
}

#[tokio::test]
async fn run_starts_only_once() {
    let h = Harness::connected();
    let engine = h.engine();

    engine.run().await;
    engine.run().await;

    assert!(engine.is_running());
    let keep_alives = h
        .effects
        .effects()
        .into_iter()
        .filter(|e| *e == Effect::KeepAliveStarted)
        .count();
    assert_eq!(keep_alives, 1);
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancelled_delay_stops_the_cycle() {
    let h = Harness::connected();
    h.source.set_followed(Vec::new());
    let shutdown = CancellationToken::new();
    let options = EngineOptions {
        poll_interval: Duration::from_secs(3600),
        open_delay: Duration::from_secs(60),
        ..EngineOptions::default()
    };
    let engine = PollEngine::new(h.collaborators(), options, shutdown.clone());
    engine.request_streams().await.unwrap();

    shutdown.cancel();
    h.source.set_followed(vec![
        session("s1", "u1", "a"),
        session("s2", "u2", "b"),
        session("s3", "u3", "c"),
    ]);
    engine.request_streams().await.unwrap();

    assert_eq!(h.effects.notification_ids().len(), 1);
}

#[tokio::test]
async fn connect_stores_token_and_user_then_polls() {
    let h = Harness::disconnected();
    *h.auth.token.lock().unwrap() = Some(Token::bearer("fresh"));
    *h.source.current_user.lock().unwrap() = "u42".into();
    let engine = h.engine();

    engine.handle_connect_request().await.unwrap();

    let token = h.credentials.token.lock().unwrap().clone().unwrap();
    assert_eq!(token.access_token, "fresh");
    assert_eq!(h.credentials.user_id.lock().unwrap().as_deref(), Some("u42"));
    assert_eq!(h.source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_connect_flags_badge_and_reports_error() {
    let h = Harness::disconnected();
    let engine = h.engine();

    let err = engine.handle_connect_request().await.unwrap_err();

    assert!(matches!(err, WatchError::AuthFlow(_)));
    assert_eq!(h.effects.effects(), vec![Effect::BadgeWarning]);
    assert!(h.credentials.token.lock().unwrap().is_none());
}

#[tokio::test]
async fn suspend_toggle_recolors_badge() {
    let h = Harness::connected();
    let engine = h.engine();
    let suspend = engine.suspend_controller();

    suspend.set_suspended(true).await.unwrap();
    assert!(suspend.is_suspended().await.unwrap());
    suspend.reset().await.unwrap();
    assert!(!suspend.is_suspended().await.unwrap());

    assert_eq!(
        h.effects.effects(),
        vec![
            Effect::BadgeColor(SUSPENDED_BADGE_COLOR.into()),
            Effect::BadgeColor(DEFAULT_BADGE_COLOR.into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn open_delay_separates_new_sessions_in_a_cycle() {
    let h = Harness::connected();
    let options = EngineOptions {
        poll_interval: Duration::from_secs(3600),
        open_delay: Duration::from_secs(5),
        ..EngineOptions::default()
    };
    let engine = PollEngine::new(h.collaborators(), options, CancellationToken::new());
    engine.request_streams().await.unwrap();

    h.source.set_followed(vec![
        session("s1", "u1", "a"),
        session("s2", "u2", "b"),
        session("s3", "u3", "c"),
    ]);
    let started = tokio::time::Instant::now();
    engine.request_streams().await.unwrap();

    // no pause before the first one, one before each later one
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(15), "{elapsed:?}");
    assert_eq!(h.effects.notification_ids().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn single_new_session_is_handled_without_delay() {
    let h = Harness::connected();
    let options = EngineOptions {
        open_delay: Duration::from_secs(5),
        ..EngineOptions::default()
    };
    let engine = PollEngine::new(h.collaborators(), options, CancellationToken::new());
    engine.request_streams().await.unwrap();

    h.source.set_followed(vec![session("s1", "u1", "a")]);
    let started = tokio::time::Instant::now();
    engine.request_streams().await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(h.effects.notification_ids().len(), 1);
}

#[tokio::test]
async fn applied_options_shrink_notification_tracker() {
    let h = Harness::connected();
    let engine = after_baseline(&h, Vec::new()).await;
    h.source
        .set_followed(vec![session("s1", "u1", "foo"), session("s2", "u2", "bar")]);
    engine.request_streams().await.unwrap();

    engine
        .apply_options(EngineOptions {
            notification_capacity: 1,
            ..engine.options()
        })
        .unwrap();
    h.effects.clear();

    engine.open_notification("n1").await.unwrap();
    engine.open_notification("n2").await.unwrap();
    assert_eq!(h.effects.opened(), vec!["https://www.twitch.tv/bar".to_string()]);
}
