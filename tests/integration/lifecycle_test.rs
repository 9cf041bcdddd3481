//! Integration tests for the notification lifecycle, commands and callbacks.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use tidings_core::error::ErrorKind;
use tidings_core::events::EventName;
use tidings_core::types::{NotificationId, RequestCode};
use tidings_entity::descriptor::CallbackKind;
use tidings_entity::notification::Scope;
use tidings_media::VolumeControl;
use tidings_service::{Command, CommandResponse};

use helpers::{TestApp, code_of, options};

const ONE: NotificationId = NotificationId(1);

#[tokio::test]
async fn test_schedule_trigger_clear_moves_between_scopes() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "title": "A"})).await;

    assert!(app.service.exists(ONE, Scope::Any).await);
    assert!(app.service.exists(ONE, Scope::Scheduled).await);
    assert!(!app.service.exists(ONE, Scope::Triggered).await);

    app.service.trigger(ONE).await.unwrap();
    assert!(app.service.exists(ONE, Scope::Triggered).await);
    assert!(!app.service.exists(ONE, Scope::Scheduled).await);

    app.service.clear(ONE).await.unwrap();
    assert!(!app.service.ids(Scope::Triggered).await.contains(&ONE));

    assert_eq!(
        app.sink.names(),
        vec![EventName::Schedule, EventName::Trigger, EventName::Clear]
    );
    let shown = app.renderer.last_shown().unwrap();
    assert_eq!(shown.title, "A");
    assert_eq!(shown.small_icon, "icontransparent");
}

#[tokio::test]
async fn test_duplicate_schedule_is_reported_per_item() {
    let app = TestApp::ready();

    let response = app
        .dispatcher
        .execute(Command::Schedule(vec![
            options(json!({"id": 4, "title": "first"})),
            options(json!({"id": 4, "title": "second"})),
            options(json!({"id": 5, "title": "third"})),
        ]))
        .await;

    let CommandResponse::Done { failures } = response else {
        panic!("expected done response");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].id, Some(NotificationId(4)));
    assert_eq!(failures[0].kind, ErrorKind::DuplicateId);

    let first = app
        .service
        .single(NotificationId(4), Scope::Any)
        .await
        .unwrap();
    assert_eq!(first["title"], "first");
    assert!(app.service.exists(NotificationId(5), Scope::Scheduled).await);
    assert_eq!(
        app.sink.names(),
        vec![EventName::Schedule, EventName::Schedule]
    );
}

#[tokio::test]
async fn test_cancel_unknown_fires_nothing() {
    let app = TestApp::ready();

    assert!(app.service.cancel(NotificationId(99)).await.is_none());
    assert!(app.sink.envelopes().is_empty());
}

#[tokio::test]
async fn test_cancel_all_on_empty_store_fires_without_record() {
    let app = TestApp::ready();

    assert_eq!(app.service.cancel_all().await, 0);

    let envelope = app.sink.last().unwrap();
    assert_eq!(envelope.event, EventName::CancelAll);
    assert!(envelope.record.is_none());
}

#[tokio::test]
async fn test_update_merges_into_existing_options() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "title": "A", "badge": 3})).await;

    let response = app
        .dispatcher
        .execute(Command::Update(vec![options(json!({"id": 1, "text": "x"}))]))
        .await;
    assert_eq!(response, CommandResponse::done());

    let CommandResponse::Single(Some(single)) =
        app.dispatcher.execute(Command::GetSingle(ONE)).await
    else {
        panic!("expected a single record");
    };
    assert_eq!(single["text"], "x");
    assert_eq!(single["title"], "A");
    assert_eq!(single["badge"], 3);
    assert_eq!(app.sink.last().unwrap().event, EventName::Update);
}

#[tokio::test]
async fn test_update_without_id_or_unknown_id_fails() {
    let app = TestApp::ready();

    let CommandResponse::Done { failures } = app
        .dispatcher
        .execute(Command::Update(vec![
            options(json!({"text": "no id"})),
            options(json!({"id": 42, "text": "unknown"})),
        ]))
        .await
    else {
        panic!("expected done response");
    };

    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].kind, ErrorKind::Validation);
    assert_eq!(failures[1].kind, ErrorKind::NotFound);
    assert!(app.sink.envelopes().is_empty());
}

#[tokio::test]
async fn test_schedule_without_id_assigns_next_free_id() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 7})).await;

    let assigned = app.schedule(json!({"title": "auto"})).await;
    assert_eq!(assigned, NotificationId(8));

    let snapshot = app.sink.last().unwrap().record.unwrap();
    assert_eq!(snapshot["id"], 8);
}

#[tokio::test]
async fn test_schedule_arms_and_cancel_disarms() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "at": 1_900_000_000})).await;

    let armed = app.scheduler.armed_at(ONE).unwrap();
    assert_eq!(armed.timestamp(), 1_900_000_000);

    app.service
        .update(options(json!({"id": 1, "at": 1_900_000_600})))
        .await
        .unwrap();
    assert_eq!(
        app.scheduler.armed_at(ONE).unwrap().timestamp(),
        1_900_000_600
    );

    let canceled = app.service.cancel(ONE).await.unwrap();
    assert_eq!(canceled.id, ONE);
    assert!(!app.scheduler.is_armed(ONE));
    assert!(!app.service.exists(ONE, Scope::Any).await);
    assert_eq!(app.sink.last().unwrap().event, EventName::Cancel);
}

#[tokio::test]
async fn test_trigger_requires_scheduled_state() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1})).await;
    app.service.trigger(ONE).await.unwrap();

    let err = app.service.trigger(ONE).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let err = app.service.trigger(NotificationId(2)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_trigger_with_sound_acquires_and_clear_releases_audio() {
    let app = TestApp::ready();
    app.schedule(json!({
        "id": 1,
        "title": "Alarm",
        "sound": {"file": "bell.wav", "volume": 80, "loop": true}
    }))
    .await;

    app.service.trigger(ONE).await.unwrap();
    assert!(app.audio.is_playing(ONE).await);
    assert_eq!(app.volume.current(), 12);
    assert_eq!(app.staged_files(), 1);
    let started = app.output.started();
    assert_eq!(started.len(), 1);
    assert!(started[0].1);

    app.service.clear(ONE).await.unwrap();
    assert!(!app.audio.is_playing(ONE).await);
    assert_eq!(app.volume.current(), 7);
    assert_eq!(app.output.stopped().len(), 1);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_missing_sound_asset_still_triggers() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "sound": "missing.wav"})).await;

    app.service.trigger(ONE).await.unwrap();

    assert!(!app.audio.is_playing(ONE).await);
    assert_eq!(app.volume.current(), 7);
    assert_eq!(app.sink.last().unwrap().event, EventName::Trigger);
}

#[tokio::test]
async fn test_click_callback_fires_click_then_auto_clears() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "title": "A"})).await;
    app.service.trigger(ONE).await.unwrap();
    let descriptor = app.renderer.last_shown().unwrap();
    let click = code_of(&descriptor, |kind| matches!(kind, CallbackKind::Click));

    app.service.on_callback(click).await.unwrap();

    let names = app.sink.names();
    assert_eq!(&names[names.len() - 2..], &[EventName::Click, EventName::Clear]);
    assert!(!app.service.exists(ONE, Scope::Triggered).await);
    assert!(app.service.exists(ONE, Scope::Any).await);
    assert!(app.registry.is_empty());

    let err = app.service.on_callback(click).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_action_callback_reports_identifier_and_keeps_notification() {
    let app = TestApp::ready();
    app.schedule(json!({
        "id": 1,
        "autoClear": false,
        "actions": [{"identifier": "snooze", "title": "Snooze"}]
    }))
    .await;
    app.service.trigger(ONE).await.unwrap();
    let descriptor = app.renderer.last_shown().unwrap();
    let action = code_of(&descriptor, |kind| matches!(kind, CallbackKind::Action { .. }));

    app.service.on_callback(action).await.unwrap();

    let envelope = app.sink.last().unwrap();
    assert_eq!(envelope.event, EventName::Click);
    assert_eq!(envelope.record.unwrap()["actionIdentifier"], "snooze");
    assert!(app.service.exists(ONE, Scope::Triggered).await);
    assert!(!app.app_state.is_background());
}

#[tokio::test]
async fn test_delete_callback_clears() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1, "sound": "chime.wav"})).await;
    app.service.trigger(ONE).await.unwrap();
    let descriptor = app.renderer.last_shown().unwrap();
    let delete = code_of(&descriptor, |kind| matches!(kind, CallbackKind::Delete));

    app.service.on_callback(delete).await.unwrap();

    assert_eq!(app.sink.last().unwrap().event, EventName::Clear);
    assert!(!app.audio.is_playing(ONE).await);
    assert!(app.registry.is_empty());
}

#[tokio::test]
async fn test_unknown_request_code_is_not_found() {
    let app = TestApp::ready();

    let err = app
        .service
        .on_callback(RequestCode(12345))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_cancel_all_keeps_history_and_clear_all_purges_it() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1})).await;
    app.schedule(json!({"id": 2})).await;
    app.schedule(json!({"id": 3})).await;
    app.service.trigger(ONE).await.unwrap();
    app.service.clear(ONE).await.unwrap();
    app.service.trigger(NotificationId(2)).await.unwrap();

    assert_eq!(app.service.cancel_all().await, 2);
    assert_eq!(app.service.ids(Scope::Any).await, vec![ONE]);
    assert!(app.scheduler.disarmed().contains(&NotificationId(3)));

    assert_eq!(app.service.clear_all().await, 0);
    assert!(app.service.ids(Scope::Any).await.is_empty());
    assert_eq!(app.sink.last().unwrap().event, EventName::ClearAll);
}

#[tokio::test]
async fn test_raw_commands_and_queries() {
    let app = TestApp::ready();

    app.dispatcher
        .execute_raw(r#"{"action":"schedule","args":[{"id":1,"title":"A"},{"id":2,"title":"B"}]}"#)
        .await
        .unwrap();
    app.service.trigger(NotificationId(2)).await.unwrap();

    let present = app
        .dispatcher
        .execute_raw(r#"{"action":"exist","args":1}"#)
        .await
        .unwrap();
    assert_eq!(present, CommandResponse::Bool(true));

    let triggered = app
        .dispatcher
        .execute_raw(r#"{"action":"getTriggeredIds"}"#)
        .await
        .unwrap();
    assert_eq!(triggered, CommandResponse::Ids(vec![NotificationId(2)]));

    let CommandResponse::Many(all) = app
        .dispatcher
        .execute_raw(r#"{"action":"getAll","args":[]}"#)
        .await
        .unwrap()
    else {
        panic!("expected many");
    };
    assert_eq!(all.len(), 2);

    let missing = app
        .dispatcher
        .execute_raw(r#"{"action":"getSingleScheduled","args":2}"#)
        .await
        .unwrap();
    assert_eq!(missing, CommandResponse::Single(None));

    let err = app
        .dispatcher
        .execute_raw(r#"{"action":"registerForPush"}"#)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_during_trigger_releases_acquired_audio() {
    let app = Arc::new(TestApp::ready());
    app.schedule(json!({"id": 1, "sound": {"file": "bell.wav", "volume": 100}}))
        .await;
    app.renderer.hold_next_show();

    let trigger = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.service.trigger(ONE).await })
    };
    app.renderer.wait_until_holding().await;

    let cancel = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.service.cancel(ONE).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!cancel.is_finished());
    app.renderer.release_show();

    trigger.await.unwrap().unwrap();
    assert!(cancel.await.unwrap().is_some());

    assert!(!app.service.exists(ONE, Scope::Any).await);
    assert!(!app.audio.is_playing(ONE).await);
    assert_eq!(app.volume.current(), 7);
    assert_eq!(app.staged_files(), 0);
    assert!(app.registry.is_empty());
    assert_eq!(
        app.sink.names(),
        vec![EventName::Schedule, EventName::Trigger, EventName::Cancel]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clear_during_trigger_releases_acquired_audio() {
    let app = Arc::new(TestApp::ready());
    app.schedule(json!({"id": 1, "sound": "chime.wav"})).await;
    app.renderer.hold_next_show();

    let trigger = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.service.trigger(ONE).await })
    };
    app.renderer.wait_until_holding().await;

    let clear = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.service.clear(ONE).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.renderer.release_show();

    trigger.await.unwrap().unwrap();
    assert!(clear.await.unwrap().is_some());

    assert!(app.service.exists(ONE, Scope::Any).await);
    assert!(!app.service.exists(ONE, Scope::Triggered).await);
    assert!(!app.audio.is_playing(ONE).await);
    assert_eq!(app.volume.current(), 7);
    assert_eq!(app.staged_files(), 0);
    assert!(app.registry.is_empty());
    assert_eq!(
        app.sink.names(),
        vec![EventName::Schedule, EventName::Trigger, EventName::Clear]
    );
}
