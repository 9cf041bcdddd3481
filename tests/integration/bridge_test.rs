//! Integration tests for buffered event delivery and host lifecycle hooks.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use tidings_core::events::{AppState, EventName};
use tidings_core::traits::EventSink;
use tidings_core::types::NotificationId;
use tidings_service::{Command, CommandResponse};

use helpers::{RecordingSink, TestApp};

#[tokio::test]
async fn test_events_buffer_until_device_ready() {
    let app = TestApp::new();
    app.schedule(json!({"id": 1})).await;
    app.schedule(json!({"id": 2})).await;
    app.service.cancel(NotificationId(1)).await;

    assert!(app.sink.envelopes().is_empty());
    assert_eq!(app.bridge.pending_len(), 3);

    let response = app.dispatcher.execute(Command::DeviceReady).await;
    assert_eq!(response, CommandResponse::done());

    assert_eq!(
        app.sink.names(),
        vec![EventName::Schedule, EventName::Schedule, EventName::Cancel]
    );
    let seqs: Vec<u64> = app.sink.envelopes().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_second_ready_does_not_redeliver() {
    let app = TestApp::new();
    app.schedule(json!({"id": 1})).await;

    assert_eq!(app.service.device_ready(), 1);
    assert_eq!(app.service.device_ready(), 0);
    assert_eq!(app.sink.envelopes().len(), 1);

    app.schedule(json!({"id": 2})).await;
    assert_eq!(app.sink.envelopes().len(), 2);
}

#[tokio::test]
async fn test_envelope_captures_state_at_fire_time() {
    let app = TestApp::new();
    app.schedule(json!({"id": 1})).await;
    app.service.device_ready();
    app.schedule(json!({"id": 2})).await;
    app.service.on_pause();
    app.schedule(json!({"id": 3})).await;

    let states: Vec<AppState> = app.sink.envelopes().iter().map(|e| e.app_state).collect();
    assert_eq!(
        states,
        vec![AppState::Background, AppState::Foreground, AppState::Background]
    );
}

#[tokio::test]
async fn test_snapshot_is_not_affected_by_later_updates() {
    let app = TestApp::new();
    app.schedule(json!({"id": 1, "title": "before"})).await;
    app.service
        .update(helpers::options(json!({"id": 1, "title": "after"})))
        .await
        .unwrap();
    app.service.device_ready();

    let envelopes = app.sink.envelopes();
    assert_eq!(envelopes[0].record.as_ref().unwrap()["title"], "before");
    assert_eq!(envelopes[1].record.as_ref().unwrap()["title"], "after");
}

#[tokio::test]
async fn test_destroy_buffers_and_resume_flushes_to_new_consumer() {
    let app = TestApp::ready();
    app.schedule(json!({"id": 1})).await;

    app.service.on_destroy();
    app.schedule(json!({"id": 2})).await;
    assert_eq!(app.sink.envelopes().len(), 1);

    let replacement = Arc::new(RecordingSink::default());
    app.service
        .attach_consumer(Arc::clone(&replacement) as Arc<dyn EventSink>);
    assert_eq!(app.service.on_resume(), 1);

    assert_eq!(app.sink.envelopes().len(), 1);
    let delivered = replacement.envelopes();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].record.as_ref().unwrap()["id"], 2);
    assert_eq!(delivered[0].app_state, AppState::Background);
    assert!(!app.app_state.is_background());
}

#[tokio::test]
async fn test_failed_delivery_is_dropped_not_retried() {
    let app = TestApp::ready();
    app.sink.fail(true);
    app.schedule(json!({"id": 1})).await;
    app.sink.fail(false);
    app.schedule(json!({"id": 2})).await;

    let delivered = app.sink.envelopes();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].record.as_ref().unwrap()["id"], 2);
    assert!(app.service.exists(NotificationId(1), tidings_entity::Scope::Any).await);

    let metrics = app.service.bridge_metrics();
    assert_eq!(metrics.fired, 2);
    assert_eq!(metrics.failed, 1);
    assert_eq!(metrics.delivered, 1);
}

#[tokio::test]
async fn test_device_idle_event_payload() {
    let app = TestApp::ready();

    app.service.on_device_idle_changed(true, false);

    let envelope = app.sink.last().unwrap();
    assert_eq!(envelope.event, EventName::DeviceIdleChanged);
    assert_eq!(envelope.record, Some(json!({"idle": true, "powerSave": false})));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fires_deliver_in_sequence_order() {
    let app = Arc::new(TestApp::ready());

    let mut tasks = Vec::new();
    for worker in 0..4 {
        let app = Arc::clone(&app);
        tasks.push(tokio::spawn(async move {
            for n in 0..25 {
                app.schedule(json!({"id": worker * 100 + n + 1})).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let seqs: Vec<u64> = app.sink.envelopes().iter().map(|e| e.seq).collect();
    assert_eq!(seqs.len(), 100);
    assert!(seqs.windows(2).all(|pair| pair[0] + 1 == pair[1]));
}
