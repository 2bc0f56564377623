// SPDX-License-Identifier: MIT

use super::*;
use bos_adapters::http::fake::FakeHttpClient;
use bos_core::test_support::sample_journey;
use std::sync::atomic::Ordering;
use std::time::Duration as StdDuration;

fn sample_change_event() -> ChangeEvent {
    use bos_core::{EventScope, FlagName, FlagValue};
    ChangeEvent {
        event_type: bos_core::event::ChangeEventType::Change,
        flag_name: FlagName::CacheEnabled,
        previous_value: Some(FlagValue::Bool(false)),
        new_value: FlagValue::Bool(true),
        scope: EventScope::Global,
        reason: None,
        triggered_by: "test".into(),
        problem_id: None,
        timestamp_ms: 1,
    }
}

fn sample_business_event() -> BusinessEvent {
    let journey = sample_journey("Acme");
    BusinessEvent {
        event_type: bos_core::event::BusinessEventType::Biz,
        correlation_id: bos_core::CorrelationId::new(),
        journey_id: journey.journey_id,
        step_name: "Checkout".into(),
        service_name: bos_core::ServiceName::from("CheckoutService-acme"),
        company_name: "Acme".into(),
        status: "completed".into(),
        processing_time_ms: 120,
        additional_fields: Default::default(),
        timestamp_ms: 2,
    }
}

#[test]
fn push_drops_oldest_when_queue_full() {
    let metrics = FanoutMetrics::default();
    let queue = Queue { items: Mutex::new(VecDeque::new()), capacity: 1, notify: Notify::new() };

    queue.push(OutboundEvent::Change(sample_change_event()), &metrics);
    queue.push(OutboundEvent::Business(sample_business_event()), &metrics);

    assert_eq!(metrics.dropped.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.enqueued.load(Ordering::Relaxed), 2);
    let remaining = queue.drain();
    assert_eq!(remaining.len(), 1);
    assert!(matches!(remaining[0], OutboundEvent::Business(_)));
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..800 {
        if condition() {
            return;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn delivered_events_increment_delivered_metric() {
    let http = Arc::new(FakeHttpClient::new());
    http.stub("http://observability/events", bos_adapters::HttpResponse { status: 202, body: serde_json::Value::Null });

    let fanout = EventFanout::spawn(http.clone(), "http://observability/events".to_string(), None);
    fanout.emit_change(sample_change_event());
    fanout.emit_business(sample_business_event());

    wait_until(|| fanout.metrics().delivered.load(Ordering::Relaxed) == 2).await;
    assert_eq!(fanout.metrics().dropped.load(Ordering::Relaxed), 0);
    fanout.shutdown();
}

#[tokio::test]
async fn undeliverable_events_increment_delivery_failed_after_retries() {
    let http = Arc::new(FakeHttpClient::new());
    http.stub_error("http://observability/events", "connection refused");

    let fanout = EventFanout::spawn(http, "http://observability/events".to_string(), None);
    fanout.emit_change(sample_change_event());

    wait_until(|| fanout.metrics().delivery_failed.load(Ordering::Relaxed) == 1).await;
    assert_eq!(fanout.metrics().delivered.load(Ordering::Relaxed), 0);
    fanout.shutdown();
}
