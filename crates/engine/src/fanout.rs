// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Fan-out (spec.md §4.7): a bounded, drop-oldest FIFO feeding a single
//! consumer task that delivers to the external observability platform with
//! per-attempt exponential backoff.
//!
//! Adapted from the teacher's in-process `EventBus` — here there is exactly
//! one external sink instead of many in-process subscribers, so delivery is
//! push-with-retry rather than fan-out-to-handlers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bos_adapters::{HttpClient, HttpMethod, HttpRequest};
use bos_core::{BusinessEvent, ChangeEvent};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

const DEFAULT_CAPACITY: usize = 10_000;
const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum OutboundEvent {
    Change(ChangeEvent),
    Business(BusinessEvent),
}

impl OutboundEvent {
    /// Shape the event into the destination's expected envelope (spec.md
    /// §4.7: `ChangeEvent` becomes a `CUSTOM_DEPLOYMENT`-category payload;
    /// `BusinessEvent` becomes a business-event sink payload).
    fn to_payload(&self) -> serde_json::Value {
        match self {
            OutboundEvent::Change(event) => serde_json::json!({
                "eventType": "CUSTOM_DEPLOYMENT",
                "payload": event,
            }),
            OutboundEvent::Business(event) => serde_json::json!({
                "eventType": "BUSINESS_EVENT",
                "payload": event,
            }),
        }
    }
}

/// Anything that can accept fan-out events without blocking the caller.
///
/// Implemented by [`EventFanout`] (enqueues for async delivery) and by the
/// `fake` submodule's `RecordingSink` (captures events synchronously for
/// assertions).
pub trait EventSink: Send + Sync + 'static {
    fn emit_change(&self, event: ChangeEvent);
    fn emit_business(&self, event: BusinessEvent);
}

#[derive(Debug, Default)]
pub struct FanoutMetrics {
    pub enqueued: AtomicU64,
    pub dropped: AtomicU64,
    pub delivered: AtomicU64,
    pub delivery_failed: AtomicU64,
}

struct Queue {
    items: Mutex<VecDeque<OutboundEvent>>,
    capacity: usize,
    notify: Notify,
}

impl Queue {
    fn push(&self, event: OutboundEvent, metrics: &FanoutMetrics) {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            items.pop_front();
            metrics.dropped.fetch_add(1, Ordering::Relaxed);
        }
        items.push_back(event);
        metrics.enqueued.fetch_add(1, Ordering::Relaxed);
        drop(items);
        self.notify.notify_one();
    }

    fn drain(&self) -> Vec<OutboundEvent> {
        let mut items = self.items.lock();
        items.drain(..).collect()
    }
}

/// Bounded, single-consumer event fan-out to the external observability
/// destination.
pub struct EventFanout {
    queue: Arc<Queue>,
    metrics: Arc<FanoutMetrics>,
    cancel: CancellationToken,
}

impl EventFanout {
    /// Spawn the consumer task and return a handle. `destination_url` is the
    /// observability platform's event-ingest endpoint.
    pub fn spawn<H: HttpClient>(http: Arc<H>, destination_url: String, capacity: Option<usize>) -> Self {
        let queue = Arc::new(Queue {
            items: Mutex::new(VecDeque::new()),
            capacity: capacity.unwrap_or(DEFAULT_CAPACITY),
            notify: Notify::new(),
        });
        let metrics = Arc::new(FanoutMetrics::default());
        let cancel = CancellationToken::new();

        tokio::spawn(run_consumer(queue.clone(), metrics.clone(), http, destination_url, cancel.clone()));

        Self { queue, metrics, cancel }
    }

    pub fn metrics(&self) -> &FanoutMetrics {
        &self.metrics
    }

    pub fn depth(&self) -> usize {
        self.queue.items.lock().len()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl EventSink for EventFanout {
    fn emit_change(&self, event: ChangeEvent) {
        self.queue.push(OutboundEvent::Change(event), &self.metrics);
    }

    fn emit_business(&self, event: BusinessEvent) {
        self.queue.push(OutboundEvent::Business(event), &self.metrics);
    }
}

async fn run_consumer<H: HttpClient>(
    queue: Arc<Queue>,
    metrics: Arc<FanoutMetrics>,
    http: Arc<H>,
    destination_url: String,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = queue.notify.notified() => {}
        }
        for event in queue.drain() {
            deliver(&http, &destination_url, &event, &metrics).await;
        }
    }
}

async fn deliver<H: HttpClient>(http: &H, destination_url: &str, event: &OutboundEvent, metrics: &FanoutMetrics) {
    let mut backoff = INITIAL_BACKOFF;
    for attempt in 1..=MAX_ATTEMPTS {
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: destination_url.to_string(),
            headers: Default::default(),
            body: Some(event.to_payload()),
            timeout: Duration::from_secs(10),
        };
        match http.send(request).await {
            Ok(_) => {
                metrics.delivered.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Err(err) if attempt == MAX_ATTEMPTS => {
                tracing::warn!(error = %err, attempt, "event delivery exhausted retries, dropping");
                metrics.delivery_failed.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Err(err) => {
                tracing::debug!(error = %err, attempt, backoff_ms = backoff.as_millis() as u64, "event delivery failed, retrying");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;

    /// An [`EventSink`] that records every event in memory, for assertions
    /// in supervisor/orchestrator/flag-store tests.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub changes: Arc<Mutex<Vec<ChangeEvent>>>,
        pub business: Arc<Mutex<Vec<BusinessEvent>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl EventSink for RecordingSink {
        fn emit_change(&self, event: ChangeEvent) {
            self.changes.lock().push(event);
        }

        fn emit_business(&self, event: BusinessEvent) {
            self.business.lock().push(event);
        }
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
