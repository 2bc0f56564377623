// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state for one Child Service Runtime process (spec.md §4.3).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bos_adapters::{HttpClient, HttpMethod, HttpRequest};
use bos_core::{CorrelationId, FlagSet, ServiceName};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::env::ChildIdentity;
use crate::minute_fuse::MinuteFuse;
use crate::visit::VisitCache;

struct FlagCacheEntry {
    fetched_at: Instant,
    flags: FlagSet,
}

pub struct ChildState {
    pub identity: ChildIdentity,
    pub pid: u32,
    pub started_at: Instant,
    http: Arc<dyn HttpClient>,
    flag_cache_ttl: Duration,
    flag_cache: Mutex<Option<FlagCacheEntry>>,
    visits: Mutex<VisitCache>,
    minute_fuse: MinuteFuse<bos_core::SystemClock>,
    rng: Mutex<StdRng>,
}

impl ChildState {
    pub fn new(identity: ChildIdentity, http: Arc<dyn HttpClient>, flag_cache_ttl: Duration) -> Self {
        Self {
            identity,
            pid: std::process::id(),
            started_at: Instant::now(),
            http,
            flag_cache_ttl,
            flag_cache: Mutex::new(None),
            visits: Mutex::new(VisitCache::new()),
            minute_fuse: MinuteFuse::new(bos_core::SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn uptime_sec(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Fetch the effective flag set for this service from the engine,
    /// caching for at most `flag_cache_ttl` (spec.md §4.3 step 2).
    pub async fn effective_flags(&self) -> FlagSet {
        if let Some(entry) = self.flag_cache.lock().as_ref() {
            if entry.fetched_at.elapsed() < self.flag_cache_ttl {
                return entry.flags.clone();
            }
        }

        let flags = self.fetch_flags().await.unwrap_or_default();
        *self.flag_cache.lock() = Some(FlagCacheEntry { fetched_at: Instant::now(), flags: flags.clone() });
        flags
    }

    async fn fetch_flags(&self) -> Option<FlagSet> {
        let url = format!("{}/api/feature_flag?service={}", self.identity.engine_base_url, self.identity.service_name);
        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: BTreeMap::new(),
            body: None,
            timeout: Duration::from_secs(2),
        };
        let response = self.http.send(request).await.ok()?;
        let parsed: bos_wire::FlagListResponse = serde_json::from_value(response.body).ok()?;
        Some(parsed.flags)
    }

    /// The memoized `errors_per_visit` decision for `correlation_id`,
    /// sampling and recording it on first sight.
    pub fn visit_error(&self, correlation_id: CorrelationId, visit_rate: f64) -> bool {
        let mut visits = self.visits.lock();
        if let Some(decided) = visits.get(&correlation_id) {
            return decided;
        }
        let sampled = self.sample() < visit_rate;
        visits.record(correlation_id, sampled);
        sampled
    }

    pub fn minute_fuse_fires(&self, budget: f64) -> bool {
        self.minute_fuse.fires(budget)
    }

    pub fn sample(&self) -> f64 {
        use rand::Rng;
        self.rng.lock().gen::<f64>()
    }

    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        f(&mut self.rng.lock())
    }

    pub fn service_name(&self) -> ServiceName {
        ServiceName::from(self.identity.service_name.as_str())
    }
}
