// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Correlation/tracing header names propagated on every outbound hop
//! (spec.md §4.5 "Correlation propagation", §6).

/// Generated if absent on inbound requests, echoed on every response
/// (spec.md §6).
pub const CORRELATION_ID: &str = "x-correlation-id";
pub const TRACEPARENT: &str = "traceparent";
pub const TRACESTATE: &str = "tracestate";
/// Stand-in vendor trace id header (spec.md §4.5: "a vendor trace id", name
/// left to the implementer).
pub const VENDOR_TRACE_ID: &str = "x-dt-trace-id";
pub const SESSION_ID: &str = "x-session-id";
pub const CUSTOMER_ID: &str = "x-customer-id";

/// The fixed set the orchestrator always sets/forwards.
pub const FIXED_PROPAGATED_HEADERS: [&str; 6] =
    [CORRELATION_ID, TRACEPARENT, TRACESTATE, VENDOR_TRACE_ID, SESSION_ID, CUSTOMER_ID];

/// Prefixes recognized for "echo forward unknown tracing headers"
/// (spec.md §4.5).
pub const RECOGNIZED_TRACING_PREFIXES: [&str; 3] = ["x-trace-", "traceparent", "tracestate"];

/// True if `header_name` (already lowercased) should be echoed forward even
/// though it isn't one of the [`FIXED_PROPAGATED_HEADERS`].
pub fn is_recognized_tracing_header(header_name: &str) -> bool {
    RECOGNIZED_TRACING_PREFIXES.iter().any(|prefix| header_name.starts_with(prefix))
}

/// Build the outbound header set for one `/process` hop (spec.md §4.5
/// "Correlation propagation"): `correlation_id` always wins on
/// [`CORRELATION_ID`] (the orchestrator mints one per journey run, regardless
/// of whether the inbound request carried its own), every other fixed header
/// is forwarded verbatim when `inbound` carried it, and any further inbound
/// header matching [`is_recognized_tracing_header`] is echoed forward too, so
/// a vendor's own trace headers survive a hop even if they're not one of the
/// six names this system special-cases.
///
/// `inbound` keys are expected lowercased, as `http::HeaderName::as_str`
/// already yields.
pub fn build_propagated_headers(correlation_id: &str, inbound: &std::collections::BTreeMap<String, String>) -> std::collections::BTreeMap<String, String> {
    let mut out = std::collections::BTreeMap::new();
    out.insert(CORRELATION_ID.to_string(), correlation_id.to_string());

    for name in FIXED_PROPAGATED_HEADERS.iter().filter(|name| **name != CORRELATION_ID) {
        if let Some(value) = inbound.get(*name) {
            out.insert((*name).to_string(), value.clone());
        }
    }

    for (name, value) in inbound {
        if !FIXED_PROPAGATED_HEADERS.contains(&name.as_str()) && is_recognized_tracing_header(name) {
            out.insert(name.clone(), value.clone());
        }
    }

    out
}
