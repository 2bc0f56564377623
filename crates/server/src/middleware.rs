// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `x-correlation-id` request/response echo (spec.md §6: "generated if
//! absent and echoed on the response").

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use bos_core::CorrelationId;
use bos_wire::headers::CORRELATION_ID;

pub async fn echo_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| CorrelationId::new().to_string());

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert(CORRELATION_ID, header_value.clone());
        let mut response = next.run(request).await;
        response.headers_mut().insert(CORRELATION_ID, header_value);
        response
    } else {
        next.run(request).await
    }
}

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;
