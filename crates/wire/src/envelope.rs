// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured error envelope every non-2xx API response returns
//! (spec.md §7 "Propagation policy").

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{success:false, error, details?}` — journeys that ran but had failing
/// steps are NOT reported this way (they're a 2xx with per-step detail);
/// this is reserved for operational errors (spec.md §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self { success: false, error: error.into(), details: None }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_success_false() {
        let err = ApiError::new("port range exhausted");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "port range exhausted");
        assert!(json.get("details").is_none());
    }
}
