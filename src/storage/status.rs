//! Status marker returned by mutating operations that have no record to return.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Outcome marker, serialized as `"Success"` or `"Failure"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Status {
    Success,
    Failure,
}

/// `{"status": "Success"}` body, with optional error messages on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            errors: None,
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            status: Status::Failure,
            errors: Some(errors),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_without_errors() {
        let json = serde_json::to_string(&StatusResponse::success()).unwrap();
        assert_eq!(json, r#"{"status":"Success"}"#);
    }

    #[test]
    fn test_failure_carries_errors() {
        let response = StatusResponse::failure(vec!["disk full".to_string()]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "Failure");
        assert_eq!(json["errors"][0], "disk full");
        assert!(!response.is_success());
    }

    #[test]
    fn test_status_round_trips_from_wire_format() {
        let parsed: StatusResponse = serde_json::from_str(r#"{"status":"Success"}"#).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.errors, None);
    }
}
