//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::{Deserialize, Serialize};

use crate::config::VALIDATION_DETAIL;
use crate::error_handling::StoreError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl From<&StoreError> for ErrorBody {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { keys, .. } => ErrorBody {
                detail: "Object not found".to_string(),
                metadata: Some(format!("keys: {}", keys.join(", "))),
            },
            StoreError::Validation(validation) => ErrorBody {
                detail: VALIDATION_DETAIL.to_string(),
                metadata: Some(match &validation.metadata {
                    Some(meta) => format!("{} ({meta})", validation.detail),
                    None => validation.detail.clone(),
                }),
            },
            StoreError::Conflict { message, .. } => ErrorBody {
                detail: "Conflict with existing data".to_string(),
                metadata: Some(message.clone()),
            },
            StoreError::Timeout(_) => ErrorBody {
                detail: "Storage timed out".to_string(),
                metadata: None,
            },
            StoreError::Transport(_) | StoreError::InvalidBinding(_) => ErrorBody {
                detail: "Storage unavailable".to_string(),
                metadata: None,
            },
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            // Driver details stay in the log, not in the response
            error!("Store failure: {self}");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
