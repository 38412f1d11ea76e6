use serde::{Deserialize, Serialize};

/// JSON envelope shared by every endpoint.
///
/// Successful responses carry `data` (except deletions), failures carry only a
/// `message` and occasionally an `error` payload with field-level details.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<serde_json::Value>) -> Self {
        Self {
            message: message.into(),
            data: None,
            error,
        }
    }
}
