//! Request and response bodies exchanged with the quiz server.

use serde::{Deserialize, Serialize};

use quiz_core::model::ValidSelection;

use crate::repository::StorageError;

/// Success marker older servers answer with instead of a typed status.
pub const LEGACY_SUCCESS: &str = "保存成功";

/// Body of `POST /save_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPayload {
    pub typ: String,
    pub name: String,
    pub data: String,
}

impl HistoryPayload {
    #[must_use]
    pub fn new(selection: &ValidSelection, data: impl Into<String>) -> Self {
        Self {
            typ: selection.test_type().to_string(),
            name: selection.test_name().to_string(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Ok,
    Error,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SaveResponse {
    Typed {
        status: SaveStatus,
        #[serde(default)]
        detail: Option<String>,
    },
    Legacy(String),
}

/// Interpret the body of a 2xx answer to `POST /save_history`.
///
/// # Errors
///
/// Returns `StorageError::Rejected` when the server reports a failure and
/// `StorageError::Serialization` when the body is neither shape.
pub fn interpret_save_response(body: &str) -> Result<(), StorageError> {
    let response: SaveResponse =
        serde_json::from_str(body).map_err(|e| StorageError::Serialization(e.to_string()))?;
    match response {
        SaveResponse::Typed {
            status: SaveStatus::Ok,
            ..
        } => Ok(()),
        SaveResponse::Typed {
            status: SaveStatus::Error,
            detail,
        } => Err(StorageError::Rejected(
            detail.unwrap_or_else(|| "unspecified error".to_string()),
        )),
        SaveResponse::Legacy(text) if text == LEGACY_SUCCESS => Ok(()),
        SaveResponse::Legacy(text) => Err(StorageError::Rejected(text)),
    }
}
