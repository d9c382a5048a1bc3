use std::sync::Arc;

use quiz_core::model::{HistoryTag, SnapshotRequest, ValidSelection};
use storage::repository::HistoryRepository;

use crate::error::PersistenceError;
use crate::notify::{ToastKind, ToastMessage};

const SAVE_TITLE: &str = "保存测试结果";
const POST_ERROR_TITLE: &str = "POST错误";
const SAVE_OK_BODY: &str = "保存成功";

/// Submits summary snapshots and reads stored ones back.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    /// Submit one snapshot. No retry; the session is never rolled back.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` for transport failures, non-2xx answers and
    /// explicit error replies.
    pub async fn save(
        &self,
        request: &SnapshotRequest,
        snapshot_html: &str,
    ) -> Result<(), PersistenceError> {
        match self
            .history
            .save_history(&request.selection, snapshot_html)
            .await
        {
            Ok(()) => {
                log::info!("saved history for session {}", request.token);
                Ok(())
            }
            Err(err) => {
                let err = PersistenceError::from(err);
                log::error!("saving history for session {} failed: {err}", request.token);
                Err(err)
            }
        }
    }

    /// Toast to show for a save result.
    #[must_use]
    pub fn notification_for(result: &Result<(), PersistenceError>) -> ToastMessage {
        match result {
            Ok(()) => ToastMessage {
                title: SAVE_TITLE.to_string(),
                body: SAVE_OK_BODY.to_string(),
                kind: ToastKind::Short,
            },
            Err(err) => ToastMessage {
                title: match err {
                    PersistenceError::Rejected(_) => SAVE_TITLE,
                    _ => POST_ERROR_TITLE,
                }
                .to_string(),
                body: format!("status: {}<br>error: {}", err.status(), err.detail()),
                kind: ToastKind::Persistent,
            },
        }
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the listing cannot be fetched.
    pub async fn list_history(
        &self,
        selection: &ValidSelection,
    ) -> Result<Vec<HistoryTag>, PersistenceError> {
        Ok(self.history.list_history(selection).await?)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the snapshot cannot be fetched.
    pub async fn load_history(
        &self,
        selection: &ValidSelection,
        tag: &HistoryTag,
    ) -> Result<String, PersistenceError> {
        Ok(self.history.load_history(selection, tag).await?)
    }
}
