use chrono::Utc;
use log::error;

use crate::models::{PendingReport, ReportDraft, UserPreferences};
use crate::store::{KeyValueStore, StoreError};

pub const PENDING_REPORTS_KEY: &str = "saarthi:pending_reports";
pub const USER_PREFERENCES_KEY: &str = "saarthi:user_preferences";

/// The offline report queue. Owns the persisted pending sequence; no other
/// component writes under its keys.
///
/// The public surface deliberately fails open: read errors surface as an
/// empty queue and write errors as `false`, never as a panic or an error the
/// UI has to unwind. The `try_*` internals keep the storage errors visible
/// for logging.
pub struct ReportQueue<S> {
    store: S,
}

impl<S: KeyValueStore> ReportQueue<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends a draft to the pending sequence with a fresh wall-clock
    /// timestamp. Returns `false` when the report could not be saved.
    pub async fn queue_report(&self, draft: ReportDraft) -> bool {
        match self.try_queue_report(draft).await {
            Ok(()) => true,
            Err(err) => {
                error!("queue report error: {err}");
                false
            }
        }
    }

    async fn try_queue_report(&self, draft: ReportDraft) -> Result<(), StoreError> {
        let mut entries = self.load().await?;
        entries.push(PendingReport {
            report: draft,
            timestamp: Utc::now().timestamp_millis(),
        });
        self.save(&entries).await
    }

    /// The pending sequence in enqueue order. Read or decode failures are
    /// logged and reported as an empty queue.
    pub async fn pending_reports(&self) -> Vec<PendingReport> {
        match self.load().await {
            Ok(entries) => entries,
            Err(err) => {
                error!("get pending reports error: {err}");
                Vec::new()
            }
        }
    }

    /// Removes every entry whose timestamp matches. Idempotent: removing an
    /// absent timestamp is a successful no-op.
    pub async fn remove_pending(&self, timestamp: i64) -> bool {
        match self.try_remove_pending(timestamp).await {
            Ok(()) => true,
            Err(err) => {
                error!("remove pending report error: {err}");
                false
            }
        }
    }

    async fn try_remove_pending(&self, timestamp: i64) -> Result<(), StoreError> {
        let mut entries = self.load().await?;
        entries.retain(|entry| entry.timestamp != timestamp);
        self.save(&entries).await
    }

    /// Drops the entire persisted pending sequence.
    pub async fn clear_pending(&self) -> bool {
        match self.store.remove(PENDING_REPORTS_KEY).await {
            Ok(()) => true,
            Err(err) => {
                error!("clear pending reports error: {err}");
                false
            }
        }
    }

    pub async fn save_preferences(&self, preferences: &UserPreferences) -> bool {
        match self.try_save_preferences(preferences).await {
            Ok(()) => true,
            Err(err) => {
                error!("save preferences error: {err}");
                false
            }
        }
    }

    async fn try_save_preferences(&self, preferences: &UserPreferences) -> Result<(), StoreError> {
        let raw = serde_json::to_string(preferences)?;
        self.store.set(USER_PREFERENCES_KEY, &raw).await
    }

    pub async fn preferences(&self) -> Option<UserPreferences> {
        match self.try_preferences().await {
            Ok(preferences) => preferences,
            Err(err) => {
                error!("get preferences error: {err}");
                None
            }
        }
    }

    async fn try_preferences(&self) -> Result<Option<UserPreferences>, StoreError> {
        match self.store.get(USER_PREFERENCES_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn load(&self) -> Result<Vec<PendingReport>, StoreError> {
        match self.store.get(PENDING_REPORTS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[PendingReport]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(PENDING_REPORTS_KEY, &raw).await
    }
}
