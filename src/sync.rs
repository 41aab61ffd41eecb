use log::{error, info};

use crate::api::{Connectivity, CreateReport, ReportApi};
use crate::models::{Report, ReportDraft};
use crate::queue::ReportQueue;
use crate::store::KeyValueStore;

/// Aggregate result of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOutcome {
    pub synced: usize,
    pub failed: usize,
}

/// How a user submission was resolved. Never silent loss: every variant is
/// something the caller can put in front of the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Accepted by the remote service.
    Submitted(Report),
    /// Stored in the offline queue for a later sync.
    SavedOffline,
    /// Neither the remote service nor local storage accepted it.
    NotSaved,
}

/// Best-effort delivery of every pending report, oldest first.
///
/// Each entry is submitted independently: a success removes it from the
/// queue, a failure leaves it queued for the next pass and moves on. The
/// pass is not transactional and assumes a single foreground caller.
pub async fn sync_pending_reports<S, A>(queue: &ReportQueue<S>, api: &A) -> SyncOutcome
where
    S: KeyValueStore,
    A: ReportApi,
{
    let pending = queue.pending_reports().await;
    if pending.is_empty() {
        return SyncOutcome::default();
    }

    let mut outcome = SyncOutcome::default();
    for entry in pending {
        match api.create(&CreateReport::from_draft(&entry.report)).await {
            Ok(_) => {
                queue.remove_pending(entry.timestamp).await;
                outcome.synced += 1;
            }
            Err(err) => {
                error!("sync error for report queued at {}: {err}", entry.timestamp);
                outcome.failed += 1;
            }
        }
    }

    if outcome.synced > 0 {
        info!("synced {} pending report(s)", outcome.synced);
    }
    outcome
}

/// Routes a new report either straight to the remote service or into the
/// offline queue, depending on connectivity. A failed direct submission
/// falls back to the queue so the report is never dropped.
pub async fn submit_report<S, A, C>(
    queue: &ReportQueue<S>,
    api: &A,
    connectivity: &C,
    draft: ReportDraft,
) -> SubmissionOutcome
where
    S: KeyValueStore,
    A: ReportApi,
    C: Connectivity,
{
    if !connectivity.is_connected().await {
        return save_offline(queue, draft).await;
    }

    match api.create(&CreateReport::from_draft(&draft)).await {
        Ok(report) => SubmissionOutcome::Submitted(report),
        Err(err) => {
            error!("submit error, falling back to offline queue: {err}");
            save_offline(queue, draft).await
        }
    }
}

async fn save_offline<S: KeyValueStore>(
    queue: &ReportQueue<S>,
    draft: ReportDraft,
) -> SubmissionOutcome {
    if queue.queue_report(draft).await {
        SubmissionOutcome::SavedOffline
    } else {
        SubmissionOutcome::NotSaved
    }
}
