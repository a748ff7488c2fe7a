// Per-region, per-kind collection. Exhausts every page of a listing; any
// failure turns the whole source into an empty result, logged, never raised.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, instrument, warn};

use crate::clients::{ResourceLister, SourceError};
use crate::models::{Page, RawSnapshot, RawVolume, SnapshotKind};

/// Outcome of one source listing: the records, or the failure that emptied it.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Collected(Vec<T>),
    Failed(SourceError),
}

impl<T> SourceOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceOutcome::Failed(_))
    }

    /// Records on success, the empty fallback on failure.
    pub fn into_records(self) -> Vec<T> {
        match self {
            SourceOutcome::Collected(items) => items,
            SourceOutcome::Failed(_) => Vec::new(),
        }
    }
}

impl<T> From<Result<Vec<T>, SourceError>> for SourceOutcome<T> {
    fn from(r: Result<Vec<T>, SourceError>) -> Self {
        match r {
            Ok(items) => SourceOutcome::Collected(items),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

/// Follows continuation tokens until the listing reports no more pages.
pub async fn drain_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, SourceError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, SourceError>>,
{
    let mut items = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut token: Option<String> = None;
    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);
        match page.next_page_token {
            Some(next) => {
                if !seen_tokens.insert(next.clone()) {
                    return Err(SourceError::PaginationLoop(next));
                }
                token = Some(next);
            }
            None => return Ok(items),
        }
    }
}

#[instrument(skip(lister), fields(operation = "collect_snapshots"))]
pub async fn collect_snapshots(
    lister: &dyn ResourceLister,
    region: &str,
    kind: SnapshotKind,
) -> SourceOutcome<RawSnapshot> {
    let outcome: SourceOutcome<RawSnapshot> = drain_pages(|token| async move {
        lister.list_snapshots(region, kind, token.as_deref()).await
    })
    .await
    .into();
    log_outcome(&outcome, region, kind.label());
    outcome
}

#[instrument(skip(lister), fields(operation = "collect_volumes"))]
pub async fn collect_volumes(lister: &dyn ResourceLister, region: &str) -> SourceOutcome<RawVolume> {
    let outcome: SourceOutcome<RawVolume> =
        drain_pages(|token| async move { lister.list_volumes(region, token.as_deref()).await })
            .await
            .into();
    log_outcome(&outcome, region, "volume");
    outcome
}

fn log_outcome<T>(outcome: &SourceOutcome<T>, region: &str, source: &str) {
    match outcome {
        SourceOutcome::Collected(items) => {
            debug!(region, source, records = items.len(), "source collected");
        }
        SourceOutcome::Failed(e) => {
            warn!(error = %e, region, source, "source failed; treating as empty");
        }
    }
}
