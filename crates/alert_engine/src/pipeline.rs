use alert_core::{filter_new, SeenSet};
use alert_logging::{alert_error, alert_info};

use crate::fetch::JobSource;
use crate::notify::Notifier;
use crate::store::SeenStore;
use crate::types::CycleReport;

/// One full fetch -> dedup -> notify -> persist pass, run sequentially.
///
/// All failures are contained to the cycle: the fetcher degrades to an empty
/// batch, the notifier swallows delivery errors, and a failed state save is
/// logged. Callers can therefore loop on [`run_cycle`](Self::run_cycle)
/// forever.
pub struct AlertPipeline<S, N> {
    source: S,
    notifier: N,
    store: SeenStore,
    seen: SeenSet,
}

impl<S: JobSource, N: Notifier> AlertPipeline<S, N> {
    /// Loads prior seen-state from the store and wires up the pipeline.
    pub fn new(source: S, notifier: N, store: SeenStore) -> Self {
        let seen = store.load();
        Self {
            source,
            notifier,
            store,
            seen,
        }
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.seen.len()
    }

    pub async fn run_cycle(&mut self) -> CycleReport {
        let records = self.source.fetch_jobs().await;
        if records.is_empty() {
            alert_info!("No jobs found this cycle");
            return CycleReport::default();
        }

        let fetched = records.len();
        let new_records = filter_new(records, &mut self.seen);
        if new_records.is_empty() {
            alert_info!("No new jobs among {fetched} fetched");
            return CycleReport { fetched, new: 0 };
        }

        alert_info!("Found {} new job(s), sending email", new_records.len());
        self.notifier.notify(&new_records).await;

        // A failed send does not block persistence: these jobs are now
        // marked seen and will not be re-notified.
        if let Err(err) = self.store.save(&self.seen) {
            alert_error!("Failed to persist seen set to {:?}: {}", self.store.path(), err);
        }

        CycleReport {
            fetched,
            new: new_records.len(),
        }
    }
}
