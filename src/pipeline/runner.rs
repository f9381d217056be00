use crate::notify::{DeliveryError, Notifier};
use crate::source::{extract_latest_timestamp, LogSource, QueryWindow, SourceError, INITIAL_EVENT_COUNT};
use crate::storage::checkpoint::{current_utc_offset, Checkpoint, CheckpointError, CheckpointStore};
use chrono::FixedOffset;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("event log query failed: {0}")]
    Source(#[from] SourceError),

    #[error("event mail delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The query matched nothing; nothing was sent or saved.
    NoEvents { window: QueryWindow },
    /// The batch was delivered and the checkpoint advanced to `timestamp`.
    Delivered { window: QueryWindow, timestamp: String },
    /// The batch was handed to the notifier but the checkpoint was left alone.
    DryRun { window: QueryWindow, timestamp: String },
}

/// One pass of: read checkpoint, query, find newest timestamp, notify, save.
///
/// The checkpoint is written only after the notifier returned successfully, so a
/// failed delivery leaves it untouched and the next run resends the same window.
pub struct Runner<S, N> {
    store: CheckpointStore,
    source: S,
    notifier: N,
    utc_offset: FixedOffset,
    dry_run: bool,
}

impl<S: LogSource, N: Notifier> Runner<S, N> {
    pub fn new(store: CheckpointStore, source: S, notifier: N) -> Self {
        Self {
            store,
            source,
            notifier,
            utc_offset: current_utc_offset(),
            dry_run: false,
        }
    }

    /// Override the offset used to convert the local checkpoint to UTC.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Skip the checkpoint write after notifying.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// No checkpoint means the last `INITIAL_EVENT_COUNT` events; otherwise
    /// everything after the checkpoint, shifted to UTC.
    pub fn query_window(&self, checkpoint: Option<&Checkpoint>) -> QueryWindow {
        match checkpoint {
            Some(checkpoint) => QueryWindow::Since(checkpoint.to_query_timestamp(self.utc_offset)),
            None => QueryWindow::LastN(INITIAL_EVENT_COUNT),
        }
    }

    pub fn run(&self) -> Result<RunOutcome, RunError> {
        let checkpoint = self.store.read();
        let window = self.query_window(checkpoint.as_ref());

        let raw = match &window {
            QueryWindow::Since(timestamp) => {
                info!(since = %timestamp, "Querying events since checkpoint");
                self.source.query_events_since(timestamp)?
            }
            QueryWindow::LastN(count) => {
                info!(count, "No checkpoint, querying latest events");
                self.source.query_last_n(*count)?
            }
        };

        let Some(timestamp) = extract_latest_timestamp(&raw) else {
            info!("No new events, nothing to send");
            return Ok(RunOutcome::NoEvents { window });
        };
        info!(latest = %timestamp, bytes = raw.len(), "Found new events");

        self.notifier.send(&raw)?;

        if self.dry_run {
            info!(notifier = self.notifier.name(), "Dry run, checkpoint not updated");
            return Ok(RunOutcome::DryRun { window, timestamp });
        }

        if !Checkpoint::is_valid(&timestamp) {
            warn!(
                timestamp = %timestamp,
                "Event timestamp does not match the checkpoint format; the next run will resend the latest events"
            );
        }
        self.store.write(&timestamp)?;
        info!(
            notifier = self.notifier.name(),
            checkpoint = %timestamp,
            "Events delivered, checkpoint updated"
        );

        Ok(RunOutcome::Delivered { window, timestamp })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct FixedSource(&'static str);

    impl LogSource for FixedSource {
        fn query_events_since(&self, _timestamp: &str) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }

        fn query_last_n(&self, _count: u32) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: RefCell<usize>,
    }

    impl Notifier for CountingNotifier {
        fn name(&self) -> &str {
            "counting"
        }

        fn send(&self, _body: &str) -> Result<(), DeliveryError> {
            *self.sent.borrow_mut() += 1;
            Ok(())
        }
    }

    fn runner(dir: &TempDir, raw: &'static str) -> Runner<FixedSource, CountingNotifier> {
        Runner::new(
            CheckpointStore::new(dir.path().join("timestamp.txt")),
            FixedSource(raw),
            CountingNotifier::default(),
        )
        .with_utc_offset(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_query_window_without_checkpoint() {
        let dir = TempDir::new().unwrap();
        assert_eq!(runner(&dir, "").query_window(None), QueryWindow::LastN(10));
    }

    #[test]
    fn test_query_window_with_checkpoint() {
        let dir = TempDir::new().unwrap();
        let checkpoint = Checkpoint::parse("2024-01-01T08:00:00.000").unwrap();
        let runner = runner(&dir, "").with_utc_offset(FixedOffset::west_opt(3600).unwrap());

        assert_eq!(
            runner.query_window(Some(&checkpoint)),
            QueryWindow::Since("2024-01-01T09:00:00".to_string())
        );
    }

    #[test]
    fn test_dry_run_leaves_checkpoint_alone() {
        let dir = TempDir::new().unwrap();
        let runner = runner(&dir, "  Date: 2024-01-03T10:00:00.000\n").dry_run(true);

        let outcome = runner.run().unwrap();

        assert_eq!(
            outcome,
            RunOutcome::DryRun {
                window: QueryWindow::LastN(10),
                timestamp: "2024-01-03T10:00:00.000".to_string(),
            }
        );
        assert_eq!(*runner.notifier().sent.borrow(), 1);
        assert!(!runner.store().path().exists());
    }

    #[test]
    fn test_unusual_timestamp_is_still_saved() {
        let dir = TempDir::new().unwrap();
        let runner = runner(&dir, "Date: 28/08/2014 22:29\n");

        runner.run().unwrap();

        assert_eq!(
            std::fs::read_to_string(runner.store().path()).unwrap(),
            "28/08/2014 22:29"
        );
        assert!(runner.store().read().is_none());
    }
}
