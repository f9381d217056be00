pub mod command;
pub mod query;
pub mod timestamp;

use thiserror::Error;

pub use command::CommandLogSource;
pub use query::{LogQuery, QueryWindow, INITIAL_EVENT_COUNT, SEVERITY_FILTER};
pub use timestamp::extract_latest_timestamp;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Where raw event text comes from.
///
/// Both queries filter to Critical, Error and Warning events and return the
/// tool's text output verbatim, newest event first.
pub trait LogSource {
    /// Events created after `timestamp` (UTC).
    fn query_events_since(&self, timestamp: &str) -> Result<String, SourceError>;

    /// The newest `count` events.
    fn query_last_n(&self, count: u32) -> Result<String, SourceError>;
}
