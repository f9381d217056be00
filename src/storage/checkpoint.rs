use chrono::{Duration, FixedOffset, Local, NaiveDateTime, Offset, Timelike};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// On-disk layout of a checkpoint, e.g. `2014-08-28T22:29:24.000`.
pub const CHECKPOINT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to write checkpoint '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clear checkpoint '{}': {source}", path.display())]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

fn checkpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // [0-9] rather than \d: \d also matches non-ASCII digits
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}$")
            .expect("checkpoint pattern is valid")
    })
}

/// Timestamp of the newest event that has already been delivered, in local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    raw: String,
    local: NaiveDateTime,
}

impl Checkpoint {
    /// Accepts only `YYYY-MM-DDTHH:MM:SS.mmm` naming a real calendar instant.
    pub fn parse(value: &str) -> Option<Self> {
        if !checkpoint_pattern().is_match(value) {
            return None;
        }

        let local = NaiveDateTime::parse_from_str(value, CHECKPOINT_FORMAT).ok()?;
        Some(Self {
            raw: value.to_string(),
            local,
        })
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Shift the stored local time to UTC using `offset` and render it for the
    /// log query. Milliseconds are dropped when they are zero.
    pub fn to_query_timestamp(&self, offset: FixedOffset) -> String {
        let utc = self.local - Duration::seconds(i64::from(offset.local_minus_utc()));

        if utc.nanosecond() / 1_000_000 == 0 {
            utc.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            utc.format(CHECKPOINT_FORMAT).to_string()
        }
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The local UTC offset as of now. Applied to checkpoints regardless of whether
/// daylight saving was in effect when they were recorded.
pub fn current_utc_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Single-file store for the delivery checkpoint.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint. A missing, unreadable or malformed file yields `None`.
    pub fn read(&self) -> Option<Checkpoint> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No checkpoint found");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Checkpoint unreadable, ignoring it"
                );
                return None;
            }
        };

        let value = content.trim();
        match Checkpoint::parse(value) {
            Some(checkpoint) => {
                tracing::info!(checkpoint = %checkpoint, "Loaded checkpoint");
                Some(checkpoint)
            }
            None => {
                tracing::warn!(
                    path = %self.path.display(),
                    content = value,
                    "Checkpoint has invalid format, ignoring it"
                );
                None
            }
        }
    }

    /// Overwrite the checkpoint with `timestamp` verbatim.
    ///
    /// The value goes to a sibling temp file first and is renamed into place, so
    /// an interrupted write leaves the previous checkpoint intact.
    pub fn write(&self, timestamp: &str) -> Result<()> {
        let to_error = |source| CheckpointError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, timestamp).map_err(to_error)?;
        fs::rename(&temp_path, &self.path).map_err(to_error)?;

        tracing::debug!(path = %self.path.display(), timestamp, "Checkpoint saved");
        Ok(())
    }

    /// Remove the checkpoint. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CheckpointError::Clear {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
