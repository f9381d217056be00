use super::query::LogQuery;
use super::{LogSource, SourceError};
use crate::config::SourceConfig;
use std::process::Command;
use tracing::{debug, info};

/// Runs the event-log query tool as a child process and captures its stdout.
///
/// The call blocks until the tool exits; there is no timeout.
#[derive(Debug, Clone)]
pub struct CommandLogSource {
    tool: String,
    logger: String,
}

impl CommandLogSource {
    pub fn new(tool: impl Into<String>, logger: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            logger: logger.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.tool, &config.logger)
    }

    fn execute(&self, query: &LogQuery) -> Result<String, SourceError> {
        info!(command = %query.command_line(&self.tool), "Querying event log");

        let output = Command::new(&self.tool)
            .args(query.args())
            .output()
            .map_err(|source| SourceError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Failed {
                tool: self.tool.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = text.len(), "Event log query returned");
        Ok(text)
    }
}

impl LogSource for CommandLogSource {
    fn query_events_since(&self, timestamp: &str) -> Result<String, SourceError> {
        self.execute(&LogQuery::since(&self.logger, timestamp))
    }

    fn query_last_n(&self, count: u32) -> Result<String, SourceError> {
        self.execute(&LogQuery::last_n(&self.logger, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        // echo prints the arguments it was given
        let source = CommandLogSource::new("echo", "System");
        let text = source.query_last_n(10).unwrap();

        assert_eq!(
            text.trim_end(),
            "qe System /q:*[System [(Level<4)]] /f:text /rd:true /c:10"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_since_passes_time_filter() {
        let source = CommandLogSource::new("echo", "Application");
        let text = source.query_events_since("2024-01-01T06:00:00").unwrap();

        assert!(text.contains("TimeCreated[@SystemTime>'2024-01-01T06:00:00']"));
        assert!(!text.contains("/c:"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_error() {
        let source = CommandLogSource::new("false", "System");
        let result = source.query_last_n(10);

        assert!(matches!(result, Err(SourceError::Failed { .. })));
    }

    #[test]
    fn test_missing_tool_is_error() {
        let source = CommandLogSource::new("eventmail-no-such-tool", "System");
        let result = source.query_last_n(10);

        match result {
            Err(SourceError::Spawn { tool, .. }) => assert_eq!(tool, "eventmail-no-such-tool"),
            other => panic!("expected spawn error, got {:?}", other),
        }
    }
}
