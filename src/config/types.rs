use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_logger")]
    pub logger: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            logger: default_logger(),
        }
    }
}

fn default_tool() -> String {
    "wevtutil".to_string()
}

fn default_logger() -> String {
    "System".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_checkpoint_path")]
    pub path: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: default_checkpoint_path(),
        }
    }
}

/// `<local data dir>/eventmail/timestamp.txt`, or the working directory when the
/// platform has no data dir.
pub fn default_checkpoint_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eventmail")
        .join("timestamp.txt")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address. Falls back to `username` when omitted.
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Bound on each SMTP exchange. Unlike the log query, mail delivery is timed
    /// out by default; `timeout: null` removes the bound.
    #[serde(default = "default_timeout", with = "humantime_serde::option")]
    pub timeout: Option<Duration>,
}

impl MailConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

fn default_port() -> u16 {
    587
}

fn default_subject() -> String {
    "Mail from eventmail".to_string()
}

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let yaml = r#"
mail:
  host: smtp.example.com
  username: ops@example.com
  password: secret
  to: oncall@example.com
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.source.tool, "wevtutil");
        assert_eq!(config.source.logger, "System");
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.subject, "Mail from eventmail");
        assert_eq!(config.mail.timeout, Some(Duration::from_secs(60)));
        assert!(config.checkpoint.path.ends_with("eventmail/timestamp.txt"));
    }

    #[test]
    fn test_sender_falls_back_to_username() {
        let yaml = r#"
host: smtp.example.com
username: ops@example.com
password: secret
to: oncall@example.com
"#;
        let mut mail: MailConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(mail.sender(), "ops@example.com");

        mail.from = Some("alerts@example.com".to_string());
        assert_eq!(mail.sender(), "alerts@example.com");
    }

    #[test]
    fn test_humantime_timeout() {
        let yaml = r#"
host: smtp.example.com
username: ops@example.com
password: secret
to: oncall@example.com
timeout: 2m
"#;
        let mail: MailConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(mail.timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_null_timeout_is_unbounded() {
        let yaml = r#"
host: smtp.example.com
username: ops@example.com
password: secret
to: oncall@example.com
timeout: null
"#;
        let mail: MailConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(mail.timeout, None);
    }
}
