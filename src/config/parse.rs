use super::types::*;
use crate::config::{env_var_pattern, expand_env_vars, expand_tilde};
use lettre::message::Mailbox;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string)
}

/// Parse and validate config from a YAML string. Environment variables are
/// expanded before parsing.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    let yaml_string = expand_env_vars(yaml);

    check_unexpanded_vars(&yaml_string)?;

    let mut config: Config = serde_yaml::from_str(&yaml_string)?;

    config.checkpoint.path = expand_tilde(&config.checkpoint.path);

    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    // References inside comments are never used, so they need not be set
    let mut unexpanded_vars: Vec<String> = yaml_string
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| env_var_pattern().captures_iter(line))
        .map(|cap| cap[1].to_string())
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    let error_msg = if unexpanded_vars.len() == 1 {
        format!(
            "Environment variable $env{{{0}}} is not set.\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variable: export {0}=...\n\
             2. Replace $env{{{0}}} in the config file with the actual value",
            unexpanded_vars[0]
        )
    } else {
        format!(
            "Environment variables are not set: {}\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variables\n\
             2. Replace the variables in the config file with actual values",
            unexpanded_vars.join(", ")
        )
    };

    Err(ConfigError::Validation(error_msg))
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.source.tool.trim().is_empty() {
        errors.push("source.tool cannot be empty".to_string());
    }
    if config.source.logger.trim().is_empty() {
        errors.push("source.logger cannot be empty".to_string());
    }

    validate_mail(&config.mail, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

fn validate_mail(mail: &MailConfig, errors: &mut Vec<String>) {
    if mail.host.trim().is_empty() {
        errors.push("mail.host cannot be empty".to_string());
    }
    if mail.port == 0 {
        errors.push("mail.port must be non-zero".to_string());
    }
    if mail.username.trim().is_empty() {
        errors.push("mail.username cannot be empty".to_string());
    }

    if let Err(e) = mail.sender().parse::<Mailbox>() {
        errors.push(format!("mail.from: invalid address '{}': {}", mail.sender(), e));
    }
    if let Err(e) = mail.to.parse::<Mailbox>() {
        errors.push(format!("mail.to: invalid address '{}': {}", mail.to, e));
    }
}
