//! SMTP submission with STARTTLS and login.

use super::{DeliveryError, Notifier};
use crate::config::MailConfig;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::info;

/// Placeholder in the subject replaced with the local host name.
pub const HOST_PLACEHOLDER: &str = "{host}";

#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    username: String,
    password: String,
    from: Mailbox,
    to: Mailbox,
    subject: String,
    timeout: Option<Duration>,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(config.sender())?;
        let to = parse_mailbox(&config.to)?;

        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            from,
            to,
            subject: expand_subject(&config.subject, &local_hostname()),
            timeout: config.timeout,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Plain-text message with the fixed headers and `body` as is.
    pub fn build_message(&self, body: &str) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let transport = SmtpTransport::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .timeout(self.timeout)
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn send(&self, body: &str) -> Result<(), DeliveryError> {
        let message = self.build_message(body)?;

        info!(host = %self.host, port = self.port, to = %self.to, "Sending event mail");
        // One connection per message, closed once the message is accepted
        self.transport()?.send(&message)?;
        info!(to = %self.to, "Event mail delivered");

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|source| DeliveryError::Address {
            address: address.to_string(),
            source,
        })
}

fn local_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown-host".to_string())
}

pub fn expand_subject(template: &str, host: &str) -> String {
    template.replace(HOST_PLACEHOLDER, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "ops@example.com".to_string(),
            password: "secret".to_string(),
            from: None,
            to: "oncall@example.com".to_string(),
            subject: "Mail from eventmail".to_string(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    #[test]
    fn test_expand_subject() {
        assert_eq!(
            expand_subject("Mail from eventmail on {host}", "build-01"),
            "Mail from eventmail on build-01"
        );
        assert_eq!(expand_subject("Mail from eventmail", "build-01"), "Mail from eventmail");
    }

    #[test]
    fn test_message_headers_and_body() {
        let notifier = SmtpNotifier::from_config(&mail_config()).unwrap();
        let message = notifier
            .build_message("Event[0]:\n  Date: 2024-01-03T10:00:00.000\n")
            .unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: ops@example.com"));
        assert!(formatted.contains("To: oncall@example.com"));
        assert!(formatted.contains("Subject: Mail from eventmail"));
        assert!(formatted.contains("Content-Type: text/plain"));
        assert!(formatted.contains("  Date: 2024-01-03T10:00:00.000"));
    }

    #[test]
    fn test_explicit_sender() {
        let mut config = mail_config();
        config.from = Some("alerts@example.com".to_string());

        let notifier = SmtpNotifier::from_config(&config).unwrap();
        let formatted = String::from_utf8(notifier.build_message("x").unwrap().formatted()).unwrap();

        assert!(formatted.contains("From: alerts@example.com"));
    }

    #[test]
    fn test_invalid_recipient() {
        let mut config = mail_config();
        config.to = "nobody".to_string();

        match SmtpNotifier::from_config(&config) {
            Err(DeliveryError::Address { address, .. }) => assert_eq!(address, "nobody"),
            other => panic!("expected address error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unreachable_relay_is_delivery_error() {
        let mut config = mail_config();
        config.host = "127.0.0.1".to_string();
        config.port = 1;
        config.timeout = Some(Duration::from_secs(2));

        let notifier = SmtpNotifier::from_config(&config).unwrap();
        let result = notifier.send("Date: 2024-01-01T08:00:00.000");

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
