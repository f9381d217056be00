use super::{DeliveryError, Notifier};
use std::io::Write;
use std::sync::Mutex;

/// Prints the would-be mail instead of sending it. Used for `--dry-run`.
pub struct StdoutNotifier<W: Write = std::io::Stdout> {
    to: String,
    subject: String,
    out: Mutex<W>,
}

impl StdoutNotifier {
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::with_writer(to, subject, std::io::stdout())
    }
}

impl<W: Write> StdoutNotifier<W> {
    pub fn with_writer(to: impl Into<String>, subject: impl Into<String>, out: W) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> Notifier for StdoutNotifier<W> {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send(&self, body: &str) -> Result<(), DeliveryError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "To: {}", self.to)?;
        writeln!(out, "Subject: {}", self.subject)?;
        writeln!(out)?;
        out.write_all(body.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prints_headers_then_body() {
        let notifier = StdoutNotifier::with_writer("oncall@example.com", "Events", Vec::new());
        notifier.send("  Date: 2024-01-03T10:00:00.000\n").unwrap();

        let printed = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(
            printed,
            "To: oncall@example.com\nSubject: Events\n\n  Date: 2024-01-03T10:00:00.000\n"
        );
    }
}
