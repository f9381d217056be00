pub mod smtp;
pub mod stdout;

use thiserror::Error;

pub use smtp::SmtpNotifier;
pub use stdout::StdoutNotifier;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid mail address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers a batch of raw event text to the operator.
pub trait Notifier {
    /// Channel name, for logs.
    fn name(&self) -> &str;

    /// Send `body` verbatim. Returns only once delivery has completed.
    fn send(&self, body: &str) -> Result<(), DeliveryError>;
}
