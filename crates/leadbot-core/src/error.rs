//! Error types for lead delivery.

use thiserror::Error;

/// Reasons a lead could not be delivered to the staff chat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// No destination chat is configured; nothing was sent.
    #[error("destination chat is not configured")]
    Unconfigured,

    /// The transport refused the destination (unknown chat, missing rights, ...).
    #[error("destination rejected the message: {0}")]
    Rejected(String),

    /// Any other transport failure.
    #[error("delivery failed: {0}")]
    Unknown(String),
}

impl DeliveryError {
    /// Whether the failure points at the destination configuration rather
    /// than at the transport.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Unconfigured | Self::Rejected(_))
    }
}
