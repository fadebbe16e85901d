//! Delivery of lead texts to the staff chat.

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Receipt for a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
    /// Transport id of the posted message.
    pub message_id: i32,
}

/// Best-effort, at-most-once delivery to a single fixed destination.
///
/// Implementations make at most one send attempt per call and never retry.
/// An implementation without a destination must return
/// [`DeliveryError::Unconfigured`] without touching the network.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<Sent, DeliveryError>;
}
