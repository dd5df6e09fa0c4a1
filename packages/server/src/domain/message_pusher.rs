//! MessagePusher trait: the outbound-delivery seam.
//!
//! UseCases depend on this trait; the infrastructure layer provides the
//! WebSocket implementation (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::PeerId;

/// Outbound channel registered for each connected peer.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq)]
pub enum MessagePushError {
    #[error("peer '{0}' is not registered")]
    PeerNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Delivery abstraction between the usecases and the connection layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a peer's outbound channel
    async fn register_peer(&self, peer_id: PeerId, sender: PusherChannel);

    /// Unregister a peer's outbound channel
    async fn unregister_peer(&self, peer_id: &PeerId);

    /// Push a message to a single peer
    async fn push_to(&self, peer_id: &PeerId, content: &str) -> Result<(), MessagePushError>;

    /// Push a message to every target, tolerating individual send failures
    async fn broadcast(
        &self,
        targets: Vec<PeerId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
