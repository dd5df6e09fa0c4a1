//! Peer identity value object.

use uuid::Uuid;

/// Opaque identifier for a connected peer, unique per connection.
///
/// Peer identifiers never leave the server: snapshots expose membership
/// only as a count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId(String);

impl PeerId {
    /// Create a PeerId from an existing identifier string
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Factory for server-generated peer identifiers
pub struct PeerIdFactory;

impl PeerIdFactory {
    /// Generate a fresh identifier for a new connection
    pub fn generate() -> PeerId {
        PeerId(Uuid::new_v4().to_string())
    }
}
