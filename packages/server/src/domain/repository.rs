//! Repository trait definition.
//!
//! The domain layer defines the data-access interface it needs; the
//! infrastructure layer provides the concrete implementation (dependency
//! inversion).

use async_trait::async_trait;

use super::{PeerId, SessionSnapshot, Timestamp, VideoId};

/// Session repository trait.
///
/// Every method is atomic with respect to the others: the implementation
/// serializes all calls behind a single lock, which is what keeps the
/// session free of torn states while many connections and the drift task
/// operate on it concurrently. Methods are infallible by design — the only
/// store is in-memory and no core failure is ever surfaced as an error.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Immutable view with membership reduced to its cardinality
    async fn snapshot(&self) -> SessionSnapshot;

    /// Add a peer to the member set; returns the count after the call.
    /// Idempotent.
    async fn add_member(&self, peer_id: PeerId) -> usize;

    /// Remove a peer from the member set; returns the remaining count.
    /// Idempotent.
    async fn remove_member(&self, peer_id: &PeerId) -> usize;

    /// Current member count
    async fn count_members(&self) -> usize;

    /// Identifiers of all current members, for broadcast targeting.
    /// Internal to the server; never exposed on the wire.
    async fn member_ids(&self) -> Vec<PeerId>;

    /// Load a new video; zeroes the position and pauses playback
    async fn set_video(&self, url: String, id: VideoId, at: Timestamp);

    /// Start or stop playback
    async fn set_playing(&self, playing: bool, at: Timestamp);

    /// Move the playback anchor; does not change the playing flag
    async fn seek(&self, time: f64, at: Timestamp);

    /// Restore the initial playback value; membership is untouched
    async fn reset(&self, at: Timestamp);

    /// Extrapolated playback position at `now`, or `None` while paused.
    /// Read-only: the anchor never moves here.
    async fn extrapolated_position(&self, now: Timestamp) -> Option<f64>;
}
