//! Playback actions and their broadcast effects.

use super::{Timestamp, VideoId};

/// A playback command issued by a peer, with one strongly typed payload
/// per kind. Checked exhaustively at the dispatch site.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackAction {
    Play,
    Pause,
    Seek { time: f64 },
    ChangeVideo { url: String },
}

/// The state change a successfully dispatched action produced, handed back
/// to the gateway for fan-out to every peer (the sender included).
/// Timestamps are the server's own clock, never the sender's.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    Played { timestamp: Timestamp },
    Paused { timestamp: Timestamp },
    Sought { time: f64, timestamp: Timestamp },
    VideoChanged { url: String, video_id: VideoId },
}
