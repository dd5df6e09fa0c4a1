//! Session domain model: the single shared record of playback truth.

use std::collections::HashSet;

use super::{PeerId, Timestamp, VideoId, VideoRef};

/// The shared playback session.
///
/// One instance exists per process. It is created at startup, mutated in
/// place for the whole process lifetime, and reset (never destroyed) when
/// the last peer leaves. Playback fields move only through the command
/// dispatch path; membership only through the connect/disconnect path.
#[derive(Debug, Clone)]
pub struct Session {
    video: Option<VideoRef>,
    playing: bool,
    /// Playback position in seconds as of `anchor_timestamp`. Never negative.
    anchor_time: f64,
    /// Wall-clock instant at which `anchor_time` was last authoritative.
    anchor_timestamp: Timestamp,
    members: HashSet<PeerId>,
}

/// Immutable view of the session handed to external consumers.
///
/// Membership is reduced to its cardinality: raw peer identifiers never
/// leave the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub playing: bool,
    pub current_time: f64,
    pub last_updated: i64,
    pub connected_peers: usize,
}

impl Session {
    /// Create the initial session: no video, paused, position zero
    pub fn new(now: Timestamp) -> Self {
        Self {
            video: None,
            playing: false,
            anchor_time: 0.0,
            anchor_timestamp: now,
            members: HashSet::new(),
        }
    }

    /// Take an immutable view of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            video_id: self.video.as_ref().map(|v| v.id.as_str().to_string()),
            video_url: self.video.as_ref().map(|v| v.url.clone()),
            playing: self.playing,
            current_time: self.anchor_time,
            last_updated: self.anchor_timestamp.value(),
            connected_peers: self.members.len(),
        }
    }

    /// Load a new video: position is zeroed and playback pauses
    pub fn set_video(&mut self, url: String, id: VideoId, at: Timestamp) {
        self.video = Some(VideoRef { id, url });
        self.anchor_time = 0.0;
        self.playing = false;
        self.anchor_timestamp = at;
    }

    /// Start or stop playback, re-anchoring the position at `at`
    pub fn set_playing(&mut self, playing: bool, at: Timestamp) {
        self.playing = playing;
        self.anchor_timestamp = at;
    }

    /// Move the anchor position. Does not change the playing flag.
    /// Negative positions are clamped to zero.
    pub fn seek(&mut self, time: f64, at: Timestamp) {
        self.anchor_time = time.max(0.0);
        self.anchor_timestamp = at;
    }

    /// Playback position extrapolated to `now`.
    ///
    /// Paused sessions report the anchor unchanged. While playing, the
    /// wall-clock time elapsed since the anchor is added; negative elapsed
    /// time (a clock anomaly) clamps to zero so the reported position never
    /// runs behind its own anchor.
    pub fn extrapolated_time(&self, now: Timestamp) -> f64 {
        if !self.playing {
            return self.anchor_time;
        }
        let elapsed_millis = (now.value() - self.anchor_timestamp.value()).max(0);
        self.anchor_time + elapsed_millis as f64 / 1000.0
    }

    /// Idempotent: adding an already-present peer is a no-op
    pub fn add_member(&mut self, peer_id: PeerId) {
        self.members.insert(peer_id);
    }

    /// Idempotent: removing an absent peer is a no-op
    pub fn remove_member(&mut self, peer_id: &PeerId) {
        self.members.remove(peer_id);
    }

    /// Number of connected peers; always derived from the member set
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Member identifiers for broadcast targeting. Server-internal:
    /// external views only ever see the count.
    pub fn member_ids(&self) -> Vec<PeerId> {
        self.members.iter().cloned().collect()
    }

    /// Restore the initial playback value in place.
    ///
    /// Membership is left untouched: clearing members is the membership
    /// coordinator's call, which also decides when reset fires.
    pub fn reset(&mut self, at: Timestamp) {
        self.video = None;
        self.playing = false;
        self.anchor_time = 0.0;
        self.anchor_timestamp = at;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn video(&self) -> Option<&VideoRef> {
        self.video.as_ref()
    }

    pub fn anchor_time(&self) -> f64 {
        self.anchor_time
    }

    pub fn anchor_timestamp(&self) -> Timestamp {
        self.anchor_timestamp
    }
}
