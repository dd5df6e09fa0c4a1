//! Domain Model から DTO への変換

use crate::domain::{ActionEffect, SessionSnapshot};

use super::websocket::{ServerEvent, SessionStateDto};

impl From<SessionSnapshot> for SessionStateDto {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            video_id: snapshot.video_id,
            video_url: snapshot.video_url,
            is_playing: snapshot.playing,
            current_time: snapshot.current_time,
            last_updated: snapshot.last_updated,
            connected_users: snapshot.connected_peers,
        }
    }
}

impl From<ActionEffect> for ServerEvent {
    fn from(effect: ActionEffect) -> Self {
        match effect {
            ActionEffect::Played { timestamp } => ServerEvent::Play {
                timestamp: timestamp.value(),
            },
            ActionEffect::Paused { timestamp } => ServerEvent::Pause {
                timestamp: timestamp.value(),
            },
            ActionEffect::Sought { time, timestamp } => ServerEvent::Seek {
                time,
                timestamp: timestamp.value(),
            },
            ActionEffect::VideoChanged { url, video_id } => ServerEvent::VideoChanged {
                url,
                video_id: video_id.as_str().to_string(),
            },
        }
    }
}
