//! WebSocket wire messages.
//!
//! JSON frames tagged by a `type` field, with camelCase names matching the
//! browser client's payloads. Malformed frames fail deserialization and are
//! dropped by the gateway; nothing here panics on bad input.

use serde::{Deserialize, Serialize};

/// Inbound events (peer → server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Re-enter the membership registration path
    Join,
    Play {
        timestamp: i64,
    },
    Pause {
        timestamp: i64,
    },
    Seek {
        time: f64,
        timestamp: i64,
    },
    ChangeVideo {
        url: String,
        timestamp: i64,
    },
    /// Ask for a fresh snapshot, delivered to the requester only
    SyncRequest,
}

/// Outbound events (server → peer(s))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full snapshot, sent to a single new/requesting peer
    SessionState(SessionStateDto),
    Play {
        timestamp: i64,
    },
    Pause {
        timestamp: i64,
    },
    Seek {
        time: f64,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    VideoChanged {
        url: String,
        video_id: String,
    },
    UserJoined {
        count: usize,
    },
    UserLeft {
        count: usize,
    },
    DriftCorrection {
        time: f64,
        timestamp: i64,
    },
}

/// Full session snapshot payload (`sessionState`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateDto {
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub is_playing: bool,
    pub current_time: f64,
    pub last_updated: i64,
    pub connected_users: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_inbound_events() {
        // テスト項目: 各種インバウンドイベントが type タグで正しくパースされる
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"join"}"#).unwrap(),
            ClientEvent::Join
        );
        assert_eq!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"play","timestamp":1000}"#).unwrap(),
            ClientEvent::Play { timestamp: 1000 }
        );
        assert_eq!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"seek","time":42.0,"timestamp":1000}"#)
                .unwrap(),
            ClientEvent::Seek {
                time: 42.0,
                timestamp: 1000
            }
        );
        assert_eq!(
            serde_json::from_str::<ClientEvent>(
                r#"{"type":"changeVideo","url":"https://youtu.be/dQw4w9WgXcQ","timestamp":1000}"#
            )
            .unwrap(),
            ClientEvent::ChangeVideo {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
                timestamp: 1000
            }
        );
        assert_eq!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"syncRequest"}"#).unwrap(),
            ClientEvent::SyncRequest
        );
    }

    #[test]
    fn test_deserialize_rejects_malformed_events() {
        // テスト項目: 不完全・未知のイベントはパースエラーになる
        // given (前提条件):
        let seek_without_time = r#"{"type":"seek","timestamp":1000}"#;
        let unknown_type = r#"{"type":"fastForward","timestamp":1000}"#;
        let no_type = r#"{"timestamp":1000}"#;

        // when (操作):
        // then (期待する結果):
        assert!(serde_json::from_str::<ClientEvent>(seek_without_time).is_err());
        assert!(serde_json::from_str::<ClientEvent>(unknown_type).is_err());
        assert!(serde_json::from_str::<ClientEvent>(no_type).is_err());
    }

    #[test]
    fn test_serialize_session_state_uses_camel_case() {
        // テスト項目: sessionState が camelCase のフィールド名で出力される
        // given (前提条件):
        let event = ServerEvent::SessionState(SessionStateDto {
            video_id: Some("dQw4w9WgXcQ".to_string()),
            video_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            is_playing: true,
            current_time: 42.0,
            last_updated: 1000,
            connected_users: 2,
        });

        // when (操作):
        let value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "sessionState",
                "videoId": "dQw4w9WgXcQ",
                "videoUrl": "https://youtu.be/dQw4w9WgXcQ",
                "isPlaying": true,
                "currentTime": 42.0,
                "lastUpdated": 1000,
                "connectedUsers": 2
            })
        );
    }

    #[test]
    fn test_serialize_fan_out_events() {
        // テスト項目: ファンアウトイベントのワイヤ表現が期待通りになる
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(
            serde_json::to_value(ServerEvent::VideoChanged {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
                video_id: "dQw4w9WgXcQ".to_string(),
            })
            .unwrap(),
            json!({
                "type": "videoChanged",
                "url": "https://youtu.be/dQw4w9WgXcQ",
                "videoId": "dQw4w9WgXcQ"
            })
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::UserJoined { count: 3 }).unwrap(),
            json!({"type": "userJoined", "count": 3})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::UserLeft { count: 2 }).unwrap(),
            json!({"type": "userLeft", "count": 2})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::DriftCorrection {
                time: 42.5,
                timestamp: 1000
            })
            .unwrap(),
            json!({"type": "driftCorrection", "time": 42.5, "timestamp": 1000})
        );
    }
}
