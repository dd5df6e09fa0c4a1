//! Periodic drift-correction task.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::{infrastructure::dto::websocket::ServerEvent, usecase::BroadcastDriftUseCase};

/// Owns the repeating drift-correction broadcast.
///
/// Spawned next to the listener and aborted on server shutdown (and on
/// drop), so the task never outlives the session it corrects. Each tick is
/// a read-only pass: while playing, the extrapolated position goes out to
/// every peer; while paused, nothing is sent.
pub struct DriftBroadcaster {
    handle: JoinHandle<()>,
}

impl DriftBroadcaster {
    /// Start ticking at the given period
    pub fn spawn(usecase: Arc<BroadcastDriftUseCase>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval fires immediately; skip straight to the cadence
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(correction) = usecase.execute().await else {
                    continue; // paused: nothing to correct
                };

                let event = ServerEvent::DriftCorrection {
                    time: correction.time,
                    timestamp: correction.timestamp.value(),
                };
                match serde_json::to_string(&event) {
                    Ok(json) => usecase.broadcast_all(&json).await,
                    Err(e) => {
                        tracing::error!("Failed to serialize drift correction: {}", e);
                    }
                }
            }
        });

        Self { handle }
    }

    /// Stop ticking. Safe to call more than once.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for DriftBroadcaster {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePusher as _, PeerId, Session, SessionRepository as _, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use kotatsu_shared::time::{SystemClock, get_unix_timestamp};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    async fn create_ticking_setup() -> (
        Arc<BroadcastDriftUseCase>,
        Arc<InMemorySessionRepository>,
        tokio::sync::mpsc::UnboundedReceiver<String>,
    ) {
        let session = Arc::new(Mutex::new(Session::new(Timestamp::new(get_unix_timestamp()))));
        let repository = Arc::new(InMemorySessionRepository::new(session));
        let peers = Arc::new(Mutex::new(HashMap::new()));
        let pusher = Arc::new(WebSocketMessagePusher::new(peers));

        let alice = PeerId::new("alice".to_string());
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        pusher.register_peer(alice.clone(), tx).await;
        repository.add_member(alice).await;

        let usecase = Arc::new(BroadcastDriftUseCase::new(
            repository.clone(),
            pusher,
            Arc::new(SystemClock),
        ));
        (usecase, repository, rx)
    }

    #[tokio::test]
    async fn test_broadcaster_emits_while_playing() {
        // テスト項目: 再生中は tick ごとに driftCorrection が配信される
        // given (前提条件):
        let (usecase, repository, mut rx) = create_ticking_setup().await;
        let now = get_unix_timestamp();
        repository.seek(10.0, Timestamp::new(now)).await;
        repository.set_playing(true, Timestamp::new(now)).await;

        // when (操作):
        let broadcaster = DriftBroadcaster::spawn(usecase, Duration::from_millis(50));

        // then (期待する結果):
        let received = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("expected a drift correction within the timeout")
            .expect("channel closed unexpectedly");
        let value: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(value["type"], "driftCorrection");
        assert!(value["time"].as_f64().unwrap() >= 10.0);

        broadcaster.abort();
    }

    #[tokio::test]
    async fn test_broadcaster_is_silent_while_paused() {
        // テスト項目: 一時停止中は tick が何も配信しない
        // given (前提条件):
        let (usecase, _repository, mut rx) = create_ticking_setup().await;

        // when (操作):
        let broadcaster = DriftBroadcaster::spawn(usecase, Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(300)).await;

        // then (期待する結果):
        assert!(rx.try_recv().is_err());

        broadcaster.abort();
    }
}
