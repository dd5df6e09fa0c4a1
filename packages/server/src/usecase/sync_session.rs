//! UseCase: セッション状態の同期取得
//!
//! `syncRequest` / `join` の応答と HTTP のデバッグ表示に使う、現在の
//! スナップショット取得と要求元 peer への送り返し。

use std::sync::Arc;

use crate::domain::{MessagePusher, PeerId, SessionRepository, SessionSnapshot};

/// セッション状態取得のユースケース
pub struct SyncSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SyncSessionUseCase {
    /// 新しい SyncSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 現在のセッションスナップショットを取得する
    pub async fn execute(&self) -> SessionSnapshot {
        self.repository.snapshot().await
    }

    /// 要求元の peer にのみメッセージを送り返す
    ///
    /// # Arguments
    ///
    /// * `peer_id` - 要求元 peer の ID
    /// * `message` - 送信するメッセージ（JSON）
    pub async fn push_to(&self, peer_id: &PeerId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(peer_id, message).await {
            tracing::warn!("Failed to push snapshot to '{}': {}", peer_id.as_str(), e);
        }
    }
}
