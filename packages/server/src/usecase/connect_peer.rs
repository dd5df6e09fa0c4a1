//! UseCase: peer 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - peer の登録（メンバー追加、送信チャンネル登録、スナップショット取得）
//!
//! ### なぜこのテストが必要か
//! - 新規 peer が現在の再生状態を必ず受け取れることを保証
//! - メンバー数が常にメンバー集合の要素数と一致することを確認
//! - 重複登録（join の再送など）が冪等であることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 peer の接続
//! - エッジケース：同一 peer の重複登録

use std::sync::Arc;

use crate::domain::{MessagePusher, PeerId, PusherChannel, SessionRepository, SessionSnapshot};

/// peer 接続のユースケース
pub struct ConnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// peer 接続を実行
    ///
    /// 送信チャンネルを登録し、メンバー集合に追加したうえで、接続後の
    /// スナップショットを返す。スナップショットはその peer にのみ送り、
    /// メンバー数（`connected_peers`）は全 peer に通知する。
    ///
    /// # Arguments
    ///
    /// * `peer_id` - 接続する peer の ID（サーバー生成、接続ごとに一意）
    /// * `sender` - peer へのメッセージ送信用チャンネル
    pub async fn execute(&self, peer_id: PeerId, sender: PusherChannel) -> SessionSnapshot {
        self.message_pusher
            .register_peer(peer_id.clone(), sender)
            .await;
        let count = self.repository.add_member(peer_id).await;
        tracing::debug!("Peer registered ({} connected)", count);

        self.repository.snapshot().await
    }

    /// 単一の peer にメッセージを送信する
    ///
    /// # Arguments
    ///
    /// * `peer_id` - 送信先の peer の ID
    /// * `message` - 送信するメッセージ（JSON）
    pub async fn push_to(&self, peer_id: &PeerId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(peer_id, message).await {
            tracing::warn!("Failed to push to peer '{}': {}", peer_id.as_str(), e);
        }
    }

    /// 接続中の全 peer にブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_all(&self, message: &str) {
        let targets = self.repository.member_ids().await;
        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast: {}", e);
        }
    }
}
