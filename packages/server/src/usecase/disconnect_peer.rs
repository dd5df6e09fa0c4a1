//! UseCase: peer 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//! - peer の削除と、最後の peer が抜けたときのセッションリセット
//!
//! ### なぜこのテストが必要か
//! - 全員が退出したセッションが次の来訪者のためにまっさらに戻ることを保証
//! - 切断処理の冪等性（未知の peer の切断が no-op であること）を確認
//! - リセットの判断はこのユースケースだけが持つため
//!
//! ### どのような状況を想定しているか
//! - 正常系：peer の切断と残メンバー数の返却
//! - エッジケース：最後の peer の切断（リセット発火）
//! - 異常系：存在しない peer の切断試行

use std::sync::Arc;

use kotatsu_shared::time::Clock;

use crate::domain::{MessagePusher, PeerId, SessionRepository, Timestamp};

/// peer 切断のユースケース
pub struct DisconnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（リセット時のアンカー時刻打刻に使用）
    clock: Arc<dyn Clock>,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// peer 切断を実行
    ///
    /// メンバー集合から削除し送信チャンネルを解除する。残メンバーが 0 に
    /// なったときはセッションを初期状態にリセットする（リセットの判断は
    /// このユースケースが持つ）。未知の peer の切断は冪等な no-op。
    ///
    /// # Arguments
    ///
    /// * `peer_id` - 切断する peer の ID
    ///
    /// # Returns
    ///
    /// 残りのメンバー数（`userLeft` ブロードキャストに載せる値）
    pub async fn execute(&self, peer_id: &PeerId) -> usize {
        self.message_pusher.unregister_peer(peer_id).await;
        let remaining = self.repository.remove_member(peer_id).await;

        if remaining == 0 {
            let now = Timestamp::new(self.clock.now_millis());
            self.repository.reset(now).await;
            tracing::info!("Last peer left; session reset to initial state");
        }

        remaining
    }

    /// 残っている全 peer にブロードキャストする
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Session, extract_video_id},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use kotatsu_shared::time::FixedClock;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    const NOW: i64 = 1_700_000_000_000;

    fn create_test_usecase() -> (DisconnectPeerUseCase, Arc<InMemorySessionRepository>) {
        let session = Arc::new(Mutex::new(Session::new(Timestamp::new(0))));
        let repository = Arc::new(InMemorySessionRepository::new(session));
        let peers = Arc::new(Mutex::new(HashMap::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(peers));
        let usecase = DisconnectPeerUseCase::new(
            repository.clone(),
            message_pusher,
            Arc::new(FixedClock::new(NOW)),
        );
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_disconnect_returns_remaining_count() {
        // テスト項目: 切断後に残りのメンバー数が返される
        // given (前提条件):
        let (usecase, repository) = create_test_usecase();
        let alice = PeerId::new("alice".to_string());
        let bob = PeerId::new("bob".to_string());
        repository.add_member(alice.clone()).await;
        repository.add_member(bob.clone()).await;

        // when (操作):
        let remaining = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(remaining, 1);
        assert_eq!(repository.count_members().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_peer_is_noop() {
        // テスト項目: 存在しない peer の切断が冪等な no-op になる
        // given (前提条件):
        let (usecase, repository) = create_test_usecase();
        let alice = PeerId::new("alice".to_string());
        repository.add_member(alice.clone()).await;

        // when (操作):
        let remaining = usecase.execute(&PeerId::new("nobody".to_string())).await;

        // then (期待する結果): alice は残ったまま、リセットも起きない
        assert_eq!(remaining, 1);
        assert_eq!(repository.count_members().await, 1);
    }

    #[tokio::test]
    async fn test_last_peer_leaving_resets_session() {
        // テスト項目: メンバー数が 1 → 0 になるとセッションが初期値に戻る
        // given (前提条件):
        let (usecase, repository) = create_test_usecase();
        let alice = PeerId::new("alice".to_string());
        repository.add_member(alice.clone()).await;

        let id = extract_video_id("dQw4w9WgXcQ").unwrap();
        repository
            .set_video("https://youtu.be/dQw4w9WgXcQ".to_string(), id, Timestamp::new(1_000))
            .await;
        repository.set_playing(true, Timestamp::new(2_000)).await;
        repository.seek(42.0, Timestamp::new(3_000)).await;

        // when (操作):
        let remaining = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(remaining, 0);
        let snapshot = repository.snapshot().await;
        assert_eq!(snapshot.video_id, None);
        assert_eq!(snapshot.video_url, None);
        assert!(!snapshot.playing);
        assert_eq!(snapshot.current_time, 0.0);
        assert_eq!(snapshot.last_updated, NOW);
    }

    #[tokio::test]
    async fn test_no_reset_while_peers_remain() {
        // テスト項目: peer が残っている間はリセットが発火しない
        // given (前提条件):
        let (usecase, repository) = create_test_usecase();
        let alice = PeerId::new("alice".to_string());
        let bob = PeerId::new("bob".to_string());
        repository.add_member(alice.clone()).await;
        repository.add_member(bob.clone()).await;

        let id = extract_video_id("dQw4w9WgXcQ").unwrap();
        repository
            .set_video("https://youtu.be/dQw4w9WgXcQ".to_string(), id, Timestamp::new(1_000))
            .await;

        // when (操作):
        usecase.execute(&alice).await;

        // then (期待する結果): 動画はロードされたまま
        let snapshot = repository.snapshot().await;
        assert_eq!(snapshot.video_id.as_deref(), Some("dQw4w9WgXcQ"));
    }
}
