//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! プロセス内の唯一の Session を `tokio::sync::Mutex` で保持します。
//!
//! この Mutex が仕様上の「直列化ドメイン」です：接続・切断・コマンド適用・
//! ドリフト読み取りのすべてがこのロックを通るため、2 つの変更が
//! 入れ子になることはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PeerId, Session, SessionRepository, SessionSnapshot, Timestamp, VideoId};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// Session ドメインモデル
    session: Arc<Mutex<Session>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        session.snapshot()
    }

    async fn add_member(&self, peer_id: PeerId) -> usize {
        let mut session = self.session.lock().await;
        session.add_member(peer_id);
        session.member_count()
    }

    async fn remove_member(&self, peer_id: &PeerId) -> usize {
        let mut session = self.session.lock().await;
        session.remove_member(peer_id);
        session.member_count()
    }

    async fn count_members(&self) -> usize {
        let session = self.session.lock().await;
        session.member_count()
    }

    async fn member_ids(&self) -> Vec<PeerId> {
        let session = self.session.lock().await;
        session.member_ids()
    }

    async fn set_video(&self, url: String, id: VideoId, at: Timestamp) {
        let mut session = self.session.lock().await;
        session.set_video(url, id, at);
    }

    async fn set_playing(&self, playing: bool, at: Timestamp) {
        let mut session = self.session.lock().await;
        session.set_playing(playing, at);
    }

    async fn seek(&self, time: f64, at: Timestamp) {
        let mut session = self.session.lock().await;
        session.seek(time, at);
    }

    async fn reset(&self, at: Timestamp) {
        let mut session = self.session.lock().await;
        session.reset(at);
    }

    async fn extrapolated_position(&self, now: Timestamp) -> Option<f64> {
        let session = self.session.lock().await;
        if !session.is_playing() {
            return None;
        }
        Some(session.extrapolated_time(now))
    }
}
