//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続中 peer の `UnboundedSender` を管理
//! - peer へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PeerId, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中 peer の WebSocket sender
    ///
    /// Key: PeerId
    /// Value: PusherChannel
    peers: Arc<Mutex<HashMap<PeerId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(peers: Arc<Mutex<HashMap<PeerId, PusherChannel>>>) -> Self {
        Self { peers }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_peer(&self, peer_id: PeerId, sender: PusherChannel) {
        let mut peers = self.peers.lock().await;
        peers.insert(peer_id.clone(), sender);
        tracing::debug!("Peer '{}' registered to MessagePusher", peer_id.as_str());
    }

    async fn unregister_peer(&self, peer_id: &PeerId) {
        let mut peers = self.peers.lock().await;
        peers.remove(peer_id);
        tracing::debug!("Peer '{}' unregistered from MessagePusher", peer_id.as_str());
    }

    async fn push_to(&self, peer_id: &PeerId, content: &str) -> Result<(), MessagePushError> {
        let peers = self.peers.lock().await;

        if let Some(sender) = peers.get(peer_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to peer '{}'", peer_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::PeerNotFound(
                peer_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<PeerId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let peers = self.peers.lock().await;

        for target in targets {
            if let Some(sender) = peers.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to peer '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to peer '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Peer '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}
