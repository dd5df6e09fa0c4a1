//! UseCase: ドリフト補正の 1 tick 分の処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastDriftUseCase::execute() メソッド
//! - 再生中のみ外挿位置を計算して補正値を返すこと
//!
//! ### なぜこのテストが必要か
//! - 補正は読み取り専用であり、アンカーを動かさないことを保証
//! - 一時停止中の tick が完全な no-op であることを確認
//! - 外挿値が FixedClock で決定的に検証できるため
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生中の tick（補正値の算出）
//! - エッジケース：一時停止中の tick（no-op）

use std::sync::Arc;

use kotatsu_shared::time::Clock;

use crate::domain::{MessagePusher, SessionRepository, Timestamp};

/// 1 回の tick が全 peer に配る補正値：外挿した再生位置と計算時刻
#[derive(Debug, Clone, PartialEq)]
pub struct DriftCorrection {
    pub time: f64,
    pub timestamp: Timestamp,
}

/// ドリフト補正のユースケース
pub struct BroadcastDriftUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（外挿の基準時刻に使用）
    clock: Arc<dyn Clock>,
}

impl BroadcastDriftUseCase {
    /// 新しい BroadcastDriftUseCase を作成
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

    /// 1 tick 分のドリフト補正を計算する
    ///
    /// # Returns
    ///
    /// * `Some(DriftCorrection)` - 再生中：外挿位置と計算時刻
    /// * `None` - 一時停止中：この tick は no-op
    ///
    /// 読み取り専用：アンカーは明示的な Play / Pause / Seek / ChangeVideo
    /// でしか動かない。
    pub async fn execute(&self) -> Option<DriftCorrection> {
        let now = Timestamp::new(self.clock.now_millis());
        let time = self.repository.extrapolated_position(now).await?;
        Some(DriftCorrection {
            time,
            timestamp: now,
        })
    }

    /// 補正値を接続中の全 peer にブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_all(&self, message: &str) {
        let targets = self.repository.member_ids().await;
        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast drift correction: {}", e);
        }
    }
}
