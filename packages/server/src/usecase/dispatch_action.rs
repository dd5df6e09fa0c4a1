//! UseCase: 再生アクションのディスパッチ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchActionUseCase::execute() メソッド
//! - 鮮度ゲート（古いアクションの破棄）と各アクションの適用
//!
//! ### なぜこのテストが必要か
//! - ネットワーク遅延で遅れて届いた操作が新しい状態を上書きしないことを保証
//! - ChangeVideo の ID 抽出失敗がコマンド全体の no-op になることを確認
//! - 適用結果（ActionEffect）が全 peer へのファンアウトの元になるため
//!
//! ### どのような状況を想定しているか
//! - 正常系：Play / Pause / Seek / ChangeVideo の適用
//! - 異常系：閾値超過の古いアクション、抽出不能な URL
//! - エッジケース：閾値ちょうどの経過時間

use std::sync::Arc;

use kotatsu_shared::time::Clock;

use crate::domain::{
    ActionEffect, MessagePusher, PlaybackAction, SessionRepository, Timestamp, extract_video_id,
};

/// この経過時間（ミリ秒）を超えたアクションは適用せず破棄する。
/// アクションは fire-and-forget の信号であり、遅れて届いた操作意図が
/// より新しい状態に勝ってはならない。
pub const STALE_ACTION_THRESHOLD_MS: i64 = 5_000;

/// 再生アクションディスパッチのユースケース
pub struct DispatchActionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（鮮度判定とアンカー時刻の打刻に使用）
    clock: Arc<dyn Clock>,
}

impl DispatchActionUseCase {
    /// 新しい DispatchActionUseCase を作成
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

    /// アクションを検証してセッションに適用する
    ///
    /// # Arguments
    ///
    /// * `action` - 適用する再生アクション
    /// * `issued_at` - peer がアクションを発行した時刻（peer 申告値）
    ///
    /// # Returns
    ///
    /// * `Some(ActionEffect)` - 適用成功（全 peer へファンアウトする内容）
    /// * `None` - 破棄（鮮度切れ、または ChangeVideo の ID 抽出失敗）。
    ///   破棄は仕様上サイレント：エラーは送信者にも誰にも届かない。
    pub async fn execute(
        &self,
        action: PlaybackAction,
        issued_at: Timestamp,
    ) -> Option<ActionEffect> {
        // 鮮度判定はサーバー自身の時計が基準（送信側の時計は信用しない）
        let now = Timestamp::new(self.clock.now_millis());
        let age_millis = now.value() - issued_at.value();
        if age_millis > STALE_ACTION_THRESHOLD_MS {
            tracing::debug!("Dropping stale action (age {} ms): {:?}", age_millis, action);
            return None;
        }

        match action {
            PlaybackAction::Play => {
                self.repository.set_playing(true, now).await;
                Some(ActionEffect::Played { timestamp: now })
            }
            PlaybackAction::Pause => {
                self.repository.set_playing(false, now).await;
                Some(ActionEffect::Paused { timestamp: now })
            }
            PlaybackAction::Seek { time } => {
                self.repository.seek(time, now).await;
                Some(ActionEffect::Sought {
                    time,
                    timestamp: now,
                })
            }
            PlaybackAction::ChangeVideo { url } => match extract_video_id(&url) {
                Some(video_id) => {
                    self.repository
                        .set_video(url.clone(), video_id.clone(), now)
                        .await;
                    Some(ActionEffect::VideoChanged { url, video_id })
                }
                None => {
                    tracing::debug!("Dropping changeVideo with unextractable url: '{}'", url);
                    None
                }
            },
        }
    }

    /// 適用結果を接続中の全 peer（送信者を含む）にブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_all(&self, message: &str) {
        let targets = self.repository.member_ids().await;
        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast action effect: {}", e);
        }
    }
}
