//! Server state shared across request handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectPeerUseCase, DisconnectPeerUseCase, DispatchActionUseCase, SyncSessionUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectPeerUseCase（peer 接続のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// DisconnectPeerUseCase（peer 切断のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// DispatchActionUseCase（再生アクション適用のユースケース）
    pub dispatch_action_usecase: Arc<DispatchActionUseCase>,
    /// SyncSessionUseCase（セッション状態取得のユースケース）
    pub sync_session_usecase: Arc<SyncSessionUseCase>,
}
