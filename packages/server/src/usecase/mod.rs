//! Application services binding the domain to transport and time.

mod broadcast_drift;
mod connect_peer;
mod disconnect_peer;
mod dispatch_action;
mod sync_session;

pub use broadcast_drift::{BroadcastDriftUseCase, DriftCorrection};
pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use dispatch_action::{DispatchActionUseCase, STALE_ACTION_THRESHOLD_MS};
pub use sync_session::SyncSessionUseCase;
