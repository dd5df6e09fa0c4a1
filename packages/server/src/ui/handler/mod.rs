mod http;
mod websocket;

pub use http::{debug_session_state, health_check};
pub use websocket::websocket_handler;
