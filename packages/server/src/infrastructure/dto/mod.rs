//! Data Transfer Objects (DTOs) for the sync server.
//!
//! - `websocket`: WebSocket wire messages (both directions)
//! - `conversion`: Domain model → DTO conversions

pub mod conversion;
pub mod websocket;
