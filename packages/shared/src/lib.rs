//! Shared utilities for the kotatsu watch-together application.
//!
//! Cross-cutting concerns used by the server binary and its tests:
//! timestamp/clock abstraction and tracing setup.

pub mod logger;
pub mod time;
