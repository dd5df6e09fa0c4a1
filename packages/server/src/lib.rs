//! Watch-together session-synchronization server library.
//!
//! Keeps an arbitrary number of connected peers locked to one shared video
//! playback position over WebSockets: commands from any peer mutate a single
//! session, every effect is fanned out to all peers, and a periodic task
//! broadcasts drift corrections while playback is running.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
