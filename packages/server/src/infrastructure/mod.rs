//! Infrastructure layer: concrete adapters for the domain's seams.

pub mod dto;
pub mod message_pusher;
pub mod repository;
