//! HTTP handlers

pub mod echo;
pub mod health;
pub mod posts;

pub use echo::echo;
pub use health::{health, internal_error, not_found};
