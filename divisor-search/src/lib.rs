#![deny(clippy::shadow_unrelated)]
pub mod config;
pub mod error;
pub mod math;
pub mod optimize;
pub mod prelude;
pub mod search;
