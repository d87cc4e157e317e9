//! Readers for the external tables consumed by the engine.
mod wpp;
pub use wpp::*;
