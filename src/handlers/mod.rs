//! HTTP handlers for entity reads and writes.

pub mod entity;
pub use entity::*;
