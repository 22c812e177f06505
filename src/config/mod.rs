mod engine;
mod server;

pub use engine::*;
pub use server::*;
