//! Entities and their column descriptors: the only vocabulary the query engine accepts.

pub mod catalog;
mod descriptor;
mod registry;

pub use descriptor::*;
pub use registry::*;
