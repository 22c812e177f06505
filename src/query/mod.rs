//! Query specifications and the builders that turn loose request input into them.

mod criteria;
mod spec;
mod values;

pub use criteria::*;
pub use spec::*;
pub use values::*;
