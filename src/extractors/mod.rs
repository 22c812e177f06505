pub mod caller;
pub mod mutation_body;

pub use caller::*;
pub use mutation_body::*;
