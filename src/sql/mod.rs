//! Safe SQL builder: identifiers from column descriptors only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
