//! Engine: transactional reads and single-row writes using the safe SQL builder.

mod engine;
mod page;
mod rows;
mod validation;
pub use engine::Engine;
pub use page::ResultPage;
pub use rows::row_to_json;
pub use validation::RequestValidator;
