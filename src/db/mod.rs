mod repository;
mod schema;

pub use repository::{Acceptance, Repository};
pub use schema::SCHEMA;
