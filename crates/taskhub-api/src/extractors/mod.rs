//! Custom Axum extractors.

pub mod pagination;
pub mod path;
pub mod query;
pub mod validated;

pub use pagination::PaginationParams;
pub use path::parse_id;
pub use query::QueryParams;
pub use validated::{ValidatedJson, validated};
