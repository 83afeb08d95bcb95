pub mod client;
pub mod error;
pub mod executor;
pub mod response;
pub mod schema;
pub mod sql;
pub mod vector;

pub use client::{SearchOptions, SolrClient};
pub use error::{SolrError, SolrErrorCode};
pub use schema::{FieldDefinition, FieldManager};
pub use vector::{VectorSearchResult, VectorSearchResults};
