//! Query preprocessing and document retrieval

pub mod query_processor;
pub mod retriever;

pub use query_processor::{ProcessedQuery, QueryProcessor};
pub use retriever::{RetrievedDocument, Retriever};
