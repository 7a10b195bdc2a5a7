//! Video catalog: browse, search, publish.

pub mod query;
pub mod service;

pub use query::{PublishVideo, SearchParams};
pub use service::CatalogService;
