//! Radio show catalog: free-text search, single show lookup and home page
//! discovery over the remote query store.
//!
//! Search results are cached through [`ResultCache`](crate::cache::ResultCache);
//! discovery is always read fresh.

mod assets;
mod discovery;
pub mod mapping;
pub mod sql;
mod service;
mod types;

pub use discovery::{DiscoveryService, DEFAULT_CHANNEL_SIZE};
pub use service::{CatalogService, MAX_ASSETS_PER_SHOW};
pub use types::*;
