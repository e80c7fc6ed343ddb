//! HTTP boundary of the catalog service: router, shared state and request
//! metrics. The `dramas` binary wires these to the Cloudflare clients.

pub mod api;
pub mod metrics;
pub mod state;
