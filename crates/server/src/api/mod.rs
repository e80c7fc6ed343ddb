pub mod error;
pub mod handlers;
pub mod home;
pub mod middleware;
pub mod routes;
pub mod search;
pub mod shows;

pub use error::{ApiError, ApiResponse};
pub use routes::create_router;
