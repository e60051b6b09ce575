//! HTTP surface: routes, handlers and the `{ success, message, data }` envelope.
pub mod extract;
pub mod handlers;
pub mod multipart;
pub mod response;
pub mod routes;

pub use response::{ApiError, ApiResponse};
pub use routes::router;
