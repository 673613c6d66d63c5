//! HTTP layer - handlers, middleware and routing
//!
//! Everything that touches the wire lives here:
//! - Request handlers, grouped per resource
//! - Middleware (JWT authentication, rate limiting, request logging)
//! - Custom extractors for the authenticated user and uploads
//! - Route table and OpenAPI document

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
