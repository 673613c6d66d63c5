//! HTTP request handlers, one module per resource.

pub mod agent_handler;
pub mod application_handler;
pub mod auth_handler;
pub mod feedback_handler;
pub mod geography_handler;
pub mod job_handler;
pub mod message_handler;
pub mod news_handler;
pub mod order_handler;
pub mod partnership_handler;
pub mod report_handler;
pub mod stats_handler;
pub mod user_handler;

pub use agent_handler::agent_routes;
pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
pub use feedback_handler::feedback_routes;
pub use geography_handler::{geography_admin_routes, public_geography_routes};
pub use job_handler::{job_routes, public_job_routes};
pub use message_handler::message_routes;
pub use news_handler::{news_admin_routes, public_news_routes};
pub use order_handler::order_routes;
pub use partnership_handler::partnership_routes;
pub use report_handler::report_routes;
pub use stats_handler::stats_routes;
pub use user_handler::user_routes;
