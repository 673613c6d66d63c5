//! SeaORM entity definitions.
//!
//! These are database-specific models, separate from domain types.
//! Status and role columns are plain strings here; the `From<Model>`
//! conversions lift them into the domain enums.

pub mod agent_request;
pub mod customer_order;
pub mod feedback;
pub mod job;
pub mod job_application;
pub mod message;
pub mod news;
pub mod partnership;
pub mod refresh_token;
pub mod region;
pub mod report;
pub mod service_order;
pub mod user;
pub mod woreda;
pub mod zone;
