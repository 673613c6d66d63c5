//! Hulegeb - Administrative backend for regional services and reporting
//!
//! This crate provides the REST API behind the Hulegeb platform:
//! citizen reports, service and customer orders, job postings, agent
//! onboarding, partnerships, feedback, messaging and news, all scoped
//! by the caller's place in the regional hierarchy.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line entry points (serve, migrate, sweep, create-admin)
//! - **config**: environment-driven settings and shared constants
//! - **domain**: entities, roles, geographic scoping and status machines
//! - **services**: use cases behind trait seams, one per resource
//! - **infra**: SeaORM entities and repositories, Redis cache, file storage
//! - **jobs**: background email delivery
//! - **api**: Axum handlers, middleware, extractors and routes
//! - **types**: pagination and response envelopes
//! - **utils**: OTP generation and mail templates
//! - **errors**: application error type and its HTTP mapping
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Close expired postings, purge stale news and tokens
//! cargo run -- sweep
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CurrentUser, Password, Role, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
