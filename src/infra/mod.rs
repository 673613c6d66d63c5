//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis-backed transient state
//! - Local asset storage for uploads

pub mod cache;
pub mod db;
pub mod repositories;
pub mod storage;

pub use cache::{Cache, TransientStore};
pub use db::{Database, Migrator};
pub use storage::{AssetStore, LocalAssetStore};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockTransientStore;
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockAssetStore;
