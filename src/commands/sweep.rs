//! Sweep command - One-shot maintenance pass.
//!
//! Meant to run from cron. Closes job postings past their deadline,
//! removes expired news items together with their stored images and
//! drops refresh tokens that can no longer be redeemed.

use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{JobStore, NewsStore, RefreshTokenRepository, RefreshTokenStore};
use crate::infra::{Database, LocalAssetStore};
use crate::services::{JobManager, JobService, NewsRoom, NewsService};

/// Execute the sweep command
pub async fn execute(config: Config) -> AppResult<()> {
    // A scheduled pass must never mutate the schema on its own.
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let conn = db.connection().clone();

    let now = Utc::now();

    let jobs = JobManager::new(Arc::new(JobStore::new(conn.clone())));
    let closed = jobs.close_expired(now).await?;

    let news = NewsRoom::new(
        Arc::new(NewsStore::new(conn.clone())),
        Arc::new(LocalAssetStore::new(config.upload_dir.clone())),
    );
    let swept = news.sweep_expired(now).await?;

    let tokens = RefreshTokenStore::new(conn);
    let dropped = tokens.delete_expired(now).await?;

    tracing::info!(
        closed_jobs = closed,
        swept_news = swept,
        dropped_tokens = dropped,
        "Maintenance sweep finished"
    );

    Ok(())
}
