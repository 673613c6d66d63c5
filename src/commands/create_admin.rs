//! Create-admin command - Bootstraps an administrator account.
//!
//! Registers the account directly, skipping the OTP verification flow,
//! and promotes it to the nationwide admin role in the same run.

use std::sync::Arc;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::{Password, PendingRegistration, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{UserRepository, UserStore};
use crate::infra::Database;

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(db.connection().clone()));

    if users.find_by_email_any(&args.email).await?.is_some() {
        return Err(AppError::conflict("Email"));
    }
    if users.find_by_phone(&args.phone).await?.is_some() {
        return Err(AppError::conflict("Phone number"));
    }

    let password_hash = Password::new(&args.password)?.into_string();
    let user = users
        .create(PendingRegistration {
            name: args.name,
            email: args.email,
            password_hash,
            phone: args.phone,
        })
        .await?;

    // Admins carry no geography binding; they see every area.
    let admin = users
        .assign_role(user.id, Role::Admin, None, None, None)
        .await?;

    tracing::info!(user_id = %admin.id, email = %admin.email, "Administrator account created");

    Ok(())
}
