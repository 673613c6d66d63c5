//! User repository.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::user::{AccountStatus, PendingRegistration, User};
use crate::domain::Role;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Admin listing filter.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    /// Case-insensitive match against name or email.
    pub search: Option<String>,
}

/// User persistence operations. Queries exclude soft-deleted rows.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Like [`find_by_email`](Self::find_by_email) but including
    /// soft-deleted rows. Registration uses this to tell a taken email
    /// apart from a banned one.
    async fn find_by_email_any(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    /// Insert a verified registration as a fresh account with the
    /// default role.
    async fn create(&self, registration: PendingRegistration) -> AppResult<User>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<User>;

    /// Replace role and geography binding in one write.
    async fn assign_role(
        &self,
        id: Uuid,
        role: Role,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
    ) -> AppResult<User>;

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> AppResult<User>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    async fn list(
        &self,
        filter: UserFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn active_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .filter(user::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }

    fn sort_column(params: &PaginationParams) -> user::Column {
        match params.sort_by.as_deref() {
            Some("name") => user::Column::Name,
            Some("email") => user::Column::Email,
            Some("role") => user::Column::Role,
            _ => user::Column::CreatedAt,
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .filter(user::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_email_any(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Phone.eq(phone))
            .filter(user::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, registration: PendingRegistration) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(registration.name),
            email: Set(registration.email),
            password_hash: Set(registration.password_hash),
            phone: Set(registration.phone),
            role: Set(Role::DEFAULT.as_str().to_string()),
            status: Set(AccountStatus::Active.as_str().to_string()),
            region_id: Set(None),
            zone_id: Set(None),
            woreda_id: Set(None),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<User> {
        let mut active: ActiveModel = self.active_model(id).await?.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn assign_role(
        &self,
        id: Uuid,
        role: Role,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
    ) -> AppResult<User> {
        let mut active: ActiveModel = self.active_model(id).await?.into();

        active.role = Set(role.as_str().to_string());
        active.region_id = Set(region_id);
        active.zone_id = Set(zone_id);
        active.woreda_id = Set(woreda_id);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> AppResult<User> {
        let mut active: ActiveModel = self.active_model(id).await?.into();

        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.active_model(id).await?.into();
        let now = chrono::Utc::now();

        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: UserFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().filter(user::Column::IsDeleted.eq(false));

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(user::Column::Status.eq(status.as_str()));
        }
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                Condition::any()
                    .add(Expr::col(user::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(user::Column::Email).ilike(pattern)),
            );
        }

        let query = query.order_by(Self::sort_column(params), params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }
}
