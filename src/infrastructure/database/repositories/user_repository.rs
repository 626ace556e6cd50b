use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password: model.password,
        created_at: model.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn find(&self, email: &str) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        debug!(email, matches = models.len(), "User lookup");
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: NotSet,
            email: Set(dto.email.clone()),
            password: Set(dto.password),
            created_at: Set(Utc::now()),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::EmailInUse(dto.email),
            _ => db_err(e),
        })?;

        Ok(user_model_to_domain(model))
    }
}
