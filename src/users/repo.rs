use async_trait::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, StoreError, User};

/// Persistence seam for the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn create(&self, user: NewUser<'_>) -> Result<User, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
}

/// `UserStore` over a Postgres pool. Every query checks a connection out of
/// the pool and hands it back when the query future finishes or is dropped.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT id
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.is_some())
    }

    async fn create(&self, user: NewUser<'_>) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, age, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, age, created_at
            "#,
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.name)
        .bind(user.age)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_insert)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, age, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
