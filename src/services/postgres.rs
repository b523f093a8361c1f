use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use crate::core::email::UserLookup;
use crate::models::{MatchFilter, User, UserFields, UserId};
use crate::services::store::{StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, age, gender, email, city, interests";

/// PostgreSQL-backed user store
///
/// The `users` table carries a unique constraint on `email`, so two
/// concurrent creates with the same address cannot both commit.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        age: row.try_get("age")?,
        gender: row.try_get("gender")?,
        email: row.try_get("email")?,
        city: row.try_get("city")?,
        interests: row.try_get("interests")?,
    })
}

/// Translate a unique violation on `email` into [`StoreError::EmailTaken`]
fn map_write_error(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::EmailTaken(email.to_string());
        }
    }
    StoreError::SqlxError(err)
}

fn insert_query() -> String {
    format!(
        r#"
            INSERT INTO users (name, age, gender, email, city, interests)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
        "#
    )
}

#[async_trait]
impl UserLookup for PostgresClient {
    type Error = StoreError;

    async fn find_owner_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query("SELECT id FROM users WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.try_get("id")).transpose()?)
    }
}

#[async_trait]
impl UserStore for PostgresClient {
    async fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
        let row = sqlx::query(&insert_query())
            .bind(&fields.name)
            .bind(fields.age)
            .bind(&fields.gender)
            .bind(&fields.email)
            .bind(&fields.city)
            .bind(&fields.interests)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &fields.email))?;

        let user = user_from_row(&row)?;
        tracing::debug!("Inserted user {}", user.id);
        Ok(user)
    }

    /// Inserts inside one transaction; any failure rolls the batch back
    async fn insert_many(&self, batch: Vec<UserFields>) -> Result<Vec<User>, StoreError> {
        let query = insert_query();
        let mut tx = self.pool.begin().await?;
        let mut users = Vec::with_capacity(batch.len());

        for fields in &batch {
            let row = sqlx::query(&query)
                .bind(&fields.name)
                .bind(fields.age)
                .bind(&fields.gender)
                .bind(&fields.email)
                .bind(&fields.city)
                .bind(&fields.interests)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, &fields.email))?;
            users.push(user_from_row(&row)?);
        }

        tx.commit().await?;

        tracing::debug!("Inserted {} users in one batch", users.len());
        Ok(users)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");

        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        let users: Result<Vec<User>, _> = rows.iter().map(user_from_row).collect();
        Ok(users?)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError> {
        let query = format!(
            r#"
                UPDATE users
                SET name = $2, age = $3, gender = $4, email = $5, city = $6, interests = $7
                WHERE id = $1
                RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(fields.age)
            .bind(&fields.gender)
            .bind(&fields.email)
            .bind(&fields.city)
            .bind(&fields.interests)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &fields.email))?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    /// Pre-filters by city, gender and age in SQL
    async fn list_candidates(
        &self,
        requester: UserId,
        filter: &MatchFilter,
    ) -> Result<Vec<User>, StoreError> {
        let query = format!(
            r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE id <> $1
                  AND city = ANY($2)
                  AND gender = ANY($3)
                  AND age BETWEEN $4 AND $5
                ORDER BY id
            "#
        );

        let cities: Vec<String> = filter.cities.iter().cloned().collect();
        let genders: Vec<String> = filter.genders.iter().cloned().collect();

        let rows = sqlx::query(&query)
            .bind(requester)
            .bind(cities)
            .bind(genders)
            .bind(filter.age_start)
            .bind(filter.age_end)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Candidate scan for user {} returned {} rows", requester, rows.len());

        let users: Result<Vec<User>, _> = rows.iter().map(user_from_row).collect();
        Ok(users?)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
