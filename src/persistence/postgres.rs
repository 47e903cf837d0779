//! PostgreSQL implementation of the blog store.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::GatewayConfig;
use crate::domain::{Blog, BlogPatch};
use crate::error::GatewayError;

/// Row shape shared by every query returning a post.
type BlogRow = (String, String, Option<String>);

fn into_blog((title, content, image_url): BlogRow) -> Blog {
    Blog {
        title,
        content,
        image_url,
    }
}

/// PostgreSQL-backed blog store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
}

impl PostgresBlogStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from `config` and applies the embedded
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        tracing::info!("connected to postgres, migrations applied");
        Ok(Self::new(pool))
    }

    /// Fetches the post with the given title.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn get(&self, title: &str) -> Result<Option<Blog>, GatewayError> {
        let row = sqlx::query_as::<_, BlogRow>(
            "SELECT title, content, image_url FROM blogs WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_blog))
    }

    /// Lists every post in creation order.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list(&self) -> Result<Vec<Blog>, GatewayError> {
        let rows = sqlx::query_as::<_, BlogRow>(
            "SELECT title, content, image_url FROM blogs ORDER BY created_at ASC, title ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_blog).collect())
    }

    /// Inserts a new post. Returns `None` if the title is already taken.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert(&self, blog: &Blog) -> Result<Option<Blog>, GatewayError> {
        let row = sqlx::query_as::<_, BlogRow>(
            "INSERT INTO blogs (title, content, image_url) VALUES ($1, $2, $3) \
             ON CONFLICT (title) DO NOTHING \
             RETURNING title, content, image_url",
        )
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(&blog.image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_blog))
    }

    /// Applies `patch` to the post with the given title, returning the
    /// updated post or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TitleTaken`] if the patch renames onto an
    /// existing title, or [`GatewayError::PersistenceError`] on database
    /// failure.
    pub async fn update(
        &self,
        title: &str,
        patch: &BlogPatch,
    ) -> Result<Option<Blog>, GatewayError> {
        let (set_image_url, image_url) = match &patch.image_url {
            Some(value) => (true, value.clone()),
            None => (false, None),
        };

        let result = sqlx::query_as::<_, BlogRow>(
            "UPDATE blogs SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                image_url = CASE WHEN $4 THEN $5 ELSE image_url END \
             WHERE title = $1 \
             RETURNING title, content, image_url",
        )
        .bind(title)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(set_image_url)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.map(into_blog)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let new_title = patch.title.clone().unwrap_or_else(|| title.to_string());
                Err(GatewayError::TitleTaken(new_title))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the post with the given title. Returns `false` if it did not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete(&self, title: &str) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM blogs WHERE title = $1")
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
