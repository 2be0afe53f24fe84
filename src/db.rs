use crate::config::Config;
use crate::model::{Book, BookPayload};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::time::Duration;

// No version bookkeeping here, so every file must stay safe to re-run on
// each startup.
const MIGRATIONS: &[(&str, &str)] = &[("001_books.sql", include_str!("migrations/001_books.sql"))];

/// The administrative database used to check for and create the target one.
const BOOTSTRAP_DB: &str = "postgres";

pub struct Database {
    pool: PgPool,
}

impl Database {
    fn connect_options(cfg: &Config, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&cfg.db_host)
            .port(cfg.db_port)
            .username(&cfg.db_user)
            .password(&cfg.db_password)
            .database(database)
    }

    /// Checks the system catalog for the target database and creates it when
    /// absent. Connects to the bootstrap database since the target may not
    /// exist yet. Failures propagate; the caller decides whether to abort.
    pub async fn ensure_database_exists(cfg: &Config) -> Result<(), sqlx::Error> {
        let mut conn =
            PgConnection::connect_with(&Self::connect_options(cfg, BOOTSTRAP_DB)).await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(&cfg.db_name)
                .fetch_optional(&mut conn)
                .await?;

        if exists.is_none() {
            // Identifiers cannot be bound; the name comes from trusted
            // configuration, never from a request.
            sqlx::query(&format!("CREATE DATABASE \"{}\"", cfg.db_name))
                .execute(&mut conn)
                .await?;
            tracing::info!(db = %cfg.db_name, "database created");
        } else {
            tracing::info!(db = %cfg.db_name, "database already exists");
        }

        conn.close().await?;
        Ok(())
    }

    /// Builds the process-wide pool bound to the target database. Individual
    /// requests check a connection out per statement and return it on drop.
    pub async fn connect(cfg: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(Self::connect_options(cfg, &cfg.db_name))
            .await?;

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for (filename, sql) in MIGRATIONS {
            self.pool.execute(*sql).await?;
            tracing::info!("applied schema file: {}", filename);
        }
        Ok(())
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, description, created_at FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_book(&self, id: i32) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, description, created_at FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
INSERT INTO books (title, author, description)
VALUES ($1, $2, $3)
RETURNING id, title, author, description, created_at
"#,
        )
        .bind(payload.title.as_deref())
        .bind(payload.author.as_deref())
        .bind(payload.description.as_deref())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_book(
        &self,
        id: i32,
        payload: &BookPayload,
    ) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
UPDATE books
SET title = $1, author = $2, description = $3
WHERE id = $4
RETURNING id, title, author, description, created_at
"#,
        )
        .bind(payload.title.as_deref())
        .bind(payload.author.as_deref())
        .bind(payload.description.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_book(&self, id: i32) -> Result<bool, sqlx::Error> {
        let deleted: Option<i32> =
            sqlx::query_scalar("DELETE FROM books WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(deleted.is_some())
    }
}
