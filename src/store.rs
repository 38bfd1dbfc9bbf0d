//! SQLite persistence for entries: database/table bootstrap and per-call CRUD.
//! Each write runs in its own transaction; dropping an uncommitted transaction rolls it back.

use crate::error::{AppError, ConfigError};
use crate::model::{Entry, EntryPatch, NewEntry};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub const ENTRY_TABLE: &str = "entry";

const ENTRY_COLUMNS: &str = "id, date, category, status, ship_name, country, notes";

/// Ensure the directory holding a file-backed database exists.
/// Returns true when the database file does not exist yet (first run). In-memory URLs return false.
pub fn ensure_database_exists(database_url: &str) -> Result<bool, AppError> {
    if is_in_memory(database_url) {
        return Ok(false);
    }
    let opts = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let file = opts.get_filename();
    if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(ConfigError::from)?;
            tracing::info!(dir = %dir.display(), "created instance folder");
        }
    }
    Ok(!file.exists())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the entry table if absent. Idempotent.
pub async fn ensure_entry_table(pool: &SqlitePool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id VARCHAR(36) NOT NULL PRIMARY KEY,
            date VARCHAR(10) NOT NULL,
            category VARCHAR(50) NOT NULL,
            status VARCHAR(20) NOT NULL,
            ship_name VARCHAR(100),
            country VARCHAR(100),
            notes TEXT
        )
        "#,
        ENTRY_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Handle to the entry table. Cheap to clone; shares the pool.
#[derive(Clone, Debug)]
pub struct EntryStore {
    pool: SqlitePool,
}

impl EntryStore {
    pub fn new(pool: SqlitePool) -> Self {
        EntryStore { pool }
    }

    /// Open (creating the file if missing) and ensure the table.
    /// In-memory URLs, private (`sqlite::memory:`) or named (`?mode=memory&cache=shared`),
    /// are opened as given and keep one connection alive so the database is not dropped.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let first_run = ensure_database_exists(database_url)?;
        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?
            .create_if_missing(true);
        let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
        let in_memory = is_in_memory(database_url);
        if in_memory {
            pool_opts = pool_opts
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = pool_opts.connect_with(opts).await?;
        ensure_entry_table(&pool).await?;
        if in_memory {
            tracing::info!(url = %database_url, "in-memory database ready");
        } else if first_run {
            tracing::info!(url = %database_url, "database created and tables initialized");
        } else {
            tracing::info!(url = %database_url, "database already exists, tables ensured");
        }
        Ok(EntryStore { pool })
    }

    /// Private in-memory database on a single connection, with the table created.
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    /// Insert a new entry under a freshly generated id.
    pub async fn create(&self, new: NewEntry) -> Result<Entry, AppError> {
        let entry = Entry {
            id: uuid::Uuid::new_v4().to_string(),
            date: new.date,
            category: new.category,
            status: new.status,
            ship_name: new.ship_name,
            country: new.country,
            notes: new.notes,
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            ENTRY_TABLE, ENTRY_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %entry.id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.date)
            .bind(&entry.category)
            .bind(&entry.status)
            .bind(&entry.ship_name)
            .bind(&entry.country)
            .bind(&entry.notes)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(entry.id.clone()),
                other => AppError::Db(other),
            })?;
        tx.commit().await?;
        Ok(entry)
    }

    pub async fn get(&self, id: &str) -> Result<Entry, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", ENTRY_COLUMNS, ENTRY_TABLE);
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, Entry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// All entries in creation order.
    pub async fn list(&self) -> Result<Vec<Entry>, AppError> {
        let sql = format!("SELECT {} FROM {} ORDER BY rowid", ENTRY_COLUMNS, ENTRY_TABLE);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Entry>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Write the fields present in `patch` and return the stored entry.
    /// The write must be the first statement of the transaction (no read first), otherwise
    /// concurrent updates fail with SQLITE_BUSY instead of waiting on the busy timeout.
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Result<Entry, AppError> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return self.get(id).await;
        }
        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            ENTRY_TABLE, set_clause, ENTRY_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %id, "query (tx)");
        let mut query = sqlx::query_as::<sqlx::Sqlite, Entry>(&sql);
        for (_, value) in &assignments {
            query = query.bind(*value);
        }
        let mut tx = self.pool.begin().await?;
        let entry = query
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tx.commit().await?;
        Ok(entry)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", ENTRY_TABLE);
        tracing::debug!(sql = %sql, id = %id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let done = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(id.to_string()));
        }
        tx.commit().await?;
        Ok(())
    }
}
