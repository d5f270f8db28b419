//! SQLite database client implementation.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{
    AppError, Customer, CustomerId, CustomerPatch, CustomerRepository, DatabaseError, NewCustomer,
};

/// SQLite connection pool configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl SqliteConfig {
    /// Every in-memory connection is a separate database, so the pool must
    /// hold exactly one connection that never expires.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: None,
            max_lifetime: None,
        }
    }
}

/// SQLite database client with connection pooling
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Create a new SQLite client, creating the database file if missing
    pub async fn new(database_url: &str, config: SqliteConfig) -> Result<Self, AppError> {
        info!("Connecting to SQLite...");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to SQLite");
        Ok(Self { pool })
    }

    /// Create a new SQLite client with default configuration
    pub async fn with_defaults(database_url: &str) -> Result<Self, AppError> {
        Self::new(database_url, SqliteConfig::default()).await
    }

    /// Create a client backed by a private in-memory database
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::new("sqlite::memory:", SqliteConfig::in_memory()).await
    }

    /// Create the `customers` table if it does not exist yet
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Parse a database row into a Customer
    fn row_to_customer(row: &SqliteRow) -> Result<Customer, AppError> {
        let id: i64 = row.try_get("id")?;
        Ok(Customer {
            id: from_row_id(id)?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
        })
    }
}

fn to_row_id(id: CustomerId) -> Result<i64, AppError> {
    // Ids beyond the SQLite integer range can never have been assigned.
    i64::try_from(id)
        .map_err(|_| AppError::Database(DatabaseError::NotFound(format!("customer {id}"))))
}

fn from_row_id(id: i64) -> Result<CustomerId, AppError> {
    CustomerId::try_from(id).map_err(|_| AppError::Internal(format!("negative row id {id}")))
}

#[async_trait]
impl CustomerRepository for SqliteClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self, customer), fields(customer_name = %customer.name))]
    async fn create(&self, customer: &NewCustomer) -> Result<CustomerId, AppError> {
        let result = sqlx::query("INSERT INTO customers (name, age) VALUES (?, ?)")
            .bind(&customer.name)
            .bind(customer.age)
            .execute(&self.pool)
            .await?;

        from_row_id(result.last_insert_rowid())
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Customer, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, age = ?
            WHERE id = ?
            RETURNING id, name, age
            "#,
        )
        .bind(patch.name.as_deref())
        .bind(patch.age)
        .bind(to_row_id(id)?)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_customer(&row),
            None => Err(AppError::Database(DatabaseError::NotFound(format!(
                "customer {id}"
            )))),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: CustomerId) -> Result<Customer, AppError> {
        let row = sqlx::query("SELECT id, name, age FROM customers WHERE id = ?")
            .bind(to_row_id(id)?)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_customer(&row),
            None => Err(AppError::Database(DatabaseError::NotFound(format!(
                "customer {id}"
            )))),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CustomerId) -> Result<(), AppError> {
        let Ok(row_id) = i64::try_from(id) else {
            return Ok(());
        };

        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(row_id)
            .execute(&self.pool)
            .await?;

        debug!(rows_affected = result.rows_affected(), "Delete executed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query("SELECT id, name, age FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_customer).collect()
    }
}
