use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, SslMode,
};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{error, info, warn};

use super::TodoStore;
use crate::config::DatabaseConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::todo::Todo;

const TODO_COLUMNS: &str = "id, title, created_at";

/// PostgreSQL-backed todo store holding a deadpool connection pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the pool and verify a connection can be checked out.
    pub async fn new(config: DatabaseConfig) -> ApiResult<Self> {
        info!(
            "Creating PostgreSQL connection pool for host: {}:{}",
            config.host, config.port
        );

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.health_check().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> ApiResult<Pool> {
        let mut pg_config = Config::new();

        match config.connection_string {
            Some(url) => pg_config.url = Some(url),
            None => {
                pg_config.host = Some(config.host);
                pg_config.port = Some(config.port);
                pg_config.dbname = Some(config.database);
                pg_config.user = Some(config.username);
                pg_config.password = Some(config.password);
                pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
                    "disable" => SslMode::Disable,
                    "require" => SslMode::Require,
                    "prefer" => SslMode::Prefer,
                    other => {
                        warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                        SslMode::Prefer
                    }
                });
            }
        }

        pg_config.connect_timeout = Some(config.connection_timeout);
        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> ApiResult<Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the `todos` table if it does not exist yet.
    pub async fn migrate(&self) -> ApiResult<()> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let todos_table = r#"
            CREATE TABLE IF NOT EXISTS todos (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(todos_table, &[]).await.map_err(|e| {
            error!("Failed to create todos table: {}", e);
            ApiError::Database(format!("Todos table creation failed: {}", e))
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    fn row_to_todo(row: &Row) -> Todo {
        Todo {
            id: row.get(0),
            title: row.get(1),
            created_at: row.get(2),
        }
    }
}

#[async_trait]
impl TodoStore for Database {
    async fn list_todos(&self) -> ApiResult<Vec<Todo>> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM todos ORDER BY id ASC", TODO_COLUMNS);

        let rows = client.query(query.as_str(), &[]).await?;

        Ok(rows.iter().map(Self::row_to_todo).collect())
    }

    async fn create_todo(&self, title: &str) -> ApiResult<Todo> {
        let client = self.get_connection().await?;
        let query = format!(
            "INSERT INTO todos (title, created_at) VALUES ($1, NOW()) RETURNING {}",
            TODO_COLUMNS
        );

        let row = client.query_one(query.as_str(), &[&title]).await?;
        let todo = Self::row_to_todo(&row);

        info!("Created todo with id: {}", todo.id);
        Ok(todo)
    }

    async fn get_todo(&self, id: i64) -> ApiResult<Todo> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);

        client
            .query_opt(query.as_str(), &[&id])
            .await?
            .map(|row| Self::row_to_todo(&row))
            .ok_or_else(|| ApiError::todo_not_found(id))
    }

    async fn update_todo(&self, id: i64, title: &str) -> ApiResult<Todo> {
        let client = self.get_connection().await?;
        let query = format!(
            "UPDATE todos SET title = $1 WHERE id = $2 RETURNING {}",
            TODO_COLUMNS
        );

        let todo = client
            .query_opt(query.as_str(), &[&title, &id])
            .await?
            .map(|row| Self::row_to_todo(&row))
            .ok_or_else(|| ApiError::todo_not_found(id))?;

        info!("Updated todo with id: {}", todo.id);
        Ok(todo)
    }

    async fn delete_todo(&self, id: i64) -> ApiResult<()> {
        let client = self.get_connection().await?;

        let rows_affected = client
            .execute("DELETE FROM todos WHERE id = $1", &[&id])
            .await?;

        if rows_affected == 0 {
            Err(ApiError::todo_not_found(id))
        } else {
            info!("Deleted todo with id: {}", id);
            Ok(())
        }
    }

    async fn health_check(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        info!("Database health check successful");
        Ok(())
    }
}
