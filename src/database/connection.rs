use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info};

use super::schema::{CREATE_STATEMENTS, DROP_STATEMENTS};

const MAX_CONNECTIONS: u32 = 5;

/// Connection pool plus schema management for the booking tables
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        info!(max_connections = MAX_CONNECTIONS, "Connected to booking database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        for statement in CREATE_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Booking tables created");
        Ok(())
    }

    pub async fn drop_tables(&self) -> Result<(), sqlx::Error> {
        for statement in DROP_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Booking tables dropped");
        Ok(())
    }

    /// Begin a transaction. Call `commit()` on success; dropping it rolls back.
    pub async fn transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        debug!("Beginning transaction");
        self.pool.begin().await
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
