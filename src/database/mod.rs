use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Result};

use crate::{
    models::{Asset, SpotPrice},
    resolver::PriceStore,
};

/// Connects to a PostgreSQL database with the given `db_url`, returning a connection pool for accessing it
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .idle_timeout(Duration::from_secs(30))
        .max_connections(32)
        .min_connections(4)
        .connect(db_url)
        .await
}

pub struct PostgreDatabase {
    sqlx_db: PgPool,
}

impl PostgreDatabase {
    pub fn new(sqlx_db: PgPool) -> Self {
        PostgreDatabase { sqlx_db }
    }

    /// Applies the embedded migrations
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.sqlx_db).await
    }

    /// Round-trips a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.sqlx_db).await?;
        Ok(())
    }

    /// Get the most recently recorded price of an asset
    pub async fn get_latest_spot_price(&self, asset: Asset) -> Result<Option<SpotPrice>> {
        let row = sqlx::query_as::<_, SpotPrice>(
            r#"
            SELECT id, asset, usd_price, recorded_at
            FROM spot_price
            WHERE asset = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(asset.as_str())
        .fetch_optional(&self.sqlx_db)
        .await?;
        Ok(row)
    }

    /// Record a freshly fetched price
    pub async fn create_spot_price(&self, asset: Asset, usd_price: f64) -> Result<SpotPrice> {
        sqlx::query_as::<_, SpotPrice>(
            r#"
            INSERT INTO spot_price (asset, usd_price)
            VALUES ($1, $2)
            RETURNING id, asset, usd_price, recorded_at
            "#,
        )
        .bind(asset.as_str())
        .bind(usd_price)
        .fetch_one(&self.sqlx_db)
        .await
    }
}

#[async_trait]
impl PriceStore for PostgreDatabase {
    async fn latest_price(&self, asset: Asset) -> Result<Option<SpotPrice>> {
        self.get_latest_spot_price(asset).await
    }

    async fn record_price(&self, asset: Asset, usd_price: f64) -> Result<SpotPrice> {
        self.create_spot_price(asset, usd_price).await
    }
}
