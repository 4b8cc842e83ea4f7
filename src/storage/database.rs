use crate::config::{self, WarehouseConfig};
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::ConnectOptions;
use tokio::sync::OnceCell;

/// 全局倉儲資料庫連接池
static WAREHOUSE_POOL: OnceCell<PgPool> = OnceCell::const_new();

/// 初始化倉儲資料庫連接池
pub async fn init_warehouse_pool(config: &WarehouseConfig) -> Result<PgPool> {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.database);

    options = options.disable_statement_logging();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime())
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect_with(options)
        .await?;

    // 測試連接
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

/// 獲取倉儲資料庫連接池
pub async fn get_warehouse_pool(force_init: bool) -> Result<&'static PgPool> {
    if force_init || WAREHOUSE_POOL.get().is_none() {
        let app_config = config::get_config();
        let pool = init_warehouse_pool(&app_config.warehouse).await?;
        let pool = WAREHOUSE_POOL.get_or_init(|| async { pool }).await;
        return Ok(pool);
    }

    Ok(WAREHOUSE_POOL.get().unwrap())
}
