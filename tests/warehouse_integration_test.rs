use indicator_pipeline::config::{TableMapping, WarehouseConfig};
use indicator_pipeline::domain_types::SchemaKind;
use indicator_pipeline::storage::database::init_warehouse_pool;
use indicator_pipeline::storage::WarehouseLoader;
use sqlx::PgPool;
use std::io::Write;
use tempfile::NamedTempFile;

// 測試用倉儲配置，憑證可用環境變數覆寫
fn test_warehouse_config() -> WarehouseConfig {
    WarehouseConfig {
        host: std::env::var("TEST_WAREHOUSE_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: 5432,
        username: std::env::var("TEST_WAREHOUSE_USER")
            .unwrap_or_else(|_| "indicator_loader".to_string()),
        password: std::env::var("TEST_WAREHOUSE_PASSWORD")
            .unwrap_or_else(|_| "indicator_pass".to_string()),
        database: std::env::var("TEST_WAREHOUSE_DB").unwrap_or_else(|_| "indicators".to_string()),
        schema: "case_data_test".to_string(),
        max_connections: 5,
        min_connections: 1,
        max_lifetime_secs: 1800,
        acquire_timeout_secs: 3,
        idle_timeout_secs: 30,
    }
}

// 連不上測試倉儲時回傳 None，測試直接跳過
async fn setup_warehouse() -> Option<(PgPool, WarehouseConfig)> {
    let config = test_warehouse_config();
    match init_warehouse_pool(&config).await {
        Ok(pool) => Some((pool, config)),
        Err(e) => {
            eprintln!("測試倉儲不可用，跳過測試: {}", e);
            None
        }
    }
}

fn write_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn pmi_mapping(table: &str) -> TableMapping {
    TableMapping {
        file: "Caixin_PMI.csv".to_string(),
        table: table.to_string(),
        format: SchemaKind::Pmi,
    }
}

async fn row_count(pool: &PgPool, qualified: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", qualified))
        .fetch_one(pool)
        .await
        .expect("無法查詢列數")
}

async fn drop_table(pool: &PgPool, qualified: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {}", qualified))
        .execute(pool)
        .await
        .expect("無法清理測試表");
}

#[tokio::test]
async fn test_reload_replaces_table_contents() {
    let Some((pool, config)) = setup_warehouse().await else {
        return;
    };

    let mapping = pmi_mapping("reload_pmi_test");
    let qualified = config.qualified_table(&mapping.table);
    drop_table(&pool, &qualified).await;

    let loader = WarehouseLoader::new(&pool, &config);
    let file = write_temp_csv(
        "date,actual_state,close,forecast\n\
         2024-05-06,50.4,51.8,52.7\n\
         2024-04-05,51.8,52.6,52.5\n\
         2024-03-05,52.6,51.4,52.0\n",
    );

    // 同一個檔案載入兩次，表內容應等於最後一次載入
    let first = loader.load_csv(&mapping, file.path()).await.unwrap();
    assert_eq!(first.rows_loaded, 3);

    let second = loader.load_csv(&mapping, file.path()).await.unwrap();
    assert_eq!(second.rows_loaded, 3);
    assert_eq!(row_count(&pool, &qualified).await, 3);

    // 較短的檔案同樣全量替換，舊列不殘留
    let shorter = write_temp_csv(
        "date,actual_state,close,forecast\n\
         2024-06-05,51.2,50.4,52.5\n",
    );
    let third = loader.load_csv(&mapping, shorter.path()).await.unwrap();
    assert_eq!(third.rows_loaded, 1);
    assert_eq!(row_count(&pool, &qualified).await, 1);

    drop_table(&pool, &qualified).await;
}

#[tokio::test]
async fn test_failed_load_keeps_previous_contents() {
    let Some((pool, config)) = setup_warehouse().await else {
        return;
    };

    let mapping = pmi_mapping("failed_load_pmi_test");
    let qualified = config.qualified_table(&mapping.table);
    drop_table(&pool, &qualified).await;

    let loader = WarehouseLoader::new(&pool, &config);
    let good = write_temp_csv(
        "date,actual_state,close,forecast\n\
         2024-05-06,50.4,51.8,52.7\n\
         2024-04-05,51.8,52.6,52.5\n",
    );
    loader.load_csv(&mapping, good.path()).await.unwrap();
    assert_eq!(row_count(&pool, &qualified).await, 2);

    // 日期格式不符的檔案解析失敗，不會動到目的地表
    let bad = write_temp_csv("date,actual_state,close,forecast\n06.05.2024,50.4,51.8,52.7\n");
    assert!(loader.load_csv(&mapping, bad.path()).await.is_err());
    assert_eq!(row_count(&pool, &qualified).await, 2);

    drop_table(&pool, &qualified).await;
}
