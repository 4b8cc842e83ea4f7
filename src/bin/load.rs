//! 批次載入 CLI
//!
//! 把輸出目錄下的 CSV 檔逐一載入配置中映射的倉儲表。
//! 單一表載入失敗只記錄錯誤，繼續處理下一個表。

use anyhow::Result;
use indicator_pipeline::config;
use indicator_pipeline::logging::init_logging;
use indicator_pipeline::storage::database::get_warehouse_pool;
use indicator_pipeline::storage::WarehouseLoader;
use std::path::Path;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化配置與日誌系統
    let app_config = config::init_config()?;
    init_logging(&app_config.log)?;

    let pool = get_warehouse_pool(false).await?;
    let loader = WarehouseLoader::new(pool, &app_config.warehouse);
    let output_dir = Path::new(&app_config.output.directory);

    info!("開始批次載入，共 {} 個表", app_config.tables.len());

    let mut succeeded = 0usize;
    for mapping in &app_config.tables {
        let path = output_dir.join(&mapping.file);
        info!("處理表: {}", mapping.table);

        match loader.load_csv(mapping, &path).await {
            Ok(report) => {
                info!("表 {} 載入完成，{} 列", report.table, report.rows_loaded);
                succeeded += 1;
            }
            // 繼續處理下一個表
            Err(e) => error!("表 {} 載入失敗: {}", mapping.table, e),
        }
    }

    info!(
        "批次載入結束: {}/{} 個表成功",
        succeeded,
        app_config.tables.len()
    );
    Ok(())
}
