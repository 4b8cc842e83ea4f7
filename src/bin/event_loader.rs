//! 事件觸發載入器
//!
//! 讀取儲存事件負載（JSON，來自檔案參數或標準輸入），把映射中的
//! 物件載入對應倉儲表。未映射的檔名視為無事發生；載入失敗以非零
//! 結束碼回報，讓呼叫平台記錄或重試。

use anyhow::{Context, Result};
use clap::Parser;
use indicator_pipeline::config;
use indicator_pipeline::logging::init_logging;
use indicator_pipeline::storage::database::get_warehouse_pool;
use indicator_pipeline::storage::{handle_storage_event, StorageEvent};
use std::io::Read;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "event_loader", about = "處理儲存事件並載入倉儲表")]
struct Cli {
    /// 事件負載 JSON 的路徑，`-` 表示標準輸入
    #[arg(default_value = "-")]
    event: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置與日誌系統
    let app_config = config::init_config()?;
    init_logging(&app_config.log)?;

    let payload = if cli.event == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("讀取標準輸入失敗")?;
        buf
    } else {
        std::fs::read_to_string(&cli.event)
            .with_context(|| format!("讀取事件檔案 {} 失敗", cli.event))?
    };

    let event: StorageEvent = serde_json::from_str(&payload).context("事件負載解析失敗")?;

    let pool = get_warehouse_pool(false).await?;

    // 載入失敗經由 `?` 傳回平台（非零結束碼）
    match handle_storage_event(pool, app_config, &event).await? {
        Some(report) => info!(
            "事件處理完成: 表 {} 載入 {} 列",
            report.table, report.rows_loaded
        ),
        None => info!("事件處理完成: 無對應載入作業"),
    }

    Ok(())
}
