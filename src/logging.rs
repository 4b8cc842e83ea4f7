//! 日誌系統初始化

use crate::config::LogConfig;
use anyhow::{anyhow, Result};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// 依配置初始化日誌系統（在各二進制啟動時調用）
pub fn init_logging(log_config: &LogConfig) -> Result<()> {
    let level = match log_config.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // 默認為INFO
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(level);

    let result = if log_config.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
