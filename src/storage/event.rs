//! 儲存事件觸發的載入入口
//!
//! 事件負載帶 bucket（此處解析為基準目錄）與物件名稱。物件名稱
//! 在配置的檔名映射中查表：未映射的檔名記錄後直接略過；載入失敗
//! 則把錯誤傳回呼叫平台，讓平台記錄或重試。

use crate::config::{ApplicationConfig, TableMapping};
use crate::data_ingestion::error::IngestResult;
use crate::storage::warehouse::{LoadReport, WarehouseLoader};
use serde::Deserialize;
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::info;

/// 儲存事件負載
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    pub bucket: String,
    pub name: String,
}

/// 一次已解析的載入計畫
#[derive(Debug)]
pub struct LoadPlan<'a> {
    pub mapping: &'a TableMapping,
    pub path: PathBuf,
}

/// 把事件解析為載入計畫
///
/// 物件名稱不在映射中時回傳 `None`，不提交任何載入作業。
pub fn plan_load<'a>(event: &StorageEvent, config: &'a ApplicationConfig) -> Option<LoadPlan<'a>> {
    info!("收到事件: 物件 {} (bucket: {})", event.name, event.bucket);

    let Some(mapping) = config.mapping_for_file(&event.name) else {
        info!("檔案 {} 不在映射中，忽略", event.name);
        return None;
    };

    Some(LoadPlan {
        mapping,
        path: PathBuf::from(&event.bucket).join(&event.name),
    })
}

/// 處理一個儲存事件
///
/// 未映射的檔名回傳 `Ok(None)`；載入失敗把錯誤原樣傳回。
pub async fn handle_storage_event(
    pool: &PgPool,
    config: &ApplicationConfig,
    event: &StorageEvent,
) -> IngestResult<Option<LoadReport>> {
    let Some(plan) = plan_load(event, config) else {
        return Ok(None);
    };

    info!(
        "處理檔案 {}，載入到表 {}",
        event.name, plan.mapping.table
    );

    let loader = WarehouseLoader::new(pool, &config.warehouse);
    let report = loader.load_csv(plan.mapping, &plan.path).await?;
    Ok(Some(report))
}
