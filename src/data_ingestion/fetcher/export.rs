//! TSV 匯出端點抓取器

use super::{build_client, get_text};
use crate::config::ExportSourceConfig;
use crate::data_ingestion::error::IngestResult;
use tracing::info;

/// TSV 匯出抓取器
pub struct ExportFetcher {
    client: reqwest::Client,
}

impl ExportFetcher {
    pub fn new(timeout_secs: u64) -> IngestResult<Self> {
        Ok(Self {
            client: build_client("export", timeout_secs)?,
        })
    }

    /// 取回匯出端點的 TSV 本文（含標題行）
    pub async fn fetch(&self, cfg: &ExportSourceConfig) -> IngestResult<String> {
        info!("開始下載 TSV 匯出: {}", cfg.url);
        let body = get_text(&self.client, "export", &cfg.url).await?;
        info!("下載完成，{} 位元組", body.len());
        Ok(body)
    }
}
