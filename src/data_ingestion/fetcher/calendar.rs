//! 日曆頁抓取器
//!
//! 兩種模式：歷史表格隨頁面一次取回（單次 GET），或透過追加歷史
//! 端點分頁取回。原始站點的「顯示更多」是無上界的 UI 迴圈，這裡
//! 改為有明確 `max_pages` 上界與逐頁延遲的抓取迴圈。

use super::{build_client, get_text};
use crate::config::{CalendarSourceConfig, PaginatedSourceConfig};
use crate::data_ingestion::error::{IngestError, IngestResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 追加歷史端點的響應片段
#[derive(Debug, Deserialize)]
struct MoreHistoryResponse {
    /// 追加的 `<tr>` 片段
    #[serde(default, rename = "historyRows")]
    history_rows: String,
    /// 是否仍有更早的歷史
    #[serde(default, rename = "hasMoreHistory")]
    has_more_history: bool,
}

/// 日曆頁抓取器
pub struct CalendarFetcher {
    client: reqwest::Client,
}

impl CalendarFetcher {
    pub fn new(source_name: &str, timeout_secs: u64) -> IngestResult<Self> {
        Ok(Self {
            client: build_client(source_name, timeout_secs)?,
        })
    }

    /// 取回日曆頁完整 HTML（歷史表格隨頁面回傳）
    pub async fn fetch_page(&self, cfg: &CalendarSourceConfig) -> IngestResult<String> {
        info!("開始抓取日曆頁: {}", cfg.url);
        let html = get_text(&self.client, "calendar", &cfg.url).await?;
        debug!("日曆頁取回 {} 位元組", html.len());
        Ok(html)
    }

    /// 分頁取回完整歷史
    ///
    /// 先取回首頁 HTML，再反覆呼叫追加歷史端點，直到端點回報沒有
    /// 更多歷史、回傳空片段、或達到 `max_pages` 上界為止。回傳首頁
    /// HTML 與所有追加的 `<tr>` 片段。
    pub async fn fetch_paginated(
        &self,
        cfg: &PaginatedSourceConfig,
    ) -> IngestResult<(String, Vec<String>)> {
        info!("開始分頁抓取日曆頁: {} (上界 {} 頁)", cfg.url, cfg.max_pages);
        let first_page = get_text(&self.client, "calendar", &cfg.url).await?;

        let mut fragments = Vec::new();
        for page in 1..=cfg.max_pages {
            let response = self
                .client
                .post(&cfg.more_history_url)
                .header("X-Requested-With", "XMLHttpRequest")
                .form(&[
                    ("eventID", cfg.event_id.to_string()),
                    ("event_attr_ID", cfg.event_id.to_string()),
                    ("curr_page", page.to_string()),
                ])
                .send()
                .await
                .map_err(|e| IngestError::fetch("calendar", e))?
                .error_for_status()
                .map_err(|e| IngestError::fetch("calendar", e))?;

            let body: MoreHistoryResponse = response
                .json()
                .await
                .map_err(|e| IngestError::fetch("calendar", e))?;

            if body.history_rows.trim().is_empty() {
                debug!("第 {} 頁回傳空片段，停止分頁", page);
                break;
            }

            fragments.push(body.history_rows);

            if !body.has_more_history {
                debug!("端點回報沒有更多歷史（第 {} 頁）", page);
                break;
            }

            if page == cfg.max_pages {
                warn!("達到分頁上界 {} 頁，提前停止", cfg.max_pages);
                break;
            }

            tokio::time::sleep(Duration::from_millis(cfg.page_delay_ms)).await;
        }

        info!("分頁抓取完成，共 {} 個追加片段", fragments.len());
        Ok((first_page, fragments))
    }
}
