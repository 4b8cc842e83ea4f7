/// 抓取器模組
///
/// 三種抓取策略：單次 GET（日曆頁與 TSV 匯出）、有界分頁抓取
/// （追加歷史端點）、價格序列圖表 API。所有路徑都帶固定請求超時，
/// 網路錯誤一律回報為 `IngestError::Fetch`，不自動重試。
// 宣告子模組
pub mod calendar;
pub mod export;
pub mod price_series;

pub use calendar::CalendarFetcher;
pub use export::ExportFetcher;
pub use price_series::PriceSeriesFetcher;

use crate::data_ingestion::error::{IngestError, IngestResult};
use std::time::Duration;

/// 瀏覽器式請求標頭，日曆站點會拒絕無標頭的請求
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// 建立帶固定超時與瀏覽器式標頭的 HTTP 客戶端
pub(crate) fn build_client(source_name: &str, timeout_secs: u64) -> IngestResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| IngestError::fetch(source_name, e))
}

/// 執行單次 GET 並取回響應本文；非 2xx 視為抓取失敗
pub(crate) async fn get_text(
    client: &reqwest::Client,
    source_name: &str,
    url: &str,
) -> IngestResult<String> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .send()
        .await
        .map_err(|e| IngestError::fetch(source_name, e))?;

    let response = response
        .error_for_status()
        .map_err(|e| IngestError::fetch(source_name, e))?;

    response
        .text()
        .await
        .map_err(|e| IngestError::fetch(source_name, e))
}
