//! 攝取流程編排
//!
//! 每個數據源一條線性流程：抓取 → 萃取 → 標準化。
//! 結構性缺失（表格不存在）只縮減輸出；抓取與數值解析錯誤
//! 以 `IngestError` 回報，由呼叫端決定記錄後繼續或中止。

use crate::config::SourcesConfig;
use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::data_ingestion::extractor::{CalendarExtractor, TsvExtractor};
use crate::data_ingestion::fetcher::{CalendarFetcher, ExportFetcher, PriceSeriesFetcher};
use crate::data_ingestion::normalizer;
use crate::domain_types::{IndicatorRecord, PriceBar, SourceId};
use tracing::info;

/// 字串日期來源的解析格式
fn date_format_for(source: SourceId) -> IngestResult<&'static str> {
    source
        .date_format()
        .ok_or_else(|| IngestError::parse("date", "", format!("{} 沒有字串日期格式", source)))
}

/// 攝取流程編排器
pub struct IngestionProcessor {
    sources: SourcesConfig,
}

impl IngestionProcessor {
    pub fn new(sources: SourcesConfig) -> Self {
        Self { sources }
    }

    /// Caixin 服務業 PMI：單次 GET 的日曆頁
    pub async fn caixin_records(&self) -> IngestResult<Vec<IndicatorRecord>> {
        let cfg = &self.sources.caixin;
        let fetcher = CalendarFetcher::new("caixin", cfg.timeout_secs)?;
        let html = fetcher.fetch_page(cfg).await?;

        let rows = CalendarExtractor::extract(&html, cfg.event_id);
        let records =
            normalizer::normalize_calendar_rows(&rows, date_format_for(SourceId::CaixinInvesting)?)?;
        info!("Caixin PMI 標準化完成，共 {} 筆記錄", records.len());
        Ok(records)
    }

    /// ISM 非製造業 PMI：分頁日曆歷史
    pub async fn ism_records(&self) -> IngestResult<Vec<IndicatorRecord>> {
        let cfg = &self.sources.ism;
        let fetcher = CalendarFetcher::new("ism", cfg.timeout_secs)?;
        let (first_page, fragments) = fetcher.fetch_paginated(cfg).await?;

        let mut rows = CalendarExtractor::extract(&first_page, cfg.event_id);
        for fragment in &fragments {
            rows.extend(CalendarExtractor::extract_fragment(fragment));
        }

        let records =
            normalizer::normalize_calendar_rows(&rows, date_format_for(SourceId::IsmInvesting)?)?;
        info!("ISM PMI 標準化完成，共 {} 筆記錄", records.len());
        Ok(records)
    }

    /// Caixin PMI 的 TSV 匯出端點，輸出按日期升冪排序
    pub async fn export_records(&self) -> IngestResult<Vec<IndicatorRecord>> {
        let cfg = &self.sources.caixin_export;
        let fetcher = ExportFetcher::new(cfg.timeout_secs)?;
        let body = fetcher.fetch(cfg).await?;

        let rows = TsvExtractor::extract(&body)?;
        let records = normalizer::normalize_sorted(&rows, date_format_for(SourceId::CaixinExport)?)?;
        info!("TSV 匯出標準化完成，共 {} 筆記錄", records.len());
        Ok(records)
    }

    /// 美元/人民幣月線價格序列
    pub async fn price_bars(&self) -> IngestResult<Vec<PriceBar>> {
        let cfg = &self.sources.price_series;
        let fetcher = PriceSeriesFetcher::new(cfg.timeout_secs)?;
        fetcher.fetch(cfg).await
    }
}
