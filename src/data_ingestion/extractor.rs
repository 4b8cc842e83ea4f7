//! 萃取器
//!
//! 從原始內容（HTML 或 TSV）萃取原始欄位元組。結構性缺失
//! （找不到表格、列形狀不符）不會中斷執行，只會縮減輸出序列。

use crate::data_ingestion::error::{IngestError, IngestResult};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{debug, warn};

/// 一列未標準化的日曆欄位
///
/// 欄位位置由來源固定：日期在第 0 欄，實際/預測/前值在第 2-4 欄。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCalendarRow {
    pub date: String,
    pub actual: String,
    pub forecast: String,
    pub previous: String,
}

/// TSV 匯出的一列（標題行欄名固定）
#[derive(Debug, Deserialize)]
struct RawExportRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "ActualValue")]
    actual: String,
    #[serde(rename = "ForecastValue")]
    forecast: String,
    #[serde(rename = "PreviousValue")]
    previous: String,
}

/// 日曆頁 HTML 萃取器
pub struct CalendarExtractor;

impl CalendarExtractor {
    /// 從頁面萃取歷史表格；表格缺失時退回「最新值」元件
    ///
    /// 兩者皆不存在時回傳空序列，不報錯。
    pub fn extract(html: &str, event_id: u32) -> Vec<RawCalendarRow> {
        let document = Html::parse_document(html);

        let rows = Self::history_table_rows(&document, event_id);
        if !rows.is_empty() {
            debug!("歷史表格萃取完成，共 {} 列", rows.len());
            return rows;
        }

        warn!("找不到歷史表格 eventHistoryTable{}，嘗試最新值元件", event_id);
        match Self::latest_widget_row(&document) {
            Some(row) => vec![row],
            None => {
                warn!("最新值元件也不存在，回傳空序列");
                Vec::new()
            }
        }
    }

    /// 萃取追加歷史端點回傳的 `<tr>` 片段
    pub fn extract_fragment(fragment: &str) -> Vec<RawCalendarRow> {
        let wrapped = format!("<table><tbody>{}</tbody></table>", fragment);
        let document = Html::parse_fragment(&wrapped);
        Self::rows_from_document(&document, "tbody > tr")
    }

    fn history_table_rows(document: &Html, event_id: u32) -> Vec<RawCalendarRow> {
        let selector_str = format!("table#eventHistoryTable{} tbody tr", event_id);
        Self::rows_from_document(document, &selector_str)
    }

    fn rows_from_document(document: &Html, selector_str: &str) -> Vec<RawCalendarRow> {
        let Ok(row_selector) = Selector::parse(selector_str) else {
            warn!("無效的選擇器: {}", selector_str);
            return Vec::new();
        };
        let Ok(cell_selector) = Selector::parse("td") else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for row in document.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| Self::cell_text(cell))
                .collect();

            // 欄數不足 5 的列（分隔列、備註列）直接跳過
            if cells.len() < 5 {
                continue;
            }

            rows.push(RawCalendarRow {
                date: cells[0].clone(),
                actual: cells[2].clone(),
                forecast: cells[3].clone(),
                previous: cells[4].clone(),
            });
        }
        rows
    }

    /// 「最新值」元件：值分散在帶標籤的子區塊裡
    fn latest_widget_row(document: &Html) -> Option<RawCalendarRow> {
        let widget_selector = Selector::parse("div.economicCalendarData").ok()?;
        let widget = document.select(&widget_selector).next()?;

        let date = Self::select_text(widget, "div.date")?;
        let actual = Self::select_text(widget, "div.actual span")?;
        let forecast = Self::select_text(widget, "div.forecast span")?;
        let previous = Self::select_text(widget, "div.previous span")?;

        Some(RawCalendarRow {
            date,
            actual,
            forecast,
            previous,
        })
    }

    fn select_text(scope: ElementRef<'_>, selector_str: &str) -> Option<String> {
        let selector = Selector::parse(selector_str).ok()?;
        scope
            .select(&selector)
            .next()
            .map(|el| Self::element_text(el))
    }

    fn cell_text(cell: ElementRef<'_>) -> String {
        Self::element_text(cell)
    }

    fn element_text(el: ElementRef<'_>) -> String {
        el.text().collect::<String>().trim().to_string()
    }
}

/// TSV 萃取器
pub struct TsvExtractor;

impl TsvExtractor {
    /// 將 TSV 本文解析為原始欄位元組，每行一筆
    ///
    /// 標題行欄名固定為 `Date/ActualValue/ForecastValue/PreviousValue`。
    pub fn extract(text: &str) -> IngestResult<Vec<RawCalendarRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.deserialize::<RawExportRow>() {
            let raw = result.map_err(|e| {
                IngestError::parse("tsv_row", "", format!("TSV 列解析失敗: {}", e))
            })?;
            rows.push(RawCalendarRow {
                date: raw.date,
                actual: raw.actual,
                forecast: raw.forecast,
                previous: raw.previous,
            });
        }
        Ok(rows)
    }
}
