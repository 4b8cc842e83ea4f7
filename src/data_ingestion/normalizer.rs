//! 標準化器
//!
//! 把原始欄位元組轉成帶類型的記錄。規則逐欄位套用：
//! 日期解析失敗降級為 `None` 且保留該列（維持列數與來源一致，
//! 供下游人工核對）；數值欄位接受逗號小數點並把佔位符映射為
//! `None`，其餘無法解析的內容回報 `Parse` 錯誤。

use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::data_ingestion::extractor::RawCalendarRow;
use crate::domain_types::IndicatorRecord;
use chrono::NaiveDate;
use tracing::warn;

/// 數值欄位的佔位符（不斷行空格）
const PLACEHOLDER: char = '\u{a0}';

/// 以來源固定格式解析日期；失敗時回傳 `None` 並記錄警告
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, format) {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("無效的日期格式: {:?} (預期 {})", value, format);
            None
        }
    }
}

/// 解析數值欄位
///
/// 空字串與不斷行空格佔位符映射為 `None`；逗號小數點轉為句點後
/// 解析為浮點數。其餘內容回報 `Parse` 錯誤而不是靜默丟棄。
pub fn parse_metric(field: &str, value: &str) -> IngestResult<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == PLACEHOLDER) {
        return Ok(None);
    }

    let canonical = trimmed.replace(',', ".");
    canonical
        .parse::<f64>()
        .map(Some)
        .map_err(|_| IngestError::parse(field, value, "無法解析為浮點數"))
}

/// 把日曆列標準化為指標記錄
///
/// `date_format` 為來源固定格式。日曆頁的日期欄可能帶空格分隔的
/// 註記（如月份標示），只取第一個詞解析。
pub fn normalize_calendar_row(
    raw: &RawCalendarRow,
    date_format: &str,
) -> IngestResult<IndicatorRecord> {
    let date_token = raw.date.split_whitespace().next().unwrap_or("");

    Ok(IndicatorRecord {
        date: parse_date(date_token, date_format),
        actual: parse_metric("actual", &raw.actual)?,
        forecast: parse_metric("forecast", &raw.forecast)?,
        previous: parse_metric("previous", &raw.previous)?,
    })
}

/// 標準化一批日曆列
///
/// 日期失敗不淘汰列；數值解析錯誤使整批失敗，交由呼叫端處置。
pub fn normalize_calendar_rows(
    rows: &[RawCalendarRow],
    date_format: &str,
) -> IngestResult<Vec<IndicatorRecord>> {
    rows.iter()
        .map(|row| normalize_calendar_row(row, date_format))
        .collect()
}

/// 標準化並按日期升冪排序（匯出來源的輸出契約）
pub fn normalize_sorted(
    rows: &[RawCalendarRow],
    date_format: &str,
) -> IngestResult<Vec<IndicatorRecord>> {
    let mut records = normalize_calendar_rows(rows, date_format)?;
    // None 日期排在最前，不影響有效日期間的順序
    records.sort_by_key(|r| r.date);
    Ok(records)
}
