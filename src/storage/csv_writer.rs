//! 檔案 sink
//!
//! 把標準化後的記錄序列寫成帶標題行的 CSV，一列一筆記錄，
//! 日期採字面 `%Y-%m-%d` 格式，空值寫為空欄位。
//! 標題行即各目的地的固定欄位結構。

use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{IndicatorRecord, PriceBar};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

/// 輸出的日期字面格式
const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_metric(value: &Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_error(path: &Path, err: impl ToString) -> IngestError {
    IngestError::load(path.display().to_string(), err.to_string())
}

/// 寫出 PMI 日曆檔：`date,actual_state,close,forecast`
///
/// 來源欄位 `actual` 改名為 `actual_state`、`previous` 改名為 `close`。
pub fn write_pmi_csv(path: &Path, records: &[IndicatorRecord]) -> IngestResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;

    writer
        .write_record(["date", "actual_state", "close", "forecast"])
        .map_err(|e| write_error(path, e))?;

    for record in records {
        writer
            .write_record([
                format_date(&record.date),
                format_metric(&record.actual),
                format_metric(&record.previous),
                format_metric(&record.forecast),
            ])
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|e| write_error(path, e))?;
    info!("已寫出 {} 筆記錄到 {}", records.len(), path.display());
    Ok(())
}

/// 寫出匯出來源檔：`date,actual,forecast,previous`
pub fn write_export_csv(path: &Path, records: &[IndicatorRecord]) -> IngestResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;

    writer
        .write_record(["date", "actual", "forecast", "previous"])
        .map_err(|e| write_error(path, e))?;

    for record in records {
        writer
            .write_record([
                format_date(&record.date),
                format_metric(&record.actual),
                format_metric(&record.forecast),
                format_metric(&record.previous),
            ])
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|e| write_error(path, e))?;
    info!("已寫出 {} 筆記錄到 {}", records.len(), path.display());
    Ok(())
}

/// 寫出價格序列檔：`date,close,open,high,low,volume`
pub fn write_price_csv(path: &Path, bars: &[PriceBar]) -> IngestResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;

    writer
        .write_record(["date", "close", "open", "high", "low", "volume"])
        .map_err(|e| write_error(path, e))?;

    for bar in bars {
        writer
            .write_record([
                bar.date.format(DATE_FORMAT).to_string(),
                format_metric(&bar.close),
                format_metric(&bar.open),
                format_metric(&bar.high),
                format_metric(&bar.low),
                format_metric(&bar.volume),
            ])
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|e| write_error(path, e))?;
    info!("已寫出 {} 根 K線到 {}", bars.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record() -> IndicatorRecord {
        IndicatorRecord {
            date: NaiveDate::from_ymd_opt(2024, 5, 6),
            actual: Some(50.4),
            forecast: Some(52.7),
            previous: Some(51.8),
        }
    }

    #[test]
    fn test_write_pmi_csv_renames_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Caixin_PMI.csv");

        write_pmi_csv(&path, &[sample_record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,actual_state,close,forecast"));
        // actual → actual_state, previous → close
        assert_eq!(lines.next(), Some("2024-05-06,50.4,51.8,52.7"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_pmi_csv_null_date_is_empty_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let record = IndicatorRecord {
            date: None,
            ..sample_record()
        };
        write_pmi_csv(&path, &[record]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().starts_with(",50.4"));
    }

    #[test]
    fn test_write_export_csv_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_export_csv(&path, &[sample_record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,actual,forecast,previous"));
        assert_eq!(lines.next(), Some("2024-05-06,50.4,52.7,51.8"));
    }

    #[test]
    fn test_write_price_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("USD_CNY.csv");

        let bar = PriceBar {
            date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            open: Some(8.27),
            high: Some(8.29),
            low: Some(8.26),
            close: Some(8.28),
            volume: None,
        };
        write_price_csv(&path, &[bar]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,close,open,high,low,volume"));
        assert_eq!(lines.next(), Some("2001-01-01,8.28,8.27,8.29,8.26,"));
    }
}
