//! 指標記錄類型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一筆標準化後的日曆指標觀測值
///
/// 日期解析失敗時 `date` 為 `None`，但該列仍會被保留輸出，
/// 以維持與來源表格相同的列數。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub date: Option<NaiveDate>,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    pub previous: Option<f64>,
}

impl IndicatorRecord {
    /// 是否所有數值欄位皆為空（佔位列）
    pub fn is_empty_reading(&self) -> bool {
        self.actual.is_none() && self.forecast.is_none() && self.previous.is_none()
    }
}

/// 一根月線 OHLCV K線
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}
