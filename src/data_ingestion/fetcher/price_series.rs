//! 價格序列抓取器
//!
//! 從 v8 圖表 API 以月線粒度取回貨幣對 OHLCV K線，
//! 期間為固定起始日期到今天。

use super::build_client;
use crate::config::PriceSeriesConfig;
use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::PriceBar;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

/// 圖表 API 響應
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// 價格序列抓取器
pub struct PriceSeriesFetcher {
    client: reqwest::Client,
}

impl PriceSeriesFetcher {
    pub fn new(timeout_secs: u64) -> IngestResult<Self> {
        Ok(Self {
            client: build_client("price_series", timeout_secs)?,
        })
    }

    /// 組合圖表 API 查詢網址
    fn chart_url(cfg: &PriceSeriesConfig, start: NaiveDate, end: NaiveDate) -> IngestResult<String> {
        let start_ts = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| IngestError::fetch("price_series", "無效的起始日期"))?
            .and_utc()
            .timestamp();
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| IngestError::fetch("price_series", "無效的結束日期"))?
            .and_utc()
            .timestamp();
        Ok(format!(
            "{}/{}?period1={}&period2={}&interval={}",
            cfg.chart_url, cfg.symbol, start_ts, end_ts, cfg.interval
        ))
    }

    /// 取回固定起始日到今天的月線 K線，按日期升冪排序
    pub async fn fetch(&self, cfg: &PriceSeriesConfig) -> IngestResult<Vec<PriceBar>> {
        let start = NaiveDate::parse_from_str(&cfg.start_date, "%Y-%m-%d").map_err(|e| {
            IngestError::fetch("price_series", format!("起始日期 {} 無效: {}", cfg.start_date, e))
        })?;
        let end = Utc::now().date_naive();

        let url = Self::chart_url(cfg, start, end)?;
        info!("抓取 {} 月線數據: {} 到 {}", cfg.symbol, start, end);

        let response: ChartResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IngestError::fetch("price_series", e))?
            .error_for_status()
            .map_err(|e| IngestError::fetch("price_series", e))?
            .json()
            .await
            .map_err(|e| IngestError::fetch("price_series", e))?;

        let mut bars = Self::parse_response(&cfg.symbol, response)?;

        // 按日期升冪排序後輸出
        bars.sort_by_key(|b| b.date);
        info!("取回 {} 根月線 K線", bars.len());
        Ok(bars)
    }

    /// 將圖表 API 響應轉換為 K線序列
    ///
    /// API 明確回報的錯誤視為抓取失敗（可重試）；響應形狀不符
    /// （缺少結果、時間戳或報價）是解析錯誤，重試也不會恢復。
    fn parse_response(symbol: &str, resp: ChartResponse) -> IngestResult<Vec<PriceBar>> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                IngestError::fetch(symbol, format!("{}: {}", err.code, err.description))
            } else {
                IngestError::parse("chart.result", symbol, "響應缺少結果與錯誤資訊")
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| IngestError::parse("chart.result", symbol, "結果陣列為空"))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| IngestError::parse("chart.timestamp", symbol, "響應缺少時間戳"))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| IngestError::parse("chart.quote", symbol, "響應缺少報價數據"))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let Some(date) = chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
            else {
                warn!("忽略無效時間戳: {}", ts);
                continue;
            };

            bars.push(PriceBar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten(),
                volume: quote.volume.get(i).copied().flatten().map(|v| v as f64),
            });
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> ChartResponse {
        ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![978_307_200, 980_985_600]), // 2001-01-01, 2001-02-01
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![Some(8.27), Some(8.28)],
                            high: vec![Some(8.29), Some(8.28)],
                            low: vec![Some(8.26), Some(8.27)],
                            close: vec![Some(8.28), None],
                            volume: vec![Some(0), Some(0)],
                        }],
                    },
                }]),
                error: None,
            },
        }
    }

    #[test]
    fn test_parse_response() {
        let bars = PriceSeriesFetcher::parse_response("CNY=X", sample_response()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(bars[0].close, Some(8.28));
        // 缺值欄位映射為 None
        assert_eq!(bars[1].close, None);
    }

    #[test]
    fn test_parse_response_api_error() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: None,
                error: Some(ChartError {
                    code: "Not Found".to_string(),
                    description: "No data found".to_string(),
                }),
            },
        };
        let err = PriceSeriesFetcher::parse_response("BAD=X", resp).unwrap_err();
        // API 回報的錯誤屬於抓取失敗，可重試
        assert!(err.is_retryable());
    }

    #[test]
    fn test_parse_response_missing_timestamps_is_parse_error() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: None,
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![],
                            high: vec![],
                            low: vec![],
                            close: vec![],
                            volume: vec![],
                        }],
                    },
                }]),
                error: None,
            },
        };
        let err = PriceSeriesFetcher::parse_response("CNY=X", resp).unwrap_err();
        // 響應形狀不符是解析錯誤，重試不會恢復
        assert!(matches!(err, IngestError::Parse { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_response_missing_quote_is_parse_error() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![978_307_200]),
                    indicators: Indicators { quote: vec![] },
                }]),
                error: None,
            },
        };
        let err = PriceSeriesFetcher::parse_response("CNY=X", resp).unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }

    #[test]
    fn test_chart_url() {
        let cfg = PriceSeriesConfig {
            chart_url: "https://example.com/v8/finance/chart".to_string(),
            symbol: "CNY=X".to_string(),
            start_date: "2001-01-01".to_string(),
            interval: "1mo".to_string(),
            timeout_secs: 30,
        };
        let url = PriceSeriesFetcher::chart_url(
            &cfg,
            NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2001, 12, 31).unwrap(),
        )
        .unwrap();
        assert!(url.starts_with("https://example.com/v8/finance/chart/CNY=X?period1="));
        assert!(url.ends_with("&interval=1mo"));
    }
}
