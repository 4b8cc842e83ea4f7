use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use crate::domain_types::SchemaKind;
use serde::{Deserialize, Serialize};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub warehouse: WarehouseConfig,
    pub log: LogConfig,
    pub output: OutputConfig,
    pub sources: SourcesConfig,
    pub tables: Vec<TableMapping>,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.warehouse.validate()?;
        self.log.validate()?;
        self.output.validate()?;
        self.sources.validate()?;

        for mapping in &self.tables {
            mapping.validate()?;
        }

        Ok(())
    }
}

impl ApplicationConfig {
    /// 依檔案名稱查找對應的表映射
    pub fn mapping_for_file(&self, file_name: &str) -> Option<&TableMapping> {
        self.tables.iter().find(|m| m.file == file_name)
    }
}

/// 數據倉儲（PostgreSQL）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// 目的地表所在的 schema（命名空間）
    pub schema: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Validator for WarehouseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證倉儲配置
        ValidationUtils::not_empty(&self.host, "warehouse.host")?;
        ValidationUtils::not_empty(&self.username, "warehouse.username")?;
        ValidationUtils::not_empty(&self.database, "warehouse.database")?;
        ValidationUtils::not_empty(&self.schema, "warehouse.schema")?;
        ValidationUtils::in_range(self.port, 1, 65535, "warehouse.port")?;
        ValidationUtils::in_range(
            self.max_connections,
            self.min_connections,
            1000,
            "warehouse.max_connections",
        )?;

        Ok(())
    }
}

impl WarehouseConfig {
    /// 帶 schema 前綴的完整表名
    pub fn qualified_table(&self, table: &str) -> String {
        format!("{}.{}", self.schema, table)
    }

    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}

/// 輸出配置
///
/// `directory` 是抓取結果 CSV 的寫入目錄，也是批次載入器
/// 讀取檔案的位置（事件觸發載入器則以事件中的 bucket 為基準）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl Validator for OutputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.directory, "output.directory")?;
        Ok(())
    }
}

/// 所有數據源的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub caixin: CalendarSourceConfig,
    pub caixin_export: ExportSourceConfig,
    pub ism: PaginatedSourceConfig,
    pub price_series: PriceSeriesConfig,
}

impl Validator for SourcesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.caixin.validate()?;
        self.caixin_export.validate()?;
        self.ism.validate()?;
        self.price_series.validate()?;
        Ok(())
    }
}

/// 日曆頁數據源配置（單次 GET）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSourceConfig {
    pub url: String,
    /// 日曆事件編號，決定歷史表格的 DOM id
    pub event_id: u32,
    pub timeout_secs: u64,
}

impl Validator for CalendarSourceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "sources.caixin.url")?;
        ValidationUtils::in_range(self.timeout_secs, 1, 300, "sources.caixin.timeout_secs")?;
        Ok(())
    }
}

/// TSV 匯出端點數據源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSourceConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Validator for ExportSourceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "sources.caixin_export.url")?;
        ValidationUtils::in_range(
            self.timeout_secs,
            1,
            300,
            "sources.caixin_export.timeout_secs",
        )?;
        Ok(())
    }
}

/// 分頁歷史數據源配置
///
/// 分頁迴圈必須有明確上界，`max_pages` 不可為 0。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedSourceConfig {
    pub url: String,
    /// 追加歷史列的 JSON 端點
    pub more_history_url: String,
    pub event_id: u32,
    pub timeout_secs: u64,
    pub max_pages: u32,
    pub page_delay_ms: u64,
}

impl Validator for PaginatedSourceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "sources.ism.url")?;
        ValidationUtils::not_empty(&self.more_history_url, "sources.ism.more_history_url")?;
        ValidationUtils::in_range(self.timeout_secs, 1, 300, "sources.ism.timeout_secs")?;
        ValidationUtils::in_range(self.max_pages, 1, 10000, "sources.ism.max_pages")?;
        Ok(())
    }
}

/// 價格序列數據源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeriesConfig {
    /// 圖表 API 基底網址，符號附加在其後
    pub chart_url: String,
    pub symbol: String,
    /// 固定起始日期（%Y-%m-%d）
    pub start_date: String,
    /// 取樣粒度，目前僅支持月線
    pub interval: String,
    pub timeout_secs: u64,
}

impl Validator for PriceSeriesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.chart_url, "sources.price_series.chart_url")?;
        ValidationUtils::not_empty(&self.symbol, "sources.price_series.symbol")?;
        ValidationUtils::not_empty(&self.start_date, "sources.price_series.start_date")?;
        ValidationUtils::one_of(
            &self.interval,
            &["1mo".to_string()],
            "sources.price_series.interval",
        )?;
        ValidationUtils::in_range(
            self.timeout_secs,
            1,
            300,
            "sources.price_series.timeout_secs",
        )?;
        Ok(())
    }
}

/// 檔案名稱到倉儲表的映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMapping {
    /// 物件（CSV 檔案）名稱
    pub file: String,
    /// 目的地表名稱
    pub table: String,
    /// 預先聲明的欄位結構
    pub format: SchemaKind,
}

impl Validator for TableMapping {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.file, "tables.file")?;
        ValidationUtils::not_empty(&self.table, "tables.table")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mapping() -> TableMapping {
        TableMapping {
            file: "Caixin_PMI.csv".to_string(),
            table: "caixin_pmi_cny".to_string(),
            format: SchemaKind::Pmi,
        }
    }

    #[test]
    fn test_qualified_table() {
        let cfg = WarehouseConfig {
            host: "localhost".to_string(),
            port: 5432,
            username: "loader".to_string(),
            password: "".to_string(),
            database: "indicators".to_string(),
            schema: "case_data".to_string(),
            max_connections: 5,
            min_connections: 1,
            max_lifetime_secs: 1800,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        };
        assert_eq!(cfg.qualified_table("usd_cny"), "case_data.usd_cny");
    }

    #[test]
    fn test_table_mapping_validation() {
        assert!(sample_mapping().validate().is_ok());

        let mut bad = sample_mapping();
        bad.table = String::new();
        assert!(bad.validate().is_err());
    }
}
