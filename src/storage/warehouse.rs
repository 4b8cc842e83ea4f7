//! 倉儲表 sink
//!
//! 把 CSV 檔案載入倉儲表：明確欄位結構（不做自動推斷）、跳過一行
//! 標題、寫入即全量替換（TRUNCATE + COPY 在同一交易內提交）。
//! 載入作業的生命週期為 Submitted → Running → (Succeeded | Failed)。

use crate::config::{TableMapping, WarehouseConfig};
use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{ColumnType, TableSchema};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::fmt;
use std::path::Path;
use tracing::{error, info};

/// 載入作業狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadJobState {
    Submitted,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for LoadJobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadJobState::Submitted => "submitted",
            LoadJobState::Running => "running",
            LoadJobState::Succeeded => "succeeded",
            LoadJobState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// 載入作業結果報告
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: String,
    pub state: LoadJobState,
    pub rows_loaded: u64,
}

/// 倉儲載入器
pub struct WarehouseLoader<'a> {
    pool: &'a PgPool,
    warehouse: &'a WarehouseConfig,
}

impl<'a> WarehouseLoader<'a> {
    pub fn new(pool: &'a PgPool, warehouse: &'a WarehouseConfig) -> Self {
        Self { pool, warehouse }
    }

    /// 把一個 CSV 檔案載入對應的倉儲表
    ///
    /// 先依宣告結構解析整個檔案，再於單一交易內 TRUNCATE + COPY；
    /// 解析失敗不會動到目的地表。成功時回報載入列數。
    pub async fn load_csv(&self, mapping: &TableMapping, csv_path: &Path) -> IngestResult<LoadReport> {
        let qualified = self.warehouse.qualified_table(&mapping.table);
        let schema = mapping.format.schema();

        info!(
            "載入作業提交: {} -> {} ({})",
            csv_path.display(),
            qualified,
            LoadJobState::Submitted
        );

        // 依宣告結構解析 CSV（跳過一行標題）
        let copy_lines = read_csv_for_copy(csv_path, &schema, &mapping.table)?;

        info!("載入作業執行中 ({})", LoadJobState::Running);
        match self.replace_table(&qualified, &schema, &copy_lines).await {
            Ok(rows_loaded) => {
                info!(
                    "載入作業完成 ({})。已載入 {} 列到 {}",
                    LoadJobState::Succeeded,
                    rows_loaded,
                    qualified
                );
                Ok(LoadReport {
                    table: mapping.table.clone(),
                    state: LoadJobState::Succeeded,
                    rows_loaded,
                })
            }
            Err(e) => {
                error!("載入作業失敗 ({}): {}", LoadJobState::Failed, e);
                Err(IngestError::load(&mapping.table, e))
            }
        }
    }

    /// 在單一交易內重建表內容（全量替換語義）
    async fn replace_table(
        &self,
        qualified: &str,
        schema: &TableSchema,
        copy_lines: &[String],
    ) -> Result<u64, sqlx::Error> {
        let column_list = schema.column_names().join(", ");
        let column_defs = schema
            .columns()
            .iter()
            .map(|c| format!("{} {}", c.name, c.ty.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            self.warehouse.schema
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            qualified, column_defs
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!("TRUNCATE TABLE {}", qualified))
            .execute(&mut *tx)
            .await?;

        let mut copy = tx
            .copy_in_raw(&format!(
                "COPY {} ({}) FROM STDIN",
                qualified, column_list
            ))
            .await?;

        for line in copy_lines {
            copy.send(line.as_bytes()).await?;
        }

        let rows_loaded = copy.finish().await?;
        tx.commit().await?;
        Ok(rows_loaded)
    }
}

/// 把 CSV 檔案轉成 COPY 文字格式的行
///
/// 空欄位轉為 SQL NULL（`\N`）；欄數或值與宣告結構不符即失敗。
fn read_csv_for_copy(
    csv_path: &Path,
    schema: &TableSchema,
    table: &str,
) -> IngestResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true) // 跳過一行標題
        .flexible(true)
        .from_path(csv_path)
        .map_err(|e| IngestError::load(table, e))?;

    let columns = schema.columns();
    let mut lines = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IngestError::load(table, e))?;

        if record.len() != columns.len() {
            return Err(IngestError::load(
                table,
                format!(
                    "第 {} 列有 {} 欄，宣告結構為 {} 欄",
                    idx + 1,
                    record.len(),
                    columns.len()
                ),
            ));
        }

        let mut fields = Vec::with_capacity(columns.len());
        for (value, column) in record.iter().zip(columns) {
            fields.push(copy_field(value, column.ty, column.name, table)?);
        }
        lines.push(format!("{}\n", fields.join("\t")));
    }

    Ok(lines)
}

/// 驗證並轉換單一欄位值為 COPY 文字格式
fn copy_field(
    value: &str,
    ty: ColumnType,
    column: &str,
    table: &str,
) -> IngestResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok("\\N".to_string());
    }

    match ty {
        ColumnType::Date => {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| {
                IngestError::load(table, format!("欄位 {} 的日期值 {:?} 無效: {}", column, trimmed, e))
            })?;
            Ok(trimmed.to_string())
        }
        ColumnType::Float => {
            trimmed.parse::<f64>().map_err(|e| {
                IngestError::load(table, format!("欄位 {} 的數值 {:?} 無效: {}", column, trimmed, e))
            })?;
            Ok(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::SchemaKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_csv_for_copy_pmi() {
        let file = write_temp(
            "date,actual_state,close,forecast\n\
             2024-05-06,50.4,51.8,52.7\n\
             ,49.2,50.1,\n",
        );
        let schema = SchemaKind::Pmi.schema();
        let lines = read_csv_for_copy(file.path(), &schema, "caixin_pmi_cny").unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2024-05-06\t50.4\t51.8\t52.7\n");
        // 空欄位轉為 NULL
        assert_eq!(lines[1], "\\N\t49.2\t50.1\t\\N\n");
    }

    #[test]
    fn test_read_csv_rejects_wrong_column_count() {
        let file = write_temp("date,actual_state,close,forecast\n2024-05-06,50.4\n");
        let schema = SchemaKind::Pmi.schema();
        let err = read_csv_for_copy(file.path(), &schema, "caixin_pmi_cny").unwrap_err();
        assert!(matches!(err, IngestError::Load { .. }));
    }

    #[test]
    fn test_read_csv_rejects_bad_date() {
        let file = write_temp("date,actual_state,close,forecast\n06.05.2024,50.4,51.8,52.7\n");
        let schema = SchemaKind::Pmi.schema();
        assert!(read_csv_for_copy(file.path(), &schema, "caixin_pmi_cny").is_err());
    }

    #[test]
    fn test_copy_field_values() {
        assert_eq!(copy_field("", ColumnType::Float, "close", "t").unwrap(), "\\N");
        assert_eq!(
            copy_field("50.4", ColumnType::Float, "close", "t").unwrap(),
            "50.4"
        );
        assert_eq!(
            copy_field("2024-05-06", ColumnType::Date, "date", "t").unwrap(),
            "2024-05-06"
        );
        assert!(copy_field("n/d", ColumnType::Float, "close", "t").is_err());
    }

    #[test]
    fn test_job_state_display() {
        assert_eq!(LoadJobState::Succeeded.to_string(), "succeeded");
        assert_eq!(LoadJobState::Failed.to_string(), "failed");
    }
}
