//! 目的地表結構定義
//!
//! 每個數據源對應一組預先聲明的欄位結構，載入時不做任何自動推斷。

use serde::{Deserialize, Serialize};

/// 欄位類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Date,
    Float,
}

impl ColumnType {
    /// 對應的 PostgreSQL 類型名稱
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Date => "DATE",
            ColumnType::Float => "DOUBLE PRECISION",
        }
    }
}

/// 欄位定義（名稱 + 類型）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// 預先聲明的表結構種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// PMI 日曆來源: date, actual_state, close, forecast
    Pmi,
    /// 價格序列來源: date, close, open, high, low, volume
    Price,
}

impl SchemaKind {
    /// 取得對應的表結構
    pub fn schema(&self) -> TableSchema {
        match self {
            SchemaKind::Pmi => TableSchema {
                columns: &PMI_COLUMNS,
            },
            SchemaKind::Price => TableSchema {
                columns: &PRICE_COLUMNS,
            },
        }
    }
}

const PMI_COLUMNS: [ColumnDef; 4] = [
    ColumnDef::new("date", ColumnType::Date),
    ColumnDef::new("actual_state", ColumnType::Float),
    ColumnDef::new("close", ColumnType::Float),
    ColumnDef::new("forecast", ColumnType::Float),
];

const PRICE_COLUMNS: [ColumnDef; 6] = [
    ColumnDef::new("date", ColumnType::Date),
    ColumnDef::new("close", ColumnType::Float),
    ColumnDef::new("open", ColumnType::Float),
    ColumnDef::new("high", ColumnType::Float),
    ColumnDef::new("low", ColumnType::Float),
    ColumnDef::new("volume", ColumnType::Float),
];

/// 有序的欄位結構
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: &'static [ColumnDef],
}

impl TableSchema {
    /// 欄位列表（宣告順序）
    pub fn columns(&self) -> &[ColumnDef] {
        self.columns
    }

    /// 欄位名稱列表，用於 CSV 標題行與 COPY 欄位清單
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmi_schema_order() {
        let schema = SchemaKind::Pmi.schema();
        assert_eq!(
            schema.column_names(),
            vec!["date", "actual_state", "close", "forecast"]
        );
        assert_eq!(schema.columns()[0].ty, ColumnType::Date);
    }

    #[test]
    fn test_price_schema_order() {
        let schema = SchemaKind::Price.schema();
        assert_eq!(
            schema.column_names(),
            vec!["date", "close", "open", "high", "low", "volume"]
        );
    }

    #[test]
    fn test_sql_types() {
        assert_eq!(ColumnType::Date.sql_type(), "DATE");
        assert_eq!(ColumnType::Float.sql_type(), "DOUBLE PRECISION");
    }
}
