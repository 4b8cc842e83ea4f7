//! 攝取錯誤定義
//!
//! 封閉的三類錯誤：抓取、解析、載入。呼叫端據此
//! 區分可重試（抓取）與不可重試（解析）的失敗。

use thiserror::Error;

/// 攝取錯誤類型
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("抓取錯誤 [{source_name}]: {reason}")]
    Fetch { source_name: String, reason: String },

    #[error("解析錯誤: 欄位 {field}, 值 {value:?}, 原因: {reason}")]
    Parse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("載入錯誤 [{table}]: {reason}")]
    Load { table: String, reason: String },
}

impl IngestError {
    /// 建立抓取錯誤
    pub fn fetch(source_name: impl Into<String>, reason: impl ToString) -> Self {
        IngestError::Fetch {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// 建立解析錯誤
    pub fn parse(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        IngestError::Parse {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 建立載入錯誤
    pub fn load(table: impl Into<String>, reason: impl ToString) -> Self {
        IngestError::Load {
            table: table.into(),
            reason: reason.to_string(),
        }
    }

    /// 抓取錯誤可重試，解析與載入錯誤需人工介入
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::Fetch { .. })
    }
}

/// 攝取結果類型
pub type IngestResult<T> = Result<T, IngestError>;
