//! 數據源識別

use std::fmt;

/// 數據源識別碼
///
/// 每個數據源有自己的抓取策略、原始格式與固定的欄位佈局。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// Caixin 服務業 PMI（日曆頁，歷史表格）
    CaixinInvesting,
    /// Caixin 服務業 PMI（TSV 匯出端點）
    CaixinExport,
    /// ISM 非製造業 PMI（日曆頁，分頁歷史）
    IsmInvesting,
    /// 美元/人民幣月線價格序列
    UsdCny,
}

impl SourceId {
    /// 該來源日期欄位的固定解析格式
    ///
    /// 價格序列的日期來自 API 時間戳，不經字串解析，回傳 `None`。
    pub fn date_format(&self) -> Option<&'static str> {
        match self {
            SourceId::CaixinInvesting | SourceId::IsmInvesting => Some("%d.%m.%Y"),
            SourceId::CaixinExport => Some("%Y.%m.%d"),
            SourceId::UsdCny => None,
        }
    }

    /// 輸出 CSV 的檔案名稱
    pub fn output_file(&self) -> &'static str {
        match self {
            SourceId::CaixinInvesting => "Caixin_PMI.csv",
            SourceId::CaixinExport => "caixin_pmi_mql5_processed.csv",
            SourceId::IsmInvesting => "ism_services_pmi_full_eua.csv",
            SourceId::UsdCny => "USD_CNY.csv",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceId::CaixinInvesting => "caixin",
            SourceId::CaixinExport => "caixin-export",
            SourceId::IsmInvesting => "ism",
            SourceId::UsdCny => "usd-cny",
        };
        write!(f, "{}", name)
    }
}
