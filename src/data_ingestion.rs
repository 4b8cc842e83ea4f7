/// 資料攝取模組
///
/// 每個數據源的控制流都是線性的：抓取 → 萃取 → 標準化。
/// 標準化後的記錄交由 `storage` 模組持久化。
// 宣告子模組
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod normalizer;
pub mod processor;

// 重新導出常用組件
pub use error::{IngestError, IngestResult};
pub use extractor::RawCalendarRow;
pub use processor::IngestionProcessor;
