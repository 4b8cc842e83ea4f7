/// 領域類型模組
///
/// 定義指標記錄、價格K線與各數據源的固定輸出表結構。
// 宣告子模組
pub mod record;
pub mod schema;
pub mod source;

// 重新導出常用組件
pub use record::{IndicatorRecord, PriceBar};
pub use schema::{ColumnDef, ColumnType, SchemaKind, TableSchema};
pub use source::SourceId;
