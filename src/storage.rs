/// 持久化模組
///
/// 兩種 sink：分隔符文字檔（CSV）與倉儲表（寫入即全量替換）。
// 宣告子模組
pub mod csv_writer;
pub mod database;
pub mod event;
pub mod warehouse;

// 重新導出常用組件
pub use event::{handle_storage_event, plan_load, StorageEvent};
pub use warehouse::{LoadJobState, LoadReport, WarehouseLoader};
