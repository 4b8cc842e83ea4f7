//! 抓取 CLI
//!
//! 依序執行選定數據源的抓取流程，把標準化結果寫成輸出目錄下的
//! CSV 檔。單一來源失敗只記錄錯誤，不影響其他來源。

use anyhow::Result;
use clap::{Parser, ValueEnum};
use indicator_pipeline::config;
use indicator_pipeline::data_ingestion::IngestionProcessor;
use indicator_pipeline::domain_types::SourceId;
use indicator_pipeline::logging::init_logging;
use indicator_pipeline::storage::csv_writer;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// 可選的抓取目標
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    /// Caixin 服務業 PMI（日曆頁）
    Caixin,
    /// Caixin 服務業 PMI（TSV 匯出）
    CaixinExport,
    /// ISM 非製造業 PMI（分頁歷史）
    Ism,
    /// 美元/人民幣月線
    UsdCny,
    /// 所有來源
    All,
}

impl SourceArg {
    fn matches(&self, source: SourceId) -> bool {
        matches!(
            (self, source),
            (SourceArg::All, _)
                | (SourceArg::Caixin, SourceId::CaixinInvesting)
                | (SourceArg::CaixinExport, SourceId::CaixinExport)
                | (SourceArg::Ism, SourceId::IsmInvesting)
                | (SourceArg::UsdCny, SourceId::UsdCny)
        )
    }
}

#[derive(Debug, Parser)]
#[command(name = "scrape", about = "抓取宏觀指標數據並輸出 CSV")]
struct Cli {
    /// 要抓取的數據源
    #[arg(long, value_enum, default_value_t = SourceArg::All)]
    source: SourceArg,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置與日誌系統
    let app_config = config::init_config()?;
    init_logging(&app_config.log)?;

    let output_dir = Path::new(&app_config.output.directory);
    fs::create_dir_all(output_dir)?;

    let processor = IngestionProcessor::new(app_config.sources.clone());

    if cli.source.matches(SourceId::CaixinInvesting) {
        scrape_calendar(&processor, SourceId::CaixinInvesting, output_dir).await;
    }

    if cli.source.matches(SourceId::IsmInvesting) {
        scrape_calendar(&processor, SourceId::IsmInvesting, output_dir).await;
    }

    if cli.source.matches(SourceId::CaixinExport) {
        match processor.export_records().await {
            Ok(records) if !records.is_empty() => {
                let path = output_dir.join(SourceId::CaixinExport.output_file());
                if let Err(e) = csv_writer::write_export_csv(&path, &records) {
                    error!("寫出 {} 失敗: {}", SourceId::CaixinExport, e);
                }
            }
            Ok(_) => warn!("{} 沒有可輸出的記錄", SourceId::CaixinExport),
            Err(e) => error!("{} 抓取失敗: {}", SourceId::CaixinExport, e),
        }
    }

    if cli.source.matches(SourceId::UsdCny) {
        match processor.price_bars().await {
            Ok(bars) if !bars.is_empty() => {
                let path = output_dir.join(SourceId::UsdCny.output_file());
                info!(
                    "價格序列: {} 根 K線，{} 到 {}",
                    bars.len(),
                    bars[0].date,
                    bars[bars.len() - 1].date
                );
                if let Err(e) = csv_writer::write_price_csv(&path, &bars) {
                    error!("寫出 {} 失敗: {}", SourceId::UsdCny, e);
                }
            }
            Ok(_) => warn!("{} 沒有可輸出的 K線", SourceId::UsdCny),
            Err(e) => error!("{} 抓取失敗: {}", SourceId::UsdCny, e),
        }
    }

    info!("抓取流程結束");
    Ok(())
}

/// 跑一個日曆來源並寫出 PMI 格式的 CSV
async fn scrape_calendar(processor: &IngestionProcessor, source: SourceId, output_dir: &Path) {
    let result = match source {
        SourceId::CaixinInvesting => processor.caixin_records().await,
        SourceId::IsmInvesting => processor.ism_records().await,
        _ => unreachable!("非日曆來源"),
    };

    match result {
        Ok(records) if !records.is_empty() => {
            let path = output_dir.join(source.output_file());
            if let Err(e) = csv_writer::write_pmi_csv(&path, &records) {
                error!("寫出 {} 失敗: {}", source, e);
            }
        }
        Ok(_) => warn!("{} 沒有可輸出的記錄", source),
        Err(e) => error!("{} 抓取失敗: {}", source, e),
    }
}
