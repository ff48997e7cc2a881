//! ガイド別集計のファイル出力

use crate::error::{BillingError, Result};
use faturamento_common::export::{csv_core, excel_core};
use faturamento_common::AggregateReport;
use std::path::{Path, PathBuf};

pub const CSV_FILE_NAME: &str = "totais_por_guia.csv";
pub const EXCEL_FILE_NAME: &str = "totais_por_guia.xlsx";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl ExportFormat {
    fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

/// 集計結果を出力ディレクトリに書き出し、作成したファイルを返す
pub fn export_report(
    report: &AggregateReport,
    format: ExportFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if format.includes_csv() {
        let path = output_dir.join(CSV_FILE_NAME);
        println!("- CSVを生成中...");
        let buffer = csv_core::generate_csv_buffer(&report.guides)
            .map_err(|e| BillingError::ExportFailed(e.to_string()))?;
        std::fs::write(&path, buffer)?;
        println!("✔ CSV出力: {}", path.display());
        written.push(path);
    }

    if format.includes_excel() {
        let path = output_dir.join(EXCEL_FILE_NAME);
        println!("- Excelを生成中...");
        let buffer = excel_core::generate_excel_buffer(report)
            .map_err(|e| BillingError::ExportFailed(e.to_string()))?;
        std::fs::write(&path, buffer)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}
