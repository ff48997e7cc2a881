//! Export core modules shared by the CLI writers.
//!
//! ガイド別集計をバイト列（CSV / Excel）に変換する。ファイル書き込みは呼び出し側。

pub mod csv_core;

#[cfg(feature = "excel")]
pub mod excel_core;

/// ガイド別テーブルの列見出し
pub const GUIDE_TABLE_HEADERS: [&str; 4] = ["Nr. Guia", "Convênio", "Total da Guia", "Faturamento"];
