//! レポート構造の検出
//!
//! グリッド内を走査して、位置が固定されていないヘッダー行と
//! （あれば）レポート末尾の合計行を見つける。

use crate::currency::parse_brl_str;
use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// ヘッダー行の先頭セル（小文字化して比較）
pub const HEADER_SENTINEL: &str = "atendimento";

/// ガイド列見出しの表記ゆれ（小文字）
pub const GUIDE_LABELS: [&str; 2] = ["nr. guia", "nº guia"];

/// 合計行の目印（小文字）
pub const TOTAL_MARKER: &str = "total r$";

/// 検出したレポート構造
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLayout {
    pub header_row: usize,
    pub total_row: Option<usize>,
    pub total_value: Option<f64>,
}

/// ヘッダー行と合計行を検出
///
/// ヘッダー行が見つからない場合は [`Error::HeaderNotFound`]。
/// 合計行がないのは正常（`total_row`/`total_value` とも `None`）。
pub fn locate_report(grid: &Grid) -> Result<ReportLayout> {
    let header_row = find_header_row(grid);
    let (total_row, total_value) = find_total_row(grid);

    let header_row = header_row.ok_or(Error::HeaderNotFound)?;
    log::debug!(
        "ヘッダー行: {}, 合計行: {:?}, 合計値: {:?}",
        header_row,
        total_row,
        total_value
    );

    Ok(ReportLayout {
        header_row,
        total_row,
        total_value,
    })
}

/// 最初のヘッダー行を探す
pub fn find_header_row(grid: &Grid) -> Option<usize> {
    grid.rows().position(is_header_row)
}

/// ヘッダー行の判定
///
/// 先頭セルが「Atendimento」で、行内のいずれかのセルにガイド列の見出しがあること。
fn is_header_row(row: &[Cell]) -> bool {
    let first = match row.first().and_then(Cell::as_text) {
        Some(text) => text,
        None => return false,
    };
    if first.trim().to_lowercase() != HEADER_SENTINEL {
        return false;
    }

    let joined = row
        .iter()
        .filter(|c| !c.is_null())
        .map(Cell::to_text)
        .collect::<Vec<_>>()
        .join(" | ")
        .to_lowercase();

    GUIDE_LABELS.iter().any(|label| joined.contains(label))
}

/// 合計行を探し、合計値を取り出す
///
/// 行インデックスは見つかったが数値部分が取れない場合、合計値は `None`。
pub fn find_total_row(grid: &Grid) -> (Option<usize>, Option<f64>) {
    for (index, row) in grid.rows().enumerate() {
        let marker_cell = row
            .iter()
            .filter_map(Cell::as_text)
            .find(|text| text.to_lowercase().contains(TOTAL_MARKER));

        if let Some(text) = marker_cell {
            return (Some(index), extract_total_value(text));
        }
    }

    (None, None)
}

/// 「Total R$ 1.234,56」から末尾の金額部分を取り出す
fn extract_total_value(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref TOTAL_RE: Regex = Regex::new(r"(?i)total\s*r\$\s*(.*)$").unwrap();
    }

    TOTAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_brl_str(m.as_str()))
}
