//! レポート本体の抽出
//!
//! 検出したヘッダー行を列名として使い、ヘッダー直後から合計行の手前までを
//! [`AttendanceRecord`] の列に変換する。

use crate::currency::parse_brl_value;
use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::locator::{locate_report, ReportLayout};
use crate::normalizer::normalize_convenio;
use crate::types::{AttendanceRecord, ReportStats};
use serde::{Deserialize, Serialize};

pub const COL_ATENDIMENTO: &str = "Atendimento";
pub const COL_OPERADORA: &str = "Operadora";
pub const COL_VALOR_TOTAL: &str = "Valor Total";
pub const COL_GUIA: &str = "Nr. Guia";

/// ガイド列の別表記（ヘッダー検出と同じ表記ゆれを許容）
const COL_GUIA_ALT: &str = "Nº Guia";

/// ヘッダー行の列インデックス → 列名（左から順）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderMap {
    columns: Vec<(usize, String)>,
}

impl HeaderMap {
    /// ヘッダー行から作成（空白セルは除外）
    pub fn from_row(row: &[Cell]) -> Self {
        let columns = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_blank())
            .map(|(index, cell)| (index, cell.to_text().trim().to_string()))
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 列名の一覧
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, name)| name.as_str())
    }

    /// 列名から元グリッドの列インデックスを取得（重複時は最初の列）
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(_, column)| column == name)
            .map(|(index, _)| *index)
    }

    /// 必須列のインデックス（なければ [`Error::ColumnMissing`]）
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::ColumnMissing(name.to_string()))
    }

    fn guide_column(&self) -> Result<usize> {
        self.index_of(COL_GUIA)
            .or_else(|| self.index_of(COL_GUIA_ALT))
            .ok_or_else(|| Error::ColumnMissing(COL_GUIA.to_string()))
    }

    fn slice_row(&self, row: &[Cell]) -> Vec<Cell> {
        self.columns
            .iter()
            .map(|(index, _)| row.get(*index).cloned().unwrap_or_default())
            .collect()
    }
}

/// 解析済みレポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReport {
    pub layout: ReportLayout,
    pub header: HeaderMap,
    pub records: Vec<AttendanceRecord>,
    /// レポートに記載された合計（なければ `None`）
    pub report_total: Option<f64>,
}

impl ParsedReport {
    pub fn stats(&self) -> ReportStats {
        ReportStats::from_records(&self.records)
    }
}

/// グリッドからレポートを解析（構造検出＋抽出）
pub fn parse_grid(grid: &Grid) -> Result<ParsedReport> {
    let layout = locate_report(grid)?;
    extract_records(grid, &layout)
}

/// 検出済みの構造を使ってレコードを抽出
///
/// ガイド番号が空で金額が0の行はノイズとして除外する。
pub fn extract_records(grid: &Grid, layout: &ReportLayout) -> Result<ParsedReport> {
    let header = HeaderMap::from_row(grid.row(layout.header_row));

    let convenio_col = header.require(COL_OPERADORA)?;
    let amount_col = header.require(COL_VALOR_TOTAL)?;
    let guide_col = header.guide_column()?;

    let start = layout.header_row + 1;
    let end = layout.total_row.unwrap_or(grid.len());

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row_index in start..end {
        let guide_id = guide_text(grid.cell(row_index, guide_col));
        let amount = parse_brl_value(grid.cell(row_index, amount_col));

        if guide_id.is_none() && amount == 0.0 {
            dropped += 1;
            continue;
        }

        let convenio_raw = grid.cell(row_index, convenio_col).to_text().trim().to_string();
        let convenio_key = normalize_convenio(&convenio_raw);

        records.push(AttendanceRecord {
            source_row: row_index,
            guide_id,
            convenio_raw,
            convenio_key,
            amount,
            cells: header.slice_row(grid.row(row_index)),
        });
    }

    log::debug!(
        "抽出: {}行（ノイズ除外 {}行）、範囲 {}..{}",
        records.len(),
        dropped,
        start,
        end
    );

    Ok(ParsedReport {
        layout: *layout,
        header,
        records,
        report_total: layout.total_value,
    })
}

/// ガイド番号セルを文字列化（欠損・空白は `None`）
fn guide_text(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.to_text().trim().to_string())
    }
}
