//! Excelレポートの読み込み
//!
//! アップロードされたファイル（.xls / .xlsx）の先頭シートを
//! 型なしグリッドに変換し、共通ライブラリの解析に渡す。

use crate::error::{BillingError, Result};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use faturamento_common::{parse_grid, Cell, Grid, ParsedReport};
use std::io::Cursor;
use std::path::Path;

/// ワークブック形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// 旧形式（BIFF）
    Xls,
    Xlsx,
}

impl WorkbookFormat {
    /// ファイル名から形式を判定（`.xls` 以外はすべて xlsx 扱い）
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".xls") {
            WorkbookFormat::Xls
        } else {
            WorkbookFormat::Xlsx
        }
    }
}

/// ファイルバイト列からレポートを解析
pub fn parse_report(bytes: &[u8], filename_hint: &str) -> Result<ParsedReport> {
    let grid = read_grid(bytes, filename_hint)?;
    Ok(parse_grid(&grid)?)
}

/// ファイルパスからレポートを解析
pub fn parse_report_file(path: &Path) -> Result<ParsedReport> {
    if !path.exists() {
        return Err(BillingError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    parse_report(&bytes, &filename)
}

/// 先頭シートをグリッドに変換
pub fn read_grid(bytes: &[u8], filename_hint: &str) -> Result<Grid> {
    let cursor = Cursor::new(bytes.to_vec());

    let range = match WorkbookFormat::from_filename(filename_hint) {
        WorkbookFormat::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(cursor)
                .map_err(|e| BillingError::Workbook(format!("{}: {}", filename_hint, e)))?;
            first_sheet::<Cursor<Vec<u8>>, _>(workbook, filename_hint)?
        }
        WorkbookFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(cursor)
                .map_err(|e| BillingError::Workbook(format!("{}: {}", filename_hint, e)))?;
            first_sheet::<Cursor<Vec<u8>>, _>(workbook, filename_hint)?
        }
    };

    Ok(range_to_grid(&range))
}

fn first_sheet<RS, R>(mut workbook: R, filename_hint: &str) -> Result<Range<Data>>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BillingError::EmptyWorkbook(filename_hint.to_string()))?
        .map_err(|e| BillingError::Workbook(format!("{}: {}", filename_hint, e)))
}

/// calamineのRangeをシート座標のグリッドに変換
///
/// Rangeは最初のデータセルから始まるため、先頭の空行・空列を埋めて座標を揃える。
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Grid::default(),
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; col_offset];
        row.extend(data_row.iter().map(convert_cell));
        rows.push(row);
    }

    Grid::new(rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
