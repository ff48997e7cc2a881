//! 抽出結果の型定義
//!
//! - AttendanceRecord: レポート1行分の抽出結果
//! - ReportStats: 取り込み件数などの集計情報

use crate::grid::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// アテンダンス（診療）1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// 元グリッドでの行番号
    pub source_row: usize,

    /// ガイド番号（Nr. Guia）
    pub guide_id: Option<String>,

    /// Operadora列の値（前後空白除去のみ）
    pub convenio_raw: String,

    /// 正規化済みconvênioキー
    pub convenio_key: String,

    /// Valor Total（BRL）
    pub amount: f64,

    /// ヘッダーに並ぶ全列の値（HeaderMapと同じ順序）
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// 取り込み統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub rows: usize,
    pub unique_convenios: usize,
    pub unique_guides: usize,
}

impl ReportStats {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let convenios: HashSet<&str> = records
            .iter()
            .map(|r| r.convenio_key.as_str())
            .filter(|k| !k.is_empty())
            .collect();
        let guides: HashSet<&str> = records
            .iter()
            .filter_map(|r| r.guide_id.as_deref())
            .collect();

        Self {
            rows: records.len(),
            unique_convenios: convenios.len(),
            unique_guides: guides.len(),
        }
    }
}
