//! Faturamento Common Library
//!
//! アテンダンスレポート（Atendimentos Analítico）の解析と請求チャネル別集計。
//! ファイルやネットワークは扱わず、メモリ上のグリッドとマッピング表だけを入力とする。
//!
//! ## 処理フロー
//! 1. [`locator`]: ヘッダー行・合計行の検出
//! 2. [`extractor`]: 列の切り出しと金額・convênioキーの正規化
//! 3. [`aggregator`]: ガイド別集計、チャネル別サマリー、合計の突き合わせ

pub mod types;
pub mod grid;
pub mod currency;
pub mod normalizer;
pub mod locator;
pub mod extractor;
pub mod aggregator;
pub mod mapping;
pub mod error;
pub mod export;

pub use types::{AttendanceRecord, ReportStats};
pub use grid::{Cell, Grid};
pub use currency::{format_brl, parse_brl_str, parse_brl_value};
pub use normalizer::normalize_convenio;
pub use locator::{locate_report, ReportLayout};
pub use extractor::{extract_records, parse_grid, HeaderMap, ParsedReport};
pub use aggregator::{aggregate, AggregateReport, ChannelSummary, GuideAggregate};
pub use mapping::{pending_assignments, Channel, ChannelAssignment, ConvenioMapping};
pub use error::{Error, Result};
