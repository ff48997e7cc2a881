//! faturamento: Atendimentosレポートの集計CLI
//!
//! 解析・集計の本体は `faturamento-common`。このクレートはファイル読み込み、
//! マッピング表の保存先、設定、対話入力、出力を担う。

pub mod assign;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod reader;
pub mod store;
pub mod summary;
