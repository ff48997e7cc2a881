//! convênio名の正規化
//!
//! 自由記述の convênio 名から、マッピング表のキーとして使う正規化済み文字列を作る。
//! 括弧内の登録コードは同一性に関係しないため除去する。

use regex::Regex;

/// convênio名をキーに正規化
///
/// 1. 前後の空白を除去
/// 2. 括弧で囲まれた部分（前後の空白ごと）を除去
/// 3. 連続する空白を1つにまとめる
///
/// # Examples
/// ```
/// use faturamento_common::normalize_convenio;
///
/// assert_eq!(normalize_convenio("BRADESCO - DIRETO(1001)"), "BRADESCO - DIRETO");
/// assert_eq!(normalize_convenio("  A   B  "), "A B");
/// ```
pub fn normalize_convenio(name: &str) -> String {
    lazy_static::lazy_static! {
        static ref PAREN_RE: Regex = Regex::new(r"\s*\([^)]*\)\s*").unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let trimmed = name.trim();
    let without_codes = PAREN_RE.replace_all(trimmed, "");
    SPACE_RE.replace_all(&without_codes, " ").into_owned()
}
