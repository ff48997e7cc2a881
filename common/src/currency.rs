//! ブラジル通貨（BRL）表記の数値変換
//!
//! `"R$ 1.234,56"` のような表記を数値に変換する。変換できない値は
//! 例外にせず 0 として扱う（0 は「本当に0」と「変換失敗」の両方を意味しうる）。

use crate::grid::Cell;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// 通貨記号
const CURRENCY_SYMBOL: &str = "R$";

/// セル値を金額に変換
///
/// - 空セル・NaN → 0
/// - 数値セル → そのまま
/// - 文字列セル → [`parse_brl_str`]
pub fn parse_brl_value(cell: &Cell) -> f64 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) => 0.0,
        Cell::Text(s) => parse_brl_str(s),
    }
}

/// BRL表記の文字列を金額に変換
///
/// 千の位区切り `.` を除去し、小数点 `,` を `.` に置換してからパースする。
/// 小数点の `,` は高々1つである前提。
///
/// # Examples
/// ```
/// use faturamento_common::currency::parse_brl_str;
///
/// assert_eq!(parse_brl_str("1.234,56"), 1234.56);
/// assert_eq!(parse_brl_str("R$ 10,00"), 10.0);
/// assert_eq!(parse_brl_str("abc"), 0.0);
/// ```
pub fn parse_brl_str(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let without_symbol = trimmed
        .strip_prefix(CURRENCY_SYMBOL)
        .unwrap_or(trimmed)
        .trim();
    let normalized = without_symbol.replace('.', "").replace(',', ".");

    match normalized.parse::<f64>() {
        // "inf" や "NaN" もパースできてしまうので除外
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// 金額を10進数に変換（集計用）
///
/// f64の最短表記から作るため、`0.1` は2進誤差なしの `0.1` になる。
/// 10進数の範囲を超える値は符号に応じて最大・最小値に丸める。
pub fn to_decimal(amount: f64) -> Decimal {
    if !amount.is_finite() {
        return Decimal::ZERO;
    }

    match Decimal::from_str(&amount.to_string()) {
        Ok(value) => value,
        Err(_) if amount.abs() < 1.0 => Decimal::ZERO,
        Err(_) if amount < 0.0 => Decimal::MIN,
        Err(_) => Decimal::MAX,
    }
}

/// 10進数を表示・出力用のf64に戻す
pub fn from_decimal(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// 金額をBRL表記に整形（`R$ 1.234,56`）
pub fn format_brl(amount: f64) -> String {
    let rounded = to_decimal(amount)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let units = abs.trunc().to_u128().unwrap_or_default();
    let fraction = (abs.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or_default();

    format!("R$ {}{},{:02}", sign, group_thousands(units), fraction)
}

/// 3桁ごとに `.` を挿入
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}
