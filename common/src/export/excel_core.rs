//! Excel生成（共通ライブラリ）
//!
//! シート1「Totais por guia」にガイド別合計、シート2「Resumo」にチャネル別合計と
//! レポート記載合計との差額を出力する。

use super::GUIDE_TABLE_HEADERS;
use crate::aggregator::AggregateReport;
use crate::error::{Error, Result};
use rust_xlsxwriter::*;

const MONEY_FORMAT: &str = "\"R$\" #,##0.00";

/// 集計結果をExcelバッファに生成
pub fn generate_excel_buffer(report: &AggregateReport) -> Result<Vec<u8>> {
    build_workbook(report).map_err(|e| Error::Excel(e.to_string()))
}

fn build_workbook(report: &AggregateReport) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let money_format = Format::new().set_num_format(MONEY_FORMAT);
    let label_format = Format::new().set_bold();

    // ガイド別合計
    let guides_sheet = workbook.add_worksheet();
    guides_sheet.set_name("Totais por guia")?;

    for (col, header) in GUIDE_TABLE_HEADERS.iter().enumerate() {
        guides_sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, guide) in report.guides.iter().enumerate() {
        let row = (i + 1) as u32;
        guides_sheet.write_string(row, 0, guide.guide_id.as_deref().unwrap_or(""))?;
        guides_sheet.write_string(row, 1, guide.convenio_key.as_str())?;
        guides_sheet.write_number_with_format(row, 2, guide.total, &money_format)?;
        guides_sheet.write_string(row, 3, guide.channel.map(|c| c.as_str()).unwrap_or(""))?;
    }

    guides_sheet.set_column_width(0, 14)?;
    guides_sheet.set_column_width(1, 40)?;
    guides_sheet.set_column_width(2, 16)?;
    guides_sheet.set_column_width(3, 14)?;

    // サマリー
    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name("Resumo")?;

    let mut row = 0u32;
    for (label, total) in report.summary.buckets() {
        summary_sheet.write_string_with_format(row, 0, format!("Total via {}", label), &label_format)?;
        summary_sheet.write_number_with_format(row, 1, total, &money_format)?;
        row += 1;
    }

    summary_sheet.write_string_with_format(row, 0, "Total (calculado)", &label_format)?;
    summary_sheet.write_number_with_format(row, 1, report.computed_total, &money_format)?;
    row += 1;

    if let (Some(declared), Some(delta)) = (report.report_total, report.delta) {
        summary_sheet.write_string_with_format(row, 0, "Total (informado no relatório)", &label_format)?;
        summary_sheet.write_number_with_format(row, 1, declared, &money_format)?;
        row += 1;
        summary_sheet.write_string_with_format(row, 0, "Diferença (calculado - informado)", &label_format)?;
        summary_sheet.write_number_with_format(row, 1, delta, &money_format)?;
    }

    summary_sheet.set_column_width(0, 36)?;
    summary_sheet.set_column_width(1, 18)?;

    workbook.save_to_buffer()
}
