//! 集計結果の表示

use faturamento_common::{format_brl, AggregateReport, ReportStats};
use std::fmt::Write;

/// 集計サマリーを表示用テキストにする
///
/// `top` 件のガイドを合計の大きい順に並べる（0なら全件）。
pub fn render_summary(stats: &ReportStats, report: &AggregateReport, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "集計:");
    let _ = writeln!(out, "  行数: {}", stats.rows);
    let _ = writeln!(out, "  Convênios: {}", stats.unique_convenios);
    let _ = writeln!(out, "  Guias: {}", stats.unique_guides);

    let _ = writeln!(out, "\n請求チャネル別:");
    for (label, total) in report.summary.buckets() {
        let _ = writeln!(out, "  {:<9} {:>18}", label, format_brl(total));
    }

    let _ = writeln!(out, "\n  計算合計     {:>18}", format_brl(report.computed_total));
    match (report.report_total, report.delta) {
        (Some(declared), Some(delta)) => {
            let _ = writeln!(out, "  レポート記載 {:>18}", format_brl(declared));
            let _ = writeln!(out, "  差額（計算 − 記載） {}", format_brl(delta));
        }
        _ => {
            let _ = writeln!(out, "  レポート記載 (合計行なし)");
        }
    }

    let guides = report.guides_by_total_desc();
    let shown = if top == 0 { guides.len() } else { top.min(guides.len()) };
    if shown > 0 {
        let _ = writeln!(out, "\nガイド別合計（上位{}件 / {}件）:", shown, guides.len());
        for guide in guides.iter().take(shown) {
            let _ = writeln!(
                out,
                "  {:<12} {:<32} {:>16}  {}",
                guide.guide_id.as_deref().unwrap_or("-"),
                guide.convenio_key,
                format_brl(guide.total),
                guide.channel.map(|c| c.as_str()).unwrap_or("")
            );
        }
    }

    out
}

/// チャネル未設定のconvênio一覧
pub fn render_unmapped(report: &AggregateReport) -> String {
    let mut out = String::new();
    if report.unmapped.is_empty() {
        return out;
    }

    let _ = writeln!(out, "⚠ チャネル未設定のconvênio（{}件）:", report.unmapped.len());
    for key in &report.unmapped {
        let _ = writeln!(out, "  - {}", key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use faturamento_common::{aggregate, AttendanceRecord, Channel, ConvenioMapping};

    fn report(report_total: Option<f64>) -> (ReportStats, AggregateReport) {
        let records: Vec<AttendanceRecord> = [("1", "A", 150.0), ("2", "B", 1200.5)]
            .iter()
            .map(|(guide, key, amount)| AttendanceRecord {
                guide_id: Some(guide.to_string()),
                convenio_raw: key.to_string(),
                convenio_key: key.to_string(),
                amount: *amount,
                ..Default::default()
            })
            .collect();
        let mut mapping = ConvenioMapping::new();
        mapping.set("A", Some(Channel::Direto));

        (
            ReportStats::from_records(&records),
            aggregate(&records, &mapping, report_total),
        )
    }

    #[test]
    fn test_summary_includes_buckets_and_delta() {
        let (stats, report) = report(Some(1400.0));
        let text = render_summary(&stats, &report, 10);

        assert!(text.contains("DIRETO"));
        assert!(text.contains("OUTROS"));
        assert!(text.contains("R$ 1.350,50"));
        assert!(text.contains("R$ 1.400,00"));
        assert!(text.contains("R$ -49,50"));
    }

    #[test]
    fn test_summary_top_limits_guides() {
        let (stats, report) = report(None);
        let text = render_summary(&stats, &report, 1);

        assert!(text.contains("上位1件 / 2件"));
        assert!(text.contains("R$ 1.200,50"));
        assert!(text.contains("合計行なし"));
    }

    #[test]
    fn test_render_unmapped() {
        let (_, report) = report(None);
        assert_eq!(render_unmapped(&report), "⚠ チャネル未設定のconvênio（1件）:\n  - B\n");
    }
}
