//! ガイド別集計とチャネル別サマリー
//!
//! ## 処理フロー
//! 1. (ガイド番号, convênioキー) ごとに金額を合計
//! 2. マッピング表でチャネルを引き当て、チャネル別に合計
//! 3. レポート記載の合計と突き合わせ（差額は情報として返すのみ）
//!
//! 合計は10進数（`rust_decimal`）で積み上げるため、加算順序に依存せず
//! センタボ未満の端数も失わない。範囲を超える加算は最大値で頭打ちにする。

use crate::currency::{from_decimal, to_decimal};
use crate::mapping::{Channel, ConvenioMapping};
use crate::types::AttendanceRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// 未割り当てチャネルの表示名
pub const UNASSIGNED_LABEL: &str = "OUTROS";

/// ガイド×convênio単位の合計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideAggregate {
    pub guide_id: Option<String>,
    pub convenio_key: String,
    pub total: f64,
    pub channel: Option<Channel>,
}

/// チャネル別合計（10進数で保持）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSummary {
    amhpdf: Decimal,
    hospital: Decimal,
    direto: Decimal,
    unassigned: Decimal,
}

impl ChannelSummary {
    fn bucket_mut(&mut self, channel: Option<Channel>) -> &mut Decimal {
        match channel {
            Some(Channel::Amhpdf) => &mut self.amhpdf,
            Some(Channel::Hospital) => &mut self.hospital,
            Some(Channel::Direto) => &mut self.direto,
            None => &mut self.unassigned,
        }
    }

    fn add(&mut self, channel: Option<Channel>, amount: Decimal) {
        let bucket = self.bucket_mut(channel);
        *bucket = bucket.saturating_add(amount);
    }

    /// チャネル（`None` は未割り当て）の合計（10進数）
    pub fn exact_total_for(&self, channel: Option<Channel>) -> Decimal {
        match channel {
            Some(Channel::Amhpdf) => self.amhpdf,
            Some(Channel::Hospital) => self.hospital,
            Some(Channel::Direto) => self.direto,
            None => self.unassigned,
        }
    }

    /// 全チャネル（未割り当て含む）の合計（10進数）
    pub fn exact_total(&self) -> Decimal {
        self.amhpdf
            .saturating_add(self.hospital)
            .saturating_add(self.direto)
            .saturating_add(self.unassigned)
    }

    /// チャネル（`None` は未割り当て）の合計
    pub fn total_for(&self, channel: Option<Channel>) -> f64 {
        from_decimal(self.exact_total_for(channel))
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        self.total_for(Some(channel))
    }

    pub fn unassigned(&self) -> f64 {
        self.total_for(None)
    }

    /// 全チャネル（未割り当て含む）の合計
    pub fn total(&self) -> f64 {
        from_decimal(self.exact_total())
    }

    /// 表示用: 固定順（AMHPDF, HOSPITAL, DIRETO, OUTROS）のラベルと合計
    pub fn buckets(&self) -> [(&'static str, f64); 4] {
        [
            (Channel::Amhpdf.as_str(), self.channel(Channel::Amhpdf)),
            (Channel::Hospital.as_str(), self.channel(Channel::Hospital)),
            (Channel::Direto.as_str(), self.channel(Channel::Direto)),
            (UNASSIGNED_LABEL, self.unassigned()),
        ]
    }
}

/// 集計結果
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    /// ガイド番号順（数値として比較できるものは数値順、欠損は末尾）
    pub guides: Vec<GuideAggregate>,
    pub summary: ChannelSummary,
    pub computed_total: f64,
    pub report_total: Option<f64>,
    /// 計算値 − レポート記載値
    pub delta: Option<f64>,
    /// マッピング未登録または未設定のconvênioキー
    ///
    /// 空キー（Operadora欄が空の行）は割り当てようがないため含めない。
    /// その金額は未割り当て（OUTROS）に計上される。
    pub unmapped: BTreeSet<String>,
}

impl AggregateReport {
    /// 表示用: 合計の大きい順
    pub fn guides_by_total_desc(&self) -> Vec<&GuideAggregate> {
        let mut sorted: Vec<&GuideAggregate> = self.guides.iter().collect();
        sorted.sort_by(|a, b| b.total.total_cmp(&a.total));
        sorted
    }
}

/// グループキー
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupKey {
    guide_id: Option<String>,
    convenio_key: String,
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_guide_ids(self.guide_id.as_deref(), other.guide_id.as_deref())
            .then_with(|| self.convenio_key.cmp(&other.convenio_key))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ガイド番号の比較
///
/// 数値 < 文字列 < 欠損。数値同士が等しい場合は文字列で比較する。
pub fn compare_guide_ids(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        },
    }
}

/// レコードを集計してチャネル別サマリーを作る
///
/// 入力（レコード・マッピング表）は変更しない。
pub fn aggregate(
    records: &[AttendanceRecord],
    mapping: &ConvenioMapping,
    report_total: Option<f64>,
) -> AggregateReport {
    let mut groups: BTreeMap<GroupKey, Decimal> = BTreeMap::new();
    for record in records {
        let key = GroupKey {
            guide_id: record.guide_id.clone(),
            convenio_key: record.convenio_key.clone(),
        };
        let sum = groups.entry(key).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(to_decimal(record.amount));
    }

    let mut summary = ChannelSummary::default();
    let mut unmapped = BTreeSet::new();
    let mut guides = Vec::with_capacity(groups.len());

    for (key, sum) in groups {
        let channel = mapping.channel_for(&key.convenio_key);
        if channel.is_none() && !key.convenio_key.is_empty() {
            unmapped.insert(key.convenio_key.clone());
        }
        summary.add(channel, sum);
        guides.push(GuideAggregate {
            guide_id: key.guide_id,
            convenio_key: key.convenio_key,
            total: from_decimal(sum),
            channel,
        });
    }

    let exact_total = summary.exact_total();
    let computed_total = from_decimal(exact_total);
    let delta = report_total
        .map(|declared| from_decimal(exact_total.saturating_sub(to_decimal(declared))));

    if let Some(diff) = delta.filter(|d| *d != 0.0) {
        log::warn!("計算合計とレポート記載合計が一致しません（差額 {:.2}）", diff);
    }
    log::debug!(
        "集計: {}ガイド、未割り当てconvênio {}件",
        guides.len(),
        unmapped.len()
    );

    AggregateReport {
        guides,
        summary,
        computed_total,
        report_total,
        delta,
        unmapped,
    }
}
