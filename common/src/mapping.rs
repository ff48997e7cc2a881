//! convênio → 請求チャネル（faturamento）のマッピング表
//!
//! 表は常に丸ごと読み書きする。部分更新は行わず、
//! 呼び出し側が読み込み → 編集 → 一括保存を担う。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 請求チャネル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "AMHPDF")]
    Amhpdf,
    #[serde(rename = "HOSPITAL")]
    Hospital,
    #[serde(rename = "DIRETO")]
    Direto,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Amhpdf, Channel::Hospital, Channel::Direto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Amhpdf => "AMHPDF",
            Channel::Hospital => "HOSPITAL",
            Channel::Direto => "DIRETO",
        }
    }

    /// 文字列からチャネルを取得（空文字列・不明な値は `None`）
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Channel::parse(s).ok_or_else(|| {
            format!("Unknown channel: {}. Use AMHPDF, HOSPITAL, or DIRETO", s)
        })
    }
}

/// 保存形式（キー → チャネル名、未設定は空文字列）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMapping(pub BTreeMap<String, Option<String>>);

/// convênioマッピング表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMapping", into = "RawMapping")]
pub struct ConvenioMapping {
    entries: BTreeMap<String, Option<Channel>>,
}

impl From<RawMapping> for ConvenioMapping {
    /// 読み込み時に整形: 空キーは捨て、不明なチャネルは未設定にする
    fn from(raw: RawMapping) -> Self {
        let entries = raw
            .0
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.trim().to_string();
                if key.is_empty() {
                    return None;
                }
                let channel = value.as_deref().and_then(Channel::parse);
                Some((key, channel))
            })
            .collect();
        Self { entries }
    }
}

impl From<ConvenioMapping> for RawMapping {
    fn from(mapping: ConvenioMapping) -> Self {
        RawMapping(
            mapping
                .entries
                .into_iter()
                .map(|(key, channel)| {
                    let value = channel.map(|c| c.as_str()).unwrap_or_default();
                    (key, Some(value.to_string()))
                })
                .collect(),
        )
    }
}

impl ConvenioMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 割り当て済みチャネル（未登録・未設定は `None`）
    pub fn channel_for(&self, key: &str) -> Option<Channel> {
        self.entries.get(key).copied().flatten()
    }

    /// エントリを設定（空キーは無視）
    pub fn set(&mut self, key: &str, channel: Option<Channel>) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        self.entries.insert(key.to_string(), channel);
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<Channel>> {
        self.entries.remove(key.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Channel>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 表示用: キーの大文字小文字を無視した順
    pub fn sorted_entries(&self) -> Vec<(&str, Option<Channel>)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(key, _)| key.to_lowercase());
        entries
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let mapping: Self = serde_json::from_str(json)?;
        Ok(mapping)
    }

    /// 整形済みJSONに変換
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 割り当てバッチを適用した新しい表を返す
    ///
    /// 未登録または未設定のキーのみ更新し、既存のチャネルは上書きしない。
    pub fn with_assignments(&self, batch: &[ChannelAssignment]) -> Self {
        let mut updated = self.clone();
        for assignment in batch {
            let key = assignment.convenio_key.trim();
            if key.is_empty() || updated.channel_for(key).is_some() {
                continue;
            }
            updated.set(key, assignment.channel);
        }
        updated
    }
}

/// 1件分のチャネル割り当て
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAssignment {
    pub convenio_key: String,
    pub channel: Option<Channel>,
}

/// 未割り当てキーから割り当て候補を作る（チャネルは未設定）
pub fn pending_assignments(unmapped: &BTreeSet<String>) -> Vec<ChannelAssignment> {
    unmapped
        .iter()
        .map(|key| ChannelAssignment {
            convenio_key: key.clone(),
            channel: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parse() {
        assert_eq!(Channel::parse("DIRETO"), Some(Channel::Direto));
        assert_eq!(Channel::parse(" amhpdf "), Some(Channel::Amhpdf));
        assert_eq!(Channel::parse(""), None);
        assert_eq!(Channel::parse("OUTRO"), None);
        assert!("hospital".parse::<Channel>().is_ok());
        assert!("x".parse::<Channel>().is_err());
    }

    #[test]
    fn test_from_json_cleans_entries() {
        let json = r#"{
            "BRADESCO - DIRETO": "DIRETO",
            "AMIL": "",
            "CASSI": null,
            "GEAP": "INVALIDO",
            "  ": "HOSPITAL"
        }"#;
        let mapping = ConvenioMapping::from_json(json).unwrap();

        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.channel_for("BRADESCO - DIRETO"), Some(Channel::Direto));
        assert!(mapping.contains("AMIL"));
        assert_eq!(mapping.channel_for("AMIL"), None);
        assert_eq!(mapping.channel_for("CASSI"), None);
        assert_eq!(mapping.channel_for("GEAP"), None);
    }

    #[test]
    fn test_to_json_writes_empty_string_for_unassigned() {
        let mut mapping = ConvenioMapping::new();
        mapping.set("A", Some(Channel::Hospital));
        mapping.set("B", None);

        let json = mapping.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["A"], "HOSPITAL");
        assert_eq!(value["B"], "");

        let reloaded = ConvenioMapping::from_json(&json).unwrap();
        assert_eq!(reloaded, mapping);
    }

    #[test]
    fn test_with_assignments_keeps_existing_channels() {
        let mut mapping = ConvenioMapping::new();
        mapping.set("A", Some(Channel::Direto));
        mapping.set("B", None);

        let batch = vec![
            ChannelAssignment { convenio_key: "A".into(), channel: Some(Channel::Hospital) },
            ChannelAssignment { convenio_key: "B".into(), channel: Some(Channel::Amhpdf) },
            ChannelAssignment { convenio_key: "C".into(), channel: None },
            ChannelAssignment { convenio_key: " ".into(), channel: Some(Channel::Direto) },
        ];
        let updated = mapping.with_assignments(&batch);

        assert_eq!(updated.channel_for("A"), Some(Channel::Direto));
        assert_eq!(updated.channel_for("B"), Some(Channel::Amhpdf));
        assert!(updated.contains("C"));
        assert_eq!(updated.len(), 3);
        // 元の表は変更されない
        assert_eq!(mapping.channel_for("B"), None);
        assert!(!mapping.contains("C"));
    }

    #[test]
    fn test_pending_assignments() {
        let unmapped: BTreeSet<String> = ["B".to_string(), "A".to_string()].into();
        let pending = pending_assignments(&unmapped);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].convenio_key, "A");
        assert!(pending.iter().all(|a| a.channel.is_none()));
    }

    #[test]
    fn test_sorted_entries_case_insensitive() {
        let mut mapping = ConvenioMapping::new();
        mapping.set("b", None);
        mapping.set("A", None);
        mapping.set("C", None);
        let keys: Vec<&str> = mapping.sorted_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "b", "C"]);
    }
}
