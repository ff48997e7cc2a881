//! convênioマッピング表の保存先
//!
//! 表は常に丸ごと読み書きする。保存先ごとの違い（ローカルファイル / GitHub）は
//! `MappingStore` トレイトの背後に隠す。

pub mod github;
pub mod local;

pub use github::GithubStore;
pub use local::LocalStore;

use crate::config::Config;
use crate::error::Result;
use faturamento_common::ConvenioMapping;

/// 読み込んだ表とバージョントークン
///
/// トークンはGitHubのblob sha。ローカルファイルには無い。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingSnapshot {
    pub mapping: ConvenioMapping,
    pub version: Option<String>,
}

impl MappingSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

pub trait MappingStore {
    /// 保存先の表示名
    fn describe(&self) -> String;

    /// 表全体を読み込む（未作成なら空の表）
    fn load(&self) -> Result<MappingSnapshot>;

    /// 表全体を書き込む
    ///
    /// `version` は読み込み時のトークン。保存先がより新しい版を持っていれば
    /// `StoreConflict` を返す。
    fn save(&self, mapping: &ConvenioMapping, version: Option<&str>) -> Result<MappingSnapshot>;
}

/// GitHubを正としつつ、ローカルにも写しを残す保存先
///
/// ローカル写しを更新するのはGitHub上の版が確定したときだけ。
/// GitHubにまだファイルがない場合はローカルの表をそのまま使う。
pub struct MirroredStore {
    local: LocalStore,
    remote: GithubStore,
}

impl MirroredStore {
    pub fn new(local: LocalStore, remote: GithubStore) -> Self {
        Self { local, remote }
    }
}

impl MappingStore for MirroredStore {
    fn describe(&self) -> String {
        format!("{}（ローカル写し: {}）", self.remote.describe(), self.local.describe())
    }

    fn load(&self) -> Result<MappingSnapshot> {
        let snapshot = self.remote.load()?;

        if snapshot.version.is_none() {
            // GitHub未作成: 次の保存で作成されるまでローカルの表を使う
            let local = self.local.load()?;
            log::debug!("GitHub上に表がないためローカルの表を使用: {}件", local.mapping.len());
            return Ok(MappingSnapshot {
                mapping: local.mapping,
                version: None,
            });
        }

        // 写しの更新失敗は読み込み結果に影響させない
        if let Err(e) = self.local.save(&snapshot.mapping, None) {
            log::warn!("ローカル写しを更新できません: {}", e);
        }

        Ok(snapshot)
    }

    fn save(&self, mapping: &ConvenioMapping, version: Option<&str>) -> Result<MappingSnapshot> {
        let saved = self.remote.save(mapping, version)?;
        self.local.save(mapping, None)?;
        Ok(saved)
    }
}

/// 設定に応じた保存先を開く
///
/// GitHubのトークンとリポジトリが揃っていればGitHub＋ローカル写し、
/// そうでなければローカルファイルのみ。
pub fn open_store(config: &Config) -> Result<Box<dyn MappingStore>> {
    let local = LocalStore::new(config.local_mapping_path());

    match config.github() {
        Some(settings) => {
            let remote = GithubStore::new(settings)?;
            Ok(Box::new(MirroredStore::new(local, remote)))
        }
        None => Ok(Box::new(local)),
    }
}
