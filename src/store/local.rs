use super::{MappingSnapshot, MappingStore};
use crate::error::Result;
use faturamento_common::ConvenioMapping;
use std::path::{Path, PathBuf};

/// ローカルJSONファイル
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for LocalStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<MappingSnapshot> {
        if !self.path.exists() {
            log::debug!("マッピングファイルなし、空の表を使用: {}", self.path.display());
            return Ok(MappingSnapshot::empty());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mapping = if content.trim().is_empty() {
            ConvenioMapping::new()
        } else {
            ConvenioMapping::from_json(&content)?
        };

        log::debug!("マッピング読み込み: {}件 ({})", mapping.len(), self.path.display());
        Ok(MappingSnapshot {
            mapping,
            version: None,
        })
    }

    fn save(&self, mapping: &ConvenioMapping, _version: Option<&str>) -> Result<MappingSnapshot> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = mapping.to_json_pretty()?;
        std::fs::write(&self.path, json)?;

        Ok(MappingSnapshot {
            mapping: mapping.clone(),
            version: None,
        })
    }
}
