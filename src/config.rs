use crate::error::{BillingError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAPPING_PATH: &str = "data/convenios_faturamento.json";
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub github_branch: String,
    pub mapping_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_repo: None,
            github_branch: DEFAULT_BRANCH.into(),
            mapping_path: DEFAULT_MAPPING_PATH.into(),
        }
    }
}

/// GitHub保存に必要な設定一式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    pub token: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BillingError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("faturamento").join("config.json"))
    }

    /// 環境変数を優先（GITHUB_TOKEN / GITHUB_REPO / GITHUB_BRANCH / CONVENIOS_PATH）
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("GITHUB_TOKEN") {
            self.github_token = Some(token);
        }
        if let Some(repo) = non_empty("GITHUB_REPO") {
            self.github_repo = Some(repo);
        }
        if let Some(branch) = non_empty("GITHUB_BRANCH") {
            self.github_branch = branch;
        }
        if let Some(path) = non_empty("CONVENIOS_PATH") {
            self.mapping_path = path;
        }
        self
    }

    /// トークンとリポジトリが揃っている場合のみGitHub設定を返す
    pub fn github(&self) -> Option<GithubSettings> {
        let token = self.github_token.as_deref().filter(|t| !t.is_empty())?;
        let repo = self.github_repo.as_deref().filter(|r| !r.is_empty())?;

        Some(GithubSettings {
            token: token.to_string(),
            repo: repo.to_string(),
            branch: self.github_branch.clone(),
            path: self.mapping_path.clone(),
        })
    }

    pub fn local_mapping_path(&self) -> PathBuf {
        PathBuf::from(&self.mapping_path)
    }
}
