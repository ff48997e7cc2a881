//! GitHub contents API によるマッピング保存
//!
//! ファイル内容はbase64エンコードされたJSON。blobのshaをバージョントークンとし、
//! 古いshaでの書き込みはGitHub側で拒否される（409/422）。

use super::{MappingSnapshot, MappingStore};
use crate::config::GithubSettings;
use crate::error::{BillingError, Result};
use base64::Engine;
use faturamento_common::ConvenioMapping;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const COMMIT_MESSAGE: &str = "Atualiza cadastro de convênios (faturamento)";
const API_VERSION: &str = "2022-11-28";
const TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentInfo,
}

#[derive(Debug, Deserialize)]
struct PutContentInfo {
    sha: String,
}

pub struct GithubStore {
    http: Client,
    api_base: String,
    settings: GithubSettings,
}

impl GithubStore {
    pub fn new(settings: GithubSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("faturamento/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| BillingError::Config(format!("HTTPクライアントを作成できません: {}", e)))?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            settings,
        })
    }

    /// APIのベースURLを差し替える（GitHub Enterprise・テスト用）
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base,
            self.settings.repo,
            self.settings.path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.settings.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().map_err(|e| {
            if e.is_timeout() {
                BillingError::StoreUnreachable(format!("タイムアウト ({}秒)", TIMEOUT_SECS))
            } else {
                BillingError::StoreUnreachable(e.to_string())
            }
        })
    }
}

impl MappingStore for GithubStore {
    fn describe(&self) -> String {
        format!(
            "github:{}@{}/{}",
            self.settings.repo, self.settings.branch, self.settings.path
        )
    }

    fn load(&self) -> Result<MappingSnapshot> {
        let request = self
            .http
            .get(self.contents_url())
            .query(&[("ref", self.settings.branch.as_str())]);
        let response = self.send(self.authorized(request))?;

        let status = response.status().as_u16();
        if status == 404 {
            log::debug!("GitHub上にマッピングなし、空の表を使用: {}", self.describe());
            return Ok(MappingSnapshot::empty());
        }
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body));
        }

        let contents: ContentsResponse = response
            .json()
            .map_err(|e| BillingError::StoreResponse(e.to_string()))?;

        let mapping = decode_mapping(&contents)?;
        log::debug!("GitHubからマッピング読み込み: {}件 (sha {})", mapping.len(), contents.sha);

        Ok(MappingSnapshot {
            mapping,
            version: Some(contents.sha),
        })
    }

    fn save(&self, mapping: &ConvenioMapping, version: Option<&str>) -> Result<MappingSnapshot> {
        let json = mapping.to_json_pretty()?;
        let body = PutContentsRequest {
            message: COMMIT_MESSAGE,
            content: base64::engine::general_purpose::STANDARD.encode(json.as_bytes()),
            branch: &self.settings.branch,
            sha: version,
        };

        let request = self.http.put(self.contents_url()).json(&body);
        let response = self.send(self.authorized(request))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body));
        }

        let saved: PutContentsResponse = response
            .json()
            .map_err(|e| BillingError::StoreResponse(e.to_string()))?;

        log::debug!("GitHubへマッピング保存: {}件 (sha {})", mapping.len(), saved.content.sha);

        Ok(MappingSnapshot {
            mapping: mapping.clone(),
            version: Some(saved.content.sha),
        })
    }
}

fn decode_mapping(contents: &ContentsResponse) -> Result<ConvenioMapping> {
    match contents.encoding.as_deref() {
        Some("base64") | None => {}
        Some(other) => {
            return Err(BillingError::StoreResponse(format!(
                "未対応のエンコーディング: {}",
                other
            )))
        }
    }

    // GitHubは60文字ごとに改行を挟む
    let cleaned: String = contents
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| BillingError::StoreResponse(format!("base64: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| BillingError::StoreResponse(format!("UTF-8: {}", e)))?;

    if text.trim().is_empty() {
        return Ok(ConvenioMapping::new());
    }
    Ok(ConvenioMapping::from_json(&text)?)
}

/// HTTPステータスをエラー種別に変換
pub fn status_error(status: u16, body: String) -> BillingError {
    let detail = format!("HTTP {} {}", status, body.trim());
    match status {
        401 | 403 => BillingError::StoreAuth(detail),
        409 | 422 => BillingError::StoreConflict(detail),
        500..=599 => BillingError::StoreUnreachable(detail),
        _ => BillingError::StoreResponse(detail),
    }
}
