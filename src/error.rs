use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excelファイルを読み込めません: {0}")]
    Workbook(String),

    #[error("ワークシートがありません: {0}")]
    EmptyWorkbook(String),

    #[error("マッピング保存先に接続できません: {0}")]
    StoreUnreachable(String),

    #[error("マッピング保存先の認証に失敗しました: {0}。`faturamento config --set-github-token` を確認してください")]
    StoreAuth(String),

    #[error("マッピングが他で更新されています（再読み込みしてやり直してください）: {0}")]
    StoreConflict(String),

    #[error("マッピング保存先の応答が不正: {0}")]
    StoreResponse(String),

    #[error("エクスポートエラー: {0}")]
    ExportFailed(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] faturamento_common::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
