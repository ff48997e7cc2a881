//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use faturamento_rust::error::BillingError;
use faturamento_rust::reader;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを解析した場合
#[test]
fn test_parse_nonexistent_file() {
    let result = reader::parse_report_file(Path::new("/nonexistent/path/relatorio.xls"));
    assert!(matches!(result, Err(BillingError::FileNotFound(_))));
}

/// Excelでないファイルを解析した場合
#[test]
fn test_parse_not_a_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("relatorio.xlsx");
    std::fs::write(&path, "Atendimento;Operadora;Valor Total").unwrap();

    let result = reader::parse_report_file(&path);
    assert!(matches!(result, Err(BillingError::Workbook(_))));
}

/// 拡張子が.xlsの場合は旧形式として読む
#[test]
fn test_parse_xls_hint_uses_legacy_reader() {
    let result = reader::parse_report(b"not a biff file", "RELATORIO.XLS");
    match result {
        Err(BillingError::Workbook(msg)) => assert!(msg.contains("RELATORIO.XLS")),
        other => panic!("expected Workbook error, got {:?}", other.map(|r| r.records.len())),
    }
}

/// BillingErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        BillingError::Config("テスト設定エラー".to_string()),
        BillingError::FileNotFound("relatorio.xls".to_string()),
        BillingError::Workbook("壊れたファイル".to_string()),
        BillingError::EmptyWorkbook("relatorio.xlsx".to_string()),
        BillingError::StoreUnreachable("timeout".to_string()),
        BillingError::StoreAuth("HTTP 401".to_string()),
        BillingError::StoreConflict("HTTP 409".to_string()),
        BillingError::StoreResponse("base64".to_string()),
        BillingError::ExportFailed("書き込み失敗".to_string()),
        BillingError::Prompt("端末なし".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 認証エラーは設定コマンドを案内する
#[test]
fn test_store_auth_message() {
    let err = BillingError::StoreAuth("HTTP 401".to_string());
    let display = format!("{}", err);

    assert!(display.contains("HTTP 401"));
    assert!(display.contains("faturamento config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: BillingError = io_err.into();

    assert!(matches!(err, BillingError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: BillingError = json_err.into();

    assert!(matches!(err, BillingError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = faturamento_common::Error::ColumnMissing("Valor Total".to_string());
    let err: BillingError = common_err.into();

    assert!(matches!(err, BillingError::Common(_)));
    assert!(format!("{}", err).contains("Valor Total"));
}
