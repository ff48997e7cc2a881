use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use faturamento_common::Channel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faturamento")]
#[command(about = "Atendimentosレポートのガイド別集計・請求チャネル別サマリー", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レポート（.xls/.xlsx）を集計してサマリーを表示
    Process {
        /// レポートファイル
        #[arg(required = true)]
        file: PathBuf,

        /// ガイド別合計の出力先ディレクトリ（省略時は出力しない）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 未設定のconvênioに対話式でチャネルを割り当て
        #[arg(short, long)]
        assign: bool,

        /// 表示するガイド数（0で全件）
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// convênioマッピング表の操作
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },

    /// 設定を表示/編集
    Config {
        /// GitHubトークンを設定
        #[arg(long)]
        set_github_token: Option<String>,

        /// GitHubリポジトリを設定 (owner/name)
        #[arg(long)]
        set_github_repo: Option<String>,

        /// ブランチを設定
        #[arg(long)]
        set_branch: Option<String>,

        /// マッピングファイルのパスを設定
        #[arg(long)]
        set_mapping_path: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum MappingAction {
    /// 表を一覧表示
    Show,

    /// チャネルを設定（既存の値も上書き）
    Set {
        /// convênioキー
        key: String,

        /// チャネル (AMHPDF/HOSPITAL/DIRETO)
        channel: Channel,
    },

    /// エントリを削除
    Remove {
        /// convênioキー
        key: String,
    },

    /// JSONファイルで表を置き換え
    Import {
        /// 入力JSONファイル
        file: PathBuf,
    },

    /// 表をJSONファイルに書き出し
    Export {
        /// 出力JSONファイル
        file: PathBuf,
    },
}
