use clap::Parser;
use faturamento_common::{aggregate, ConvenioMapping};
use faturamento_rust::{assign, cli, config, error, export, logger, reader, store, summary};
use cli::{Cli, Commands, MappingAction};
use config::Config;
use error::Result;
use store::MappingStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Process { file, output, format, assign: interactive, top } => {
            println!("📊 faturamento - 集計\n");

            // 1. レポート解析
            println!("[1/3] レポートを解析中...");
            let parsed = reader::parse_report_file(&file)?;
            let stats = parsed.stats();
            println!(
                "✔ {}行を抽出（ヘッダー行 {}）\n",
                stats.rows,
                parsed.layout.header_row + 1
            );

            // 2. マッピング読み込み・集計
            println!("[2/3] マッピングを読み込み中...");
            let store = store::open_store(&config)?;
            let snapshot = store.load()?;
            println!("✔ {}件のconvênio ({})\n", snapshot.mapping.len(), store.describe());

            let mut report = aggregate(&parsed.records, &snapshot.mapping, parsed.report_total);

            // 3. サマリー
            println!("[3/3] 集計結果");
            println!("{}", summary::render_summary(&stats, &report, top));
            print!("{}", summary::render_unmapped(&report));

            if interactive && !report.unmapped.is_empty() {
                println!();
                let batch = assign::run_interactive_assignment(&report.unmapped)?;

                if batch.is_empty() {
                    println!("変更なし");
                } else {
                    let updated = snapshot.mapping.with_assignments(&batch);
                    store.save(&updated, snapshot.version.as_deref())?;
                    println!("✔ マッピングを保存: {}件\n", batch.len());

                    report = aggregate(&parsed.records, &updated, parsed.report_total);
                    println!("{}", summary::render_summary(&stats, &report, top));
                    print!("{}", summary::render_unmapped(&report));
                }
            }

            if let Some(output_dir) = output {
                println!();
                export::export_report(&report, format, &output_dir)?;
            }

            println!("\n✅ 完了");
        }

        Commands::Mapping { action } => {
            let store = store::open_store(&config)?;
            run_mapping_action(store.as_ref(), action)?;
        }

        Commands::Config { set_github_token, set_github_repo, set_branch, set_mapping_path, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(token) = set_github_token {
                config.github_token = Some(token);
                changed = true;
            }
            if let Some(repo) = set_github_repo {
                config.github_repo = Some(repo);
                changed = true;
            }
            if let Some(branch) = set_branch {
                config.github_branch = branch;
                changed = true;
            }
            if let Some(path) = set_mapping_path {
                config.mapping_path = path;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  GitHubトークン: {}", if config.github_token.is_some() { "設定済み" } else { "未設定" });
                println!("  リポジトリ: {}", config.github_repo.as_deref().unwrap_or("未設定"));
                println!("  ブランチ: {}", config.github_branch);
                println!("  マッピングファイル: {}", config.mapping_path);
            }
        }
    }

    Ok(())
}

/// マッピング表の操作（読み込み → 編集 → 一括保存）
fn run_mapping_action(store: &dyn MappingStore, action: MappingAction) -> Result<()> {
    match action {
        MappingAction::Show => {
            let snapshot = store.load()?;
            println!("マッピング ({}): {}件", store.describe(), snapshot.mapping.len());
            for (key, channel) in snapshot.mapping.sorted_entries() {
                println!("  {:<40} {}", key, channel.map(|c| c.as_str()).unwrap_or("-"));
            }
        }

        MappingAction::Set { key, channel } => {
            let snapshot = store.load()?;
            let mut mapping = snapshot.mapping;
            mapping.set(&key, Some(channel));
            store.save(&mapping, snapshot.version.as_deref())?;
            println!("✔ {} → {}", key.trim(), channel);
        }

        MappingAction::Remove { key } => {
            let snapshot = store.load()?;
            let mut mapping = snapshot.mapping;
            if mapping.remove(&key).is_none() {
                println!("登録されていません: {}", key);
                return Ok(());
            }
            store.save(&mapping, snapshot.version.as_deref())?;
            println!("✔ 削除: {}", key.trim());
        }

        MappingAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let imported = ConvenioMapping::from_json(&content)?;
            let snapshot = store.load()?;
            store.save(&imported, snapshot.version.as_deref())?;
            println!("✔ {}件を取り込みました: {}", imported.len(), file.display());
        }

        MappingAction::Export { file } => {
            let snapshot = store.load()?;
            std::fs::write(&file, snapshot.mapping.to_json_pretty()?)?;
            println!("✔ {}件を書き出しました: {}", snapshot.mapping.len(), file.display());
        }
    }

    Ok(())
}
