//! 未割り当てconvênioの対話式チャネル設定

use crate::error::{BillingError, Result};
use faturamento_common::{pending_assignments, Channel, ChannelAssignment};
use dialoguer::Select;
use std::collections::BTreeSet;

/// 選択肢（表示順）
pub const MENU_ITEMS: [&str; 5] = [
    "AMHPDF",
    "HOSPITAL",
    "DIRETO",
    "(未設定のまま登録)",
    "(残りをすべてスキップ)",
];

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignAction {
    /// チャネルを割り当て
    Assign(Channel),
    /// キーだけ登録してチャネルは空
    LeaveEmpty,
    /// 残り全部スキップ
    SkipAll,
}

/// メニューの選択番号をアクションに変換
pub fn action_for_selection(index: usize) -> AssignAction {
    match index {
        0..=2 => AssignAction::Assign(Channel::ALL[index]),
        3 => AssignAction::LeaveEmpty,
        _ => AssignAction::SkipAll,
    }
}

/// アクション列から割り当てバッチを作る（SkipAll以降は含めない）
pub fn build_batch<I>(keys: &BTreeSet<String>, actions: I) -> Vec<ChannelAssignment>
where
    I: IntoIterator<Item = AssignAction>,
{
    let mut batch = Vec::new();
    for (mut assignment, action) in pending_assignments(keys).into_iter().zip(actions) {
        match action {
            AssignAction::Assign(channel) => assignment.channel = Some(channel),
            AssignAction::LeaveEmpty => {}
            AssignAction::SkipAll => break,
        }
        batch.push(assignment);
    }
    batch
}

/// 対話式でチャネルを選択
pub fn run_interactive_assignment(unmapped: &BTreeSet<String>) -> Result<Vec<ChannelAssignment>> {
    if unmapped.is_empty() {
        println!("✓ すべてのconvênioにチャネルが設定されています");
        return Ok(Vec::new());
    }

    println!("🏷  チャネル未設定のconvênio: {}件", unmapped.len());
    println!("---\n");

    let mut actions = Vec::with_capacity(unmapped.len());
    for (count, key) in unmapped.iter().enumerate() {
        let selection = Select::new()
            .with_prompt(format!("[{}/{}] {}", count + 1, unmapped.len(), key))
            .items(&MENU_ITEMS)
            .default(3)
            .interact()
            .map_err(|e| BillingError::Prompt(e.to_string()))?;

        let action = action_for_selection(selection);
        match action {
            AssignAction::Assign(channel) => println!("  → {}\n", channel),
            AssignAction::LeaveEmpty => println!("  → 未設定\n"),
            AssignAction::SkipAll => println!("  → 残り全部スキップ\n"),
        }

        actions.push(action);
        if action == AssignAction::SkipAll {
            break;
        }
    }

    Ok(build_batch(unmapped, actions))
}
