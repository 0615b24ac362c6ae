//! User commands: quest acknowledgment and exit.

use crate::domain::{ActiveQuests, QuestName, StatsRecord, normalize};

pub const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// active quest を完了として削除した
    Acknowledged(QuestName),

    /// 終了要求
    Exit,

    /// どれにも当たらない入力（正規化済み）
    Unrecognized(String),
}

/// Apply one line of user input.
///
/// An active quest match wins over the `exit` literal, so a quest that
/// happens to be named `exit` can still be acknowledged.
pub fn acknowledge(
    raw_input: &str,
    active_quests: &mut ActiveQuests,
    stats: &mut StatsRecord,
) -> CommandOutcome {
    let name = QuestName::normalize(raw_input);
    if active_quests.remove(&name).is_some() {
        stats.record_done();
        return CommandOutcome::Acknowledged(name);
    }
    let command = normalize(raw_input);
    if command == EXIT_COMMAND {
        CommandOutcome::Exit
    } else {
        CommandOutcome::Unrecognized(command)
    }
}
