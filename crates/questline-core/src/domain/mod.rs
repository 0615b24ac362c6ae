//! Domain model (directives, quests, stats).
//!
//! - **directive**: quests.json の 1 エントリと wait 期間のパース
//! - **quest**: クエスト名の正規化と active quest の集合
//! - **stats**: quest_stats.json に永続化するカウンタ

pub mod directive;
pub mod quest;
pub mod stats;

pub use directive::{Directive, DirectiveError, DurationUnit, parse_wait_seconds};
pub use quest::{ActiveQuest, ActiveQuests, QuestName, QuestStatus, normalize};
pub use stats::StatsRecord;
