//! Status - HUD に表示するフレーム
//!
//! 表示専用のスナップショットで、永続化の対象ではありません。

use std::fmt;

use chrono::{DateTime, Utc};

use super::log::DiagnosticLog;
use crate::domain::{QuestName, QuestStatus};
use crate::queue::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLine {
    pub name: QuestName,
    pub status: QuestStatus,
}

/// One rendered view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudFrame {
    pub quests_done: u64,

    /// 起動時の累計 + 今回のセッション経過秒
    pub seconds_run: u64,

    pub cursor: usize,
    pub quests: Vec<QuestLine>,
    pub log: Vec<String>,
}

impl HudFrame {
    pub fn capture(state: &SessionState, log: &DiagnosticLog, now: DateTime<Utc>) -> Self {
        let totals = state.persisted_stats(now);
        Self {
            quests_done: totals.quests_done,
            seconds_run: totals.seconds_run,
            cursor: state.cursor,
            quests: state
                .active_quests
                .iter()
                .map(|q| QuestLine {
                    name: q.name.clone(),
                    status: q.status_at(now),
                })
                .collect(),
            log: log.lines().map(str::to_string).collect(),
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "DONE: {} | RUN: {}s | INDEX: {}",
            self.quests_done, self.seconds_run, self.cursor
        )
    }
}

impl fmt::Display for HudFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status_line())?;
        for quest in &self.quests {
            writeln!(f, "{} >> {}", quest.status.tag(), quest.name)?;
        }
        write!(f, "--- SYSTEM LOG ---")?;
        for line in &self.log {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}
