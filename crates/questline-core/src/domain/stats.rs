//! StatsRecord - 再起動をまたいで残る唯一の状態

use serde::{Deserialize, Serialize};

/// `{"quest_done": n, "time_ran": secs}`
///
/// 欠けたキーは 0 として読む。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(rename = "quest_done", default)]
    pub quests_done: u64,

    #[serde(rename = "time_ran", default)]
    pub seconds_run: u64,
}

impl StatsRecord {
    pub fn new(quests_done: u64, seconds_run: u64) -> Self {
        Self {
            quests_done,
            seconds_run,
        }
    }

    /// The record as it should be persisted after `session_elapsed` seconds
    /// of this process. `self.seconds_run` is the total loaded at startup.
    pub fn with_session(&self, session_elapsed: u64) -> Self {
        Self {
            quests_done: self.quests_done,
            seconds_run: self.seconds_run.saturating_add(session_elapsed),
        }
    }

    pub fn record_done(&mut self) {
        self.quests_done += 1;
    }
}
