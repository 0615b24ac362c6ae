//! Directive processor: advances the cursor through the directive list.
//!
//! One call handles at most one directive. The flow per tick is:
//! 1. source missing → `SourceMissing`（ソースが現れるまで毎 tick 再試行）
//! 2. wait gate が未来 → `Suspended`（ソースは読まない）
//! 3. ソースを全体読み込み → cursor 位置のエントリを 1 件適用

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use super::SessionState;
use crate::config::{HudConfig, MalformedPolicy};
use crate::domain::{Directive, DirectiveError, QuestName, parse_wait_seconds};
use crate::error::{HudError, truncate_diagnostic};
use crate::ports::DirectiveSource;

/// 1 回の `process` で何が起きたか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessReport {
    /// ソースが存在しない
    SourceMissing { source: String },

    /// wait gate により停止中
    Suspended { remaining_secs: i64 },

    /// cursor がリスト末尾に達している
    Exhausted { cursor: usize, len: usize },

    QuestPushed {
        index: usize,
        name: QuestName,
        expires_at: DateTime<Utc>,
    },

    /// 同名のクエストが既に active（expiry は更新しない）
    QuestAlreadyActive { index: usize, name: QuestName },

    TimerSet {
        index: usize,
        seconds: u64,
        gate: DateTime<Utc>,
    },

    /// 読み込みまたは decode に失敗。cursor はそのまま
    Failed {
        index: Option<usize>,
        kind: Option<String>,
        reason: String,
    },

    /// decode に失敗したエントリを読み飛ばした（`MalformedPolicy::Skip`）
    Skipped {
        index: usize,
        kind: Option<String>,
        reason: String,
    },
}

impl ProcessReport {
    /// The directive index this report is about, if one was reached.
    pub fn index(&self) -> Option<usize> {
        match self {
            ProcessReport::QuestPushed { index, .. }
            | ProcessReport::QuestAlreadyActive { index, .. }
            | ProcessReport::TimerSet { index, .. }
            | ProcessReport::Skipped { index, .. } => Some(*index),
            ProcessReport::Failed { index, .. } => *index,
            _ => None,
        }
    }

    /// `"QUEST"` / `"WAIT"` as shown in the parsing line.
    pub fn kind_label(&self) -> Option<String> {
        match self {
            ProcessReport::QuestPushed { .. } | ProcessReport::QuestAlreadyActive { .. } => {
                Some("QUEST".to_string())
            }
            ProcessReport::TimerSet { .. } => Some("WAIT".to_string()),
            ProcessReport::Failed { kind, .. } | ProcessReport::Skipped { kind, .. } => {
                kind.as_ref().map(|k| k.to_uppercase())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueProcessor {
    quest_ttl: TimeDelta,
    diagnostic_width: usize,
    malformed_policy: MalformedPolicy,
}

impl QueueProcessor {
    pub fn new(config: &HudConfig) -> Self {
        Self {
            quest_ttl: config.quest_ttl,
            diagnostic_width: config.diagnostic_width,
            malformed_policy: config.malformed_policy,
        }
    }

    /// Run one processing step against `source`.
    pub fn process(
        &self,
        source: &dyn DirectiveSource,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> ProcessReport {
        if !source.is_available() {
            return ProcessReport::SourceMissing {
                source: source.name(),
            };
        }

        if let Some(remaining) = state.suspended_for(now) {
            return ProcessReport::Suspended {
                remaining_secs: remaining.num_seconds(),
            };
        }

        match source.load() {
            Ok(entries) => self.apply(&entries, state, now),
            Err(err) => ProcessReport::Failed {
                index: None,
                kind: None,
                reason: self.truncate(&err),
            },
        }
    }

    /// Apply the entry under the cursor. The wait gate is not consulted here.
    pub fn apply(
        &self,
        entries: &[Value],
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> ProcessReport {
        let index = state.cursor;
        let Some(entry) = entries.get(index) else {
            return ProcessReport::Exhausted {
                cursor: index,
                len: entries.len(),
            };
        };

        match self.apply_entry(entry, state, now) {
            Ok(report) => report,
            Err(err) => {
                let kind = entry
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let reason = self.truncate(&err);
                match self.malformed_policy {
                    MalformedPolicy::Retry => ProcessReport::Failed {
                        index: Some(index),
                        kind,
                        reason,
                    },
                    MalformedPolicy::Skip => {
                        state.cursor += 1;
                        ProcessReport::Skipped {
                            index,
                            kind,
                            reason,
                        }
                    }
                }
            }
        }
    }

    // state は成功したときだけ変更する
    fn apply_entry(
        &self,
        entry: &Value,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Result<ProcessReport, HudError> {
        let index = state.cursor;
        match Directive::from_value(entry)? {
            Directive::Quest { task } => {
                let name = QuestName::normalize(&task);
                let expires_at = now
                    .checked_add_signed(self.quest_ttl)
                    .ok_or_else(|| DirectiveError::DurationOverflow(task.clone()))?;

                let inserted = state.active_quests.insert_if_absent(name.clone(), expires_at);
                state.cursor += 1;

                if inserted {
                    Ok(ProcessReport::QuestPushed {
                        index,
                        name,
                        expires_at,
                    })
                } else {
                    Ok(ProcessReport::QuestAlreadyActive { index, name })
                }
            }
            Directive::Wait { duration } => {
                let seconds = parse_wait_seconds(&duration)?;
                let gate = i64::try_from(seconds)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| DirectiveError::DurationOverflow(duration.clone()))?;

                state.wait_gate = Some(gate);
                state.cursor += 1;
                Ok(ProcessReport::TimerSet {
                    index,
                    seconds,
                    gate,
                })
            }
        }
    }

    fn truncate(&self, err: &HudError) -> String {
        truncate_diagnostic(&err.to_string(), self.diagnostic_width)
    }
}
