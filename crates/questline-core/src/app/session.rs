//! Session - 1 tick 分の処理とユーザー入力の適用
//!
//! # tick のフロー
//! 1. QueueProcessor で directive を 1 件処理
//! 2. StatsStore に累計を保存（毎 tick、全体上書き）
//! 3. 合成ノイズ（任意）
//! 4. HudFrame を組み立てて返す

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::command::{CommandOutcome, acknowledge};
use super::log::DiagnosticLog;
use super::status::HudFrame;
use crate::domain::{StatsRecord, normalize};
use crate::error::{HudError, truncate_diagnostic};
use crate::ports::{Clock, DirectiveSource, StatsStore};
use crate::queue::{ProcessReport, QueueProcessor, SessionState};

/// What the caller should do after an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// A running HUD session. Built by [`super::SessionBuilder`].
pub struct Session {
    pub(super) state: SessionState,
    pub(super) processor: QueueProcessor,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) directives: Box<dyn DirectiveSource>,
    pub(super) stats_store: Box<dyn StatsStore>,
    pub(super) log: DiagnosticLog,
    pub(super) noise: bool,
    pub(super) diagnostic_width: usize,
}

impl Session {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Run one full tick and return the frame to display.
    pub fn tick(&mut self) -> HudFrame {
        let now = self.clock.now();

        let report = self
            .processor
            .process(self.directives.as_ref(), &mut self.state, now);
        self.record(now, &report);

        if let Err(err) = self.save_at(now) {
            let reason = truncate_diagnostic(&err.to_string(), self.diagnostic_width);
            self.log.warn(now, format!("STATS_FLUSH_FAILED: {reason}"));
        } else {
            self.log.info(now, "STATS_BUFFER_FLUSHED_TO_DISK...");
        }

        if self.noise {
            self.log.maybe_noise(now);
        }

        HudFrame::capture(&self.state, &self.log, now)
    }

    /// Apply one line of user input.
    pub fn handle_input(&mut self, raw: &str) -> Control {
        let now = self.clock.now();
        self.log
            .info(now, format!("USER_INPUT_RECEIVED: {}", normalize(raw)));

        match acknowledge(raw, &mut self.state.active_quests, &mut self.state.stats) {
            CommandOutcome::Acknowledged(name) => {
                self.log.info(now, format!("QUEST_VALIDATED_AND_PURGED: {name}"));
                Control::Continue
            }
            CommandOutcome::Exit => {
                self.log.info(now, "SHUTDOWN_SEQUENCE_ENGAGED...");
                Control::Exit
            }
            CommandOutcome::Unrecognized(cmd) => {
                self.log.warn(now, format!("UNRECOGNIZED_COMMAND: {cmd}"));
                Control::Continue
            }
        }
    }

    /// Current view without running a tick.
    pub fn frame(&self) -> HudFrame {
        HudFrame::capture(&self.state, &self.log, self.clock.now())
    }

    /// Save the stats now (used on shutdown).
    pub fn flush(&mut self) -> Result<StatsRecord, HudError> {
        let now = self.clock.now();
        self.save_at(now)
    }

    fn save_at(&self, now: DateTime<Utc>) -> Result<StatsRecord, HudError> {
        self.stats_store
            .save(&self.state.stats, self.state.elapsed_secs(now))
    }

    fn record(&mut self, now: DateTime<Utc>, report: &ProcessReport) {
        if let (Some(index), Some(kind)) = (report.index(), report.kind_label()) {
            self.log.info(now, format!("PARSING_INDEX_{index}: {kind}"));
        }

        match report {
            ProcessReport::SourceMissing { source } => {
                self.log.warn(now, format!("CRITICAL_ERR: {source}_NOT_FOUND"));
            }
            ProcessReport::Suspended { remaining_secs } => {
                self.log
                    .info(now, format!("THREAD_SLEEP: {remaining_secs}s_REMAINING"));
            }
            ProcessReport::Exhausted { cursor, len } => {
                tracing::trace!(cursor, len, "directive queue exhausted");
            }
            ProcessReport::QuestPushed { name, .. } => {
                self.log.info(now, format!("NEW_QUEST_PUSHED: {name}"));
            }
            ProcessReport::QuestAlreadyActive { name, .. } => {
                self.log.info(now, format!("QUEST_ALREADY_ACTIVE: {name}"));
            }
            ProcessReport::TimerSet { seconds, .. } => {
                self.log
                    .info(now, format!("TIMER_SET: {seconds}s_DELAY_ENGAGED"));
            }
            ProcessReport::Failed { reason, .. } => {
                self.log.warn(now, format!("JSON_EXCEPTION: {reason}"));
            }
            ProcessReport::Skipped { index, reason, .. } => {
                self.log.warn(now, format!("JSON_EXCEPTION: {reason}"));
                self.log.warn(now, format!("DIRECTIVE_SKIPPED: INDEX_{index}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionBuilder;
    use crate::config::HudConfig;
    use crate::domain::QuestName;
    use crate::impls::{InMemoryDirectiveSource, InMemoryStatsStore};
    use crate::ports::FixedClock;
    use chrono::{TimeDelta, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    struct Harness {
        session: Session,
        clock: Arc<FixedClock>,
        source: InMemoryDirectiveSource,
        store: InMemoryStatsStore,
    }

    fn harness(entries: Vec<serde_json::Value>, stored: StatsRecord) -> Harness {
        let clock = Arc::new(FixedClock::new(t0()));
        let source = InMemoryDirectiveSource::new(entries);
        let store = InMemoryStatsStore::with_record(stored);
        let config = HudConfig {
            noise: false,
            ..HudConfig::default()
        };
        let session = SessionBuilder::new(config)
            .clock(clock.clone())
            .directives(source.clone())
            .stats_store(store.clone())
            .rng(StdRng::seed_from_u64(3))
            .build()
            .unwrap();
        Harness {
            session,
            clock,
            source,
            store,
        }
    }

    fn messages(session: &Session) -> Vec<String> {
        session
            .log()
            .lines()
            .map(|l| l.rsplit(" | ").next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn end_to_end_wait_then_quest() {
        let mut h = harness(
            vec![
                json!({"type": "wait", "duration": "2 sec"}),
                json!({"type": "quest", "task": "Scout Ahead"}),
            ],
            StatsRecord::default(),
        );

        h.session.tick();
        assert_eq!(h.session.state().wait_gate, Some(t0() + TimeDelta::seconds(2)));
        assert_eq!(h.session.state().cursor, 1);

        h.clock.advance(TimeDelta::seconds(1));
        h.session.tick();
        assert_eq!(h.session.state().cursor, 1);
        assert!(h.session.state().active_quests.is_empty());

        h.clock.advance(TimeDelta::seconds(2));
        let frame = h.session.tick();
        let name = QuestName::normalize("scout_ahead");
        assert_eq!(h.session.state().cursor, 2);
        assert_eq!(
            h.session.state().active_quests.get(&name).unwrap().expires_at,
            t0() + TimeDelta::seconds(123)
        );
        assert_eq!(frame.status_line(), "DONE: 0 | RUN: 3s | INDEX: 2");

        let msgs = messages(&h.session);
        assert!(msgs.contains(&"TIMER_SET: 2s_DELAY_ENGAGED".to_string()));
        assert!(msgs.contains(&"THREAD_SLEEP: 1s_REMAINING".to_string()));
        assert!(msgs.contains(&"PARSING_INDEX_1: QUEST".to_string()));
        assert!(msgs.contains(&"NEW_QUEST_PUSHED: scout_ahead".to_string()));
    }

    #[test]
    fn every_tick_saves_the_cumulative_total() {
        let mut h = harness(vec![], StatsRecord::new(2, 1000));

        h.clock.advance(TimeDelta::seconds(10));
        h.session.tick();
        h.session.tick();

        assert_eq!(h.store.save_count(), 2);
        assert_eq!(h.store.stored(), Some(StatsRecord::new(2, 1010)));
    }

    #[test]
    fn acknowledgment_updates_the_next_save() {
        let mut h = harness(
            vec![json!({"type": "quest", "task": "Clean The Deck"})],
            StatsRecord::default(),
        );
        h.session.tick();

        assert_eq!(h.session.handle_input("  Clean The Deck  "), Control::Continue);
        assert_eq!(h.session.handle_input("  Clean The Deck  "), Control::Continue);
        h.session.tick();

        assert_eq!(h.store.stored().unwrap().quests_done, 1);
        let msgs = messages(&h.session);
        assert!(msgs.contains(&"QUEST_VALIDATED_AND_PURGED: clean_the_deck".to_string()));
        assert!(msgs.contains(&"UNRECOGNIZED_COMMAND: clean_the_deck".to_string()));
    }

    #[test]
    fn exit_command_requests_shutdown() {
        let mut h = harness(vec![], StatsRecord::default());
        assert_eq!(h.session.handle_input("Exit"), Control::Exit);
    }

    #[test]
    fn missing_source_is_logged_every_tick() {
        let mut h = harness(vec![], StatsRecord::default());
        h.source.remove();

        h.session.tick();
        h.session.tick();

        let missing = messages(&h.session)
            .into_iter()
            .filter(|m| m == "CRITICAL_ERR: quests.json_NOT_FOUND")
            .count();
        assert_eq!(missing, 2);
    }

    #[test]
    fn failed_save_does_not_stop_the_tick() {
        let mut h = harness(
            vec![json!({"type": "quest", "task": "a"})],
            StatsRecord::default(),
        );
        h.store.set_failing(true);

        let frame = h.session.tick();

        assert_eq!(frame.cursor, 1);
        assert!(
            messages(&h.session)
                .iter()
                .any(|m| m.starts_with("STATS_FLUSH_FAILED: "))
        );
    }

    #[test]
    fn malformed_directive_is_reported_and_retried() {
        let mut h = harness(vec![json!({"type": "quest"})], StatsRecord::default());

        h.session.tick();
        h.session.tick();

        assert_eq!(h.session.state().cursor, 0);
        let msgs = messages(&h.session);
        assert_eq!(
            msgs.iter().filter(|m| m.starts_with("JSON_EXCEPTION: ")).count(),
            2
        );
        assert!(msgs.contains(&"PARSING_INDEX_0: QUEST".to_string()));
    }

    #[test]
    fn flush_writes_current_totals() {
        let mut h = harness(vec![], StatsRecord::new(0, 5));
        h.session.handle_input("nothing");
        h.clock.advance(TimeDelta::seconds(4));

        let saved = h.session.flush().unwrap();
        assert_eq!(saved, StatsRecord::new(0, 9));
    }
}
