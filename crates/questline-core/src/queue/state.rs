//! Session state owned by the tick loop.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{ActiveQuests, StatsRecord};

/// HUD セッションの可変状態（単一所有）
///
/// Design:
/// - tick ループが唯一のインスタンスを所有し、各ステップには `&mut` で渡す
/// - ロック不要（tick と入力処理は同じタスク上で交互に走る）
#[derive(Debug, Clone)]
pub struct SessionState {
    /// 次に処理する directive の index（単調増加、リセットしない）
    pub cursor: usize,

    /// この時刻まで directive 処理を止める
    pub wait_gate: Option<DateTime<Utc>>,

    pub active_quests: ActiveQuests,

    /// 起動時に読んだ統計。`seconds_run` は起動時点の累計のまま保持する
    pub stats: StatsRecord,

    pub started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(stats: StatsRecord, started_at: DateTime<Utc>) -> Self {
        Self {
            cursor: 0,
            wait_gate: None,
            active_quests: ActiveQuests::new(),
            stats,
            started_at,
        }
    }

    /// Remaining suspension if the wait gate is still in the future.
    pub fn suspended_for(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        match self.wait_gate {
            Some(gate) if now < gate => Some(gate - now),
            _ => None,
        }
    }

    /// Whole seconds since process start (never negative).
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.started_at).num_seconds()).unwrap_or(0)
    }

    /// 表示・保存用の累計（起動時の累計 + 今回のセッション）
    pub fn persisted_stats(&self, now: DateTime<Utc>) -> StatsRecord {
        self.stats.with_session(self.elapsed_secs(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_gate_means_not_suspended() {
        let state = SessionState::new(StatsRecord::default(), t0());
        assert!(state.suspended_for(t0()).is_none());
    }

    #[test]
    fn gate_suspends_until_it_elapses() {
        let mut state = SessionState::new(StatsRecord::default(), t0());
        state.wait_gate = Some(t0() + TimeDelta::seconds(2));

        assert_eq!(
            state.suspended_for(t0() + TimeDelta::seconds(1)),
            Some(TimeDelta::seconds(1))
        );
        assert!(state.suspended_for(t0() + TimeDelta::seconds(2)).is_none());
        assert!(state.suspended_for(t0() + TimeDelta::seconds(3)).is_none());
    }

    #[test]
    fn elapsed_is_measured_from_start() {
        let state = SessionState::new(StatsRecord::new(1, 500), t0());
        let later = t0() + TimeDelta::milliseconds(10_900);

        assert_eq!(state.elapsed_secs(later), 10);
        assert_eq!(state.persisted_stats(later), StatsRecord::new(1, 510));
        // 時計が巻き戻っても負にならない
        assert_eq!(state.elapsed_secs(t0() - TimeDelta::seconds(5)), 0);
    }
}
