//! StatsStore port - 統計カウンタの永続化

use crate::domain::StatsRecord;
use crate::error::HudError;

/// 起動時に 1 回 load、毎 tick save される
pub trait StatsStore: Send {
    /// Load the stored record. A missing or malformed store yields zeros.
    fn load(&self) -> StatsRecord;

    /// Persist `record` with `session_elapsed` seconds merged into its
    /// runtime total, overwriting the previous content. `session_elapsed`
    /// is measured from process start, so repeated saves never double count.
    fn save(&self, record: &StatsRecord, session_elapsed: u64) -> Result<StatsRecord, HudError>;
}
