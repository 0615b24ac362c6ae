//! In-memory implementations for tests and embedding.
//!
//! Both types are cheap handles over shared state, so a test can keep a clone
//! to mutate or inspect what the session sees.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::StatsRecord;
use crate::error::HudError;
use crate::ports::{DirectiveSource, StatsStore};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
struct DirectiveSlot {
    entries: Option<Vec<serde_json::Value>>,
    broken: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectiveSource {
    slot: Arc<Mutex<DirectiveSlot>>,
}

impl InMemoryDirectiveSource {
    pub fn new(entries: Vec<serde_json::Value>) -> Self {
        let source = Self::default();
        source.set_entries(entries);
        source
    }

    /// ソースが存在しない状態
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn set_entries(&self, entries: Vec<serde_json::Value>) {
        lock(&self.slot).entries = Some(entries);
    }

    pub fn push(&self, entry: serde_json::Value) {
        lock(&self.slot).entries.get_or_insert_with(Vec::new).push(entry);
    }

    pub fn remove(&self) {
        lock(&self.slot).entries = None;
    }

    /// 存在はするが読めない状態（壊れた JSON ファイル相当）
    pub fn set_broken(&self, broken: bool) {
        lock(&self.slot).broken = broken;
    }
}

impl DirectiveSource for InMemoryDirectiveSource {
    fn name(&self) -> String {
        "quests.json".to_string()
    }

    fn is_available(&self) -> bool {
        let slot = lock(&self.slot);
        slot.broken || slot.entries.is_some()
    }

    fn load(&self) -> Result<Vec<serde_json::Value>, HudError> {
        let slot = lock(&self.slot);
        if slot.broken {
            let err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
            return Err(HudError::Json(err));
        }
        slot.entries
            .clone()
            .ok_or_else(|| HudError::SourceMissing("quests.json".into()))
    }
}

#[derive(Debug, Default)]
struct StatsSlot {
    stored: Option<StatsRecord>,
    saves: usize,
    failing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStatsStore {
    slot: Arc<Mutex<StatsSlot>>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: StatsRecord) -> Self {
        let store = Self::default();
        lock(&store.slot).stored = Some(record);
        store
    }

    /// 最後に保存された内容
    pub fn stored(&self) -> Option<StatsRecord> {
        lock(&self.slot).stored
    }

    pub fn save_count(&self) -> usize {
        lock(&self.slot).saves
    }

    /// 以降の save を失敗させる
    pub fn set_failing(&self, failing: bool) {
        lock(&self.slot).failing = failing;
    }
}

impl StatsStore for InMemoryStatsStore {
    fn load(&self) -> StatsRecord {
        lock(&self.slot).stored.unwrap_or_default()
    }

    fn save(&self, record: &StatsRecord, session_elapsed: u64) -> Result<StatsRecord, HudError> {
        let mut slot = lock(&self.slot);
        if slot.failing {
            return Err(HudError::io(
                "quest_stats.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        let merged = record.with_session(session_elapsed);
        slot.stored = Some(merged);
        slot.saves += 1;
        Ok(merged)
    }
}
