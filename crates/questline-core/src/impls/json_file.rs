//! JSON ファイル実装（quests.json / quest_stats.json）

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::StatsRecord;
use crate::error::HudError;
use crate::ports::{DirectiveSource, StatsStore};

pub const DIRECTIVES_FILE: &str = "quests.json";
pub const STATS_FILE: &str = "quest_stats.json";

/// 毎回ファイル全体を読み直す directive ソース
#[derive(Debug, Clone)]
pub struct JsonFileDirectiveSource {
    path: PathBuf,
}

impl JsonFileDirectiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/quests.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DIRECTIVES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectiveSource for JsonFileDirectiveSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn is_available(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<Vec<serde_json::Value>, HudError> {
        if !self.is_available() {
            return Err(HudError::SourceMissing(self.path.clone()));
        }
        let text = fs::read_to_string(&self.path).map_err(|e| HudError::io(&self.path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// quest_stats.json（毎回全体を上書き）
#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    path: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/quest_stats.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STATS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStatsStore {
    fn load(&self) -> StatsRecord {
        if !self.path.exists() {
            return StatsRecord::default();
        }
        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| HudError::io(&self.path, e))
            .and_then(|text| {
                serde_json::from_str::<StatsRecord>(&text).map_err(HudError::from)
            });

        match parsed {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "stats file unreadable, starting from zero"
                );
                StatsRecord::default()
            }
        }
    }

    fn save(&self, record: &StatsRecord, session_elapsed: u64) -> Result<StatsRecord, HudError> {
        let merged = record.with_session(session_elapsed);

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        merged.serialize(&mut ser)?;

        fs::write(&self.path, buf).map_err(|e| HudError::io(&self.path, e))?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directive_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileDirectiveSource::in_dir(dir.path());

        assert!(!source.is_available());
        assert_eq!(source.name(), "quests.json");
        assert!(matches!(source.load(), Err(HudError::SourceMissing(_))));
    }

    #[test]
    fn directive_source_reads_raw_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileDirectiveSource::in_dir(dir.path());
        fs::write(
            source.path(),
            r#"[{"type":"wait","duration":"2 sec"},{"type":"quest"}]"#,
        )
        .unwrap();

        let entries = source.load().unwrap();
        assert_eq!(entries.len(), 2);
        // 壊れたエントリもそのまま返る
        assert_eq!(entries[1], json!({"type": "quest"}));
    }

    #[test]
    fn directive_source_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileDirectiveSource::in_dir(dir.path());
        fs::write(source.path(), r#"{"type":"quest","task":"a"}"#).unwrap();

        assert!(matches!(source.load(), Err(HudError::Json(_))));
    }

    #[test]
    fn fresh_stats_store_loads_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatsStore::in_dir(dir.path());
        assert_eq!(store.load(), StatsRecord::default());
    }

    #[test]
    fn malformed_stats_file_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatsStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load(), StatsRecord::default());
    }

    #[test]
    fn save_overwrites_with_the_cumulative_total() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatsStore::in_dir(dir.path());
        let base = store.load();

        store.save(&base, 10).unwrap();
        store.save(&base, 10).unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"quest_done": 0, "time_ran": 10}));
        assert_eq!(store.load(), StatsRecord::new(0, 10));
    }

    #[test]
    fn save_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatsStore::in_dir(dir.path());

        store.save(&StatsRecord::new(1, 2), 0).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "{\n    \"quest_done\": 1,\n    \"time_ran\": 2\n}");
    }

    #[test]
    fn save_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatsStore::new(dir.path().join("nope").join(STATS_FILE));

        let err = store.save(&StatsRecord::default(), 1).unwrap_err();
        assert!(matches!(err, HudError::Io { .. }));
    }
}
