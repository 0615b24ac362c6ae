//! Quest names and the set of active quests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// trim → lowercase → 空白を `_` に置換
///
/// クエスト名とユーザー入力の比較はすべてこの形で行う。
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// 正規化済みのクエスト名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestName(String);

impl QuestName {
    pub fn normalize(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    Live,
    Expired,
}

impl QuestStatus {
    /// HUD 上の表示タグ
    pub fn tag(self) -> &'static str {
        match self {
            QuestStatus::Live => "[OK]",
            QuestStatus::Expired => "[!!]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuest {
    pub name: QuestName,
    pub expires_at: DateTime<Utc>,
}

impl ActiveQuest {
    pub fn status_at(&self, now: DateTime<Utc>) -> QuestStatus {
        if now < self.expires_at {
            QuestStatus::Live
        } else {
            QuestStatus::Expired
        }
    }
}

/// Active quests in insertion order (the order they are displayed in).
///
/// Names are unique; a quest leaves the set only through acknowledgment.
#[derive(Debug, Clone, Default)]
pub struct ActiveQuests {
    entries: Vec<ActiveQuest>,
}

impl ActiveQuests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &QuestName) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &QuestName) -> Option<&ActiveQuest> {
        self.entries.iter().find(|q| &q.name == name)
    }

    /// Insert unless the name is already active. An existing entry keeps its
    /// expiry. Returns `true` when inserted.
    pub fn insert_if_absent(&mut self, name: QuestName, expires_at: DateTime<Utc>) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.entries.push(ActiveQuest { name, expires_at });
        true
    }

    pub fn remove(&mut self, name: &QuestName) -> Option<ActiveQuest> {
        let pos = self.entries.iter().position(|q| &q.name == name)?;
        Some(self.entries.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveQuest> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rstest::rstest;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case::spaces_and_case("  Clean The Deck  ", "clean_the_deck")]
    #[case::already_normal("scout_ahead", "scout_ahead")]
    #[case::inner_double_space("a  b", "a__b")]
    #[case::empty("   ", "")]
    #[case::unicode("Ärger Machen", "ärger_machen")]
    fn normalizes_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[rstest]
    #[case("  Clean The Deck  ")]
    #[case("\tMixed\tTabs and Spaces ")]
    #[case("ÉCOLE  Du Soir")]
    #[case("")]
    fn normalization_is_idempotent(#[case] raw: &str) {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn insert_keeps_first_expiry() {
        let mut quests = ActiveQuests::new();
        let name = QuestName::normalize("Scout Ahead");

        assert!(quests.insert_if_absent(name.clone(), t0()));
        assert!(!quests.insert_if_absent(name.clone(), t0() + TimeDelta::seconds(500)));

        assert_eq!(quests.len(), 1);
        assert_eq!(quests.get(&name).unwrap().expires_at, t0());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut quests = ActiveQuests::new();
        for raw in ["zeta", "alpha", "mid"] {
            quests.insert_if_absent(QuestName::normalize(raw), t0());
        }
        let names: Vec<_> = quests.iter().map(|q| q.name.as_str().to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn remove_returns_entry_once() {
        let mut quests = ActiveQuests::new();
        let name = QuestName::normalize("x");
        quests.insert_if_absent(name.clone(), t0());

        assert!(quests.remove(&name).is_some());
        assert!(quests.remove(&name).is_none());
        assert!(quests.is_empty());
    }

    #[test]
    fn status_flips_at_expiry() {
        let quest = ActiveQuest {
            name: QuestName::normalize("x"),
            expires_at: t0(),
        };
        assert_eq!(quest.status_at(t0() - TimeDelta::seconds(1)), QuestStatus::Live);
        assert_eq!(quest.status_at(t0()), QuestStatus::Expired);
        assert_eq!(QuestStatus::Expired.tag(), "[!!]");
    }
}
