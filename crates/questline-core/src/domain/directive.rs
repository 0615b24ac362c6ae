//! Directive - quests.json の 1 エントリ
//!
//! quests.json は `{"type": "quest", "task": ...}` または
//! `{"type": "wait", "duration": ...}` の配列です。
//! エントリは cursor が到達した時点で 1 件ずつ decode されます
//! （壊れたエントリは、そこに到達するまで他の処理に影響しない）。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `<integer><optional whitespace>(sec|min|h)` を文字列中から探す。
static UNIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(sec|min|h)").expect("duration pattern must compile")
});

/// 単位付きの値が無いときは最初の整数を秒として読む。
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("number pattern must compile"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// 新しいクエストを登録する
    Quest { task: String },

    /// 以降の directive 処理を一定時間止める
    Wait { duration: String },
}

impl Directive {
    /// Decode one raw entry of the directive list.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DirectiveError> {
        serde_json::from_value(value.clone()).map_err(DirectiveError::Decode)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Quest { .. } => "quest",
            Directive::Wait { .. } => "wait",
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    #[error("no duration value in {0:?}")]
    NoDurationValue(String),

    #[error("duration out of range: {0:?}")]
    DurationOverflow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
}

impl DurationUnit {
    /// 未知の単位トークン（または単位なし）は秒
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("h") => DurationUnit::Hours,
            Some("min") => DurationUnit::Minutes,
            _ => DurationUnit::Seconds,
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            DurationUnit::Seconds => 1,
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3600,
        }
    }
}

/// Parse a wait duration like `"5 min"` into seconds.
///
/// The first number followed by a unit wins, searched anywhere in the
/// lowercased input, so `"2 hours"` reads as 2h and `"round 1: 5 min"` as
/// 5 min. Without any unit the first number is taken as seconds (`"5 blah"`).
pub fn parse_wait_seconds(raw: &str) -> Result<u64, DirectiveError> {
    let lowered = raw.to_lowercase();

    let (digits, unit) = match UNIT_PATTERN.captures(&lowered) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            DurationUnit::from_token(caps.get(2).map(|m| m.as_str())),
        ),
        None => {
            let found = BARE_NUMBER
                .find(&lowered)
                .ok_or_else(|| DirectiveError::NoDurationValue(raw.to_string()))?;
            (found.as_str(), DurationUnit::Seconds)
        }
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| DirectiveError::DurationOverflow(raw.to_string()))?;

    value
        .checked_mul(unit.multiplier())
        .ok_or_else(|| DirectiveError::DurationOverflow(raw.to_string()))
}
