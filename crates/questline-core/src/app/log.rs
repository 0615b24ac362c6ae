//! DiagnosticLog - HUD 下部のスクロールする診断ログ
//!
//! 各行は `[HH:MM:SS] 0xabcd | MESSAGE` 形式（時刻はローカル時刻、
//! hex はランダムな「メモリアドレス」）。すべての行は tracing にも流す。

use std::collections::VecDeque;

use chrono::{DateTime, Local, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// tick ごとに確率的に差し込む合成ノイズ
pub const NOISE_LINES: [&str; 4] = [
    "SCRUBBING_MEM_CACHE...",
    "ENCRYPTING_SESSION...",
    "STABILIZING_PIPES...",
    "FETCHING_CORE_TEMP...",
];

const NOISE_PROBABILITY: f64 = 0.2;

pub struct DiagnosticLog {
    lines: VecDeque<String>,
    capacity: usize,
    rng: StdRng,
}

impl DiagnosticLog {
    pub fn new(capacity: usize, rng: StdRng) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            rng,
        }
    }

    pub fn info(&mut self, at: DateTime<Utc>, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "questline::hud", "{message}");
        self.push(at, message);
    }

    pub fn warn(&mut self, at: DateTime<Utc>, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::warn!(target: "questline::hud", "{message}");
        self.push(at, message);
    }

    /// Append one noise line with probability 0.2. Returns whether it did.
    pub fn maybe_noise(&mut self, at: DateTime<Utc>) -> bool {
        if !self.rng.gen_bool(NOISE_PROBABILITY) {
            return false;
        }
        let Some(line) = NOISE_LINES.choose(&mut self.rng).copied() else {
            return false;
        };
        tracing::debug!(target: "questline::hud", "{line}");
        self.push(at, line);
        true
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push(&mut self, at: DateTime<Utc>, message: &str) {
        let address: u16 = self.rng.gen_range(0x1000..=0xFFFF);
        let stamp = at.with_timezone(&Local).format("%H:%M:%S");
        self.lines.push_back(format!("[{stamp}] {address:#x} | {message}"));
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }
}
