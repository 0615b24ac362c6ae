//! SessionBuilder - HUD セッションの構築とワイヤリング
//!
//! 起動時に足りない部品があれば `build()` で BuildError を返す（Fail-fast）。

use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::log::DiagnosticLog;
use super::session::Session;
use crate::config::HudConfig;
use crate::ports::{Clock, DirectiveSource, StatsStore, SystemClock};
use crate::queue::{QueueProcessor, SessionState};

/// SessionBuilder は Session を構築
///
/// # 使用例
/// ```ignore
/// let session = SessionBuilder::new(HudConfig::default())
///     .directives(JsonFileDirectiveSource::in_dir(&dir))
///     .stats_store(JsonFileStatsStore::in_dir(&dir))
///     .base_dir(dir)
///     .build()?;
/// ```
pub struct SessionBuilder {
    config: HudConfig,
    clock: Option<Arc<dyn Clock>>,
    directives: Option<Box<dyn DirectiveSource>>,
    stats_store: Option<Box<dyn StatsStore>>,
    rng: Option<StdRng>,
    base_dir: Option<PathBuf>,
}

/// BuildError はセッション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing component: {0}. Call the matching builder method before build().")]
    MissingComponent(&'static str),
}

impl SessionBuilder {
    pub fn new(config: HudConfig) -> Self {
        Self {
            config,
            clock: None,
            directives: None,
            stats_store: None,
            rng: None,
            base_dir: None,
        }
    }

    /// 省略時は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn directives(mut self, source: impl DirectiveSource + 'static) -> Self {
        self.directives = Some(Box::new(source));
        self
    }

    pub fn stats_store(mut self, store: impl StatsStore + 'static) -> Self {
        self.stats_store = Some(Box::new(store));
        self
    }

    /// 診断ログの乱数。テストでは seed 固定のものを渡す
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// ブート時にログへ出すだけで、ファイルの解決には使わない
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// 統計を読み込み、開始時刻を固定して Session を生成
    pub fn build(self) -> Result<Session, BuildError> {
        let directives = self
            .directives
            .ok_or(BuildError::MissingComponent("directives"))?;
        let stats_store = self
            .stats_store
            .ok_or(BuildError::MissingComponent("stats_store"))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let rng = self.rng.unwrap_or_else(StdRng::from_entropy);

        let started_at = clock.now();
        let stats = stats_store.load();
        tracing::debug!(
            quests_done = stats.quests_done,
            seconds_run = stats.seconds_run,
            "stats loaded"
        );

        let mut log = DiagnosticLog::new(self.config.log_capacity, rng);
        log.info(started_at, "KERNEL_BOOT_SEQUENCE_INITIALIZED...");
        if let Some(dir) = &self.base_dir {
            log.info(started_at, format!("BASE_DIR_DETECTED: {}", dir.display()));
        }

        Ok(Session {
            state: SessionState::new(stats, started_at),
            processor: QueueProcessor::new(&self.config),
            clock,
            directives,
            stats_store,
            log,
            noise: self.config.noise,
            diagnostic_width: self.config.diagnostic_width,
        })
    }
}
