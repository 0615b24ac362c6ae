//! HUD の設定値

use std::time::Duration;

use chrono::TimeDelta;

/// 壊れた directive に cursor が到達したときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// cursor を進めず、次の tick で同じエントリを再試行する
    #[default]
    Retry,

    /// エントリを読み飛ばして cursor を進める
    Skip,
}

#[derive(Debug, Clone)]
pub struct HudConfig {
    /// クエスト登録から期限切れまでの時間
    pub quest_ttl: TimeDelta,

    /// tick の間隔
    pub tick_interval: Duration,

    /// 診断ログに残す最大行数
    pub log_capacity: usize,

    /// 例外メッセージを診断行に出すときの最大文字数
    pub diagnostic_width: usize,

    /// 合成ノイズ行を出すか
    pub noise: bool,

    pub malformed_policy: MalformedPolicy,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            quest_ttl: TimeDelta::seconds(120),
            tick_interval: Duration::from_secs(1),
            log_capacity: 50,
            diagnostic_width: 30,
            noise: true,
            malformed_policy: MalformedPolicy::Retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hud_constants() {
        let c = HudConfig::default();
        assert_eq!(c.quest_ttl, TimeDelta::seconds(120));
        assert_eq!(c.tick_interval, Duration::from_secs(1));
        assert_eq!(c.log_capacity, 50);
        assert_eq!(c.diagnostic_width, 30);
        assert_eq!(c.malformed_policy, MalformedPolicy::Retry);
    }
}
