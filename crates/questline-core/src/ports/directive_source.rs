//! DirectiveSource port - directive リストの読み出し元
//!
//! 本番は quests.json（毎 tick 全体を読み直す）、テストは in-memory。

use crate::error::HudError;

/// Directive の生エントリ列を提供する
///
/// # 設計原則
/// - エントリは decode せずに返す（decode は cursor が到達した時に processor が行う）
/// - ソースが無い状態は異常ではない（外部で作られるのを待つ）
pub trait DirectiveSource: Send {
    /// HUD の診断行に出す名前（例: `quests.json`）
    fn name(&self) -> String;

    /// ソースが存在するか
    fn is_available(&self) -> bool;

    /// 全エントリを読み出す
    fn load(&self) -> Result<Vec<serde_json::Value>, HudError>;
}
