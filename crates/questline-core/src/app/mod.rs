//! App - アプリケーション層
//!
//! ports と queue を組み合わせて HUD セッションを動かします。
//!
//! # 主要コンポーネント
//! - **SessionBuilder**: セッションの構築とワイヤリング
//! - **Session**: 1 tick の処理（process → save → noise → frame）と入力の適用
//! - **Scheduler**: tick・入力・shutdown を 1 タスクで回すループ
//! - **HudFrame**: 描画用スナップショット

pub mod builder;
pub mod command;
pub mod log;
pub mod scheduler;
pub mod session;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SessionBuilder};
pub use self::command::{CommandOutcome, EXIT_COMMAND, acknowledge};
pub use self::log::DiagnosticLog;
pub use self::scheduler::{ExitReason, Scheduler};
pub use self::session::{Control, Session};
pub use self::status::{HudFrame, QuestLine};
