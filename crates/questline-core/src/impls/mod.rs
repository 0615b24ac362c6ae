//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **JsonFileDirectiveSource / JsonFileStatsStore**: 本番用（実行ファイル横の JSON）
//! - **InMemoryDirectiveSource / InMemoryStatsStore**: テスト用
//! - **TextRenderer**: 端末へのテキスト描画と stdin 行の転送

pub mod inmem;
pub mod json_file;
pub mod terminal;

// 主要な型を再エクスポート
pub use self::inmem::{InMemoryDirectiveSource, InMemoryStatsStore};
pub use self::json_file::{JsonFileDirectiveSource, JsonFileStatsStore};
pub use self::terminal::{TextRenderer, spawn_line_reader};
