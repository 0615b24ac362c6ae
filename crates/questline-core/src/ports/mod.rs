//! Ports - 抽象化レイヤー
//!
//! Session が外部（時計・ファイル・端末）に触れる箇所はすべてここの trait 経由です。
//! 本番実装とテスト用実装は `impls` にあります。

pub mod clock;
pub mod directive_source;
pub mod renderer;
pub mod stats_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::directive_source::DirectiveSource;
pub use self::renderer::Renderer;
pub use self::stats_store::StatsStore;
