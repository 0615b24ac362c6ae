//! questline-core
//!
//! Core building blocks for the questline HUD.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（directive, quest, stats）
//! - **ports**: 抽象化レイヤー（Clock, DirectiveSource, StatsStore, Renderer）
//! - **queue**: directive の逐次処理（QueueProcessor, SessionState）
//! - **app**: アプリケーションロジック（builder, session, scheduler, status, log）
//! - **impls**: 実装（JSON ファイル、インメモリ、端末）
//! - **config** / **error**: 設定値とエラー型

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod queue;
