//! seedqueue-core
//!
//! Core building blocks for a queue of pre-generated worlds ("seeds").
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, entry flags, pause reasons, errors, preview/settings metadata）
//! - **ports**: 抽象化レイヤー（worker, preview backend, presentation, termination, scheduler）
//! - **entry**: キューエントリ本体（pause/lock/claim/discard の調停）
//! - **render**: render thread への束縛と preview の遅延解放
//! - **app**: アプリケーションロジック（builder, queue, pause policy, scheduler loop）
//! - **impls**: 実装（SimulatedWorker, InMemoryPreviewBackend など開発用）
//! - **config**: JSON のキュー設定
//! - **observability**: status views

pub mod app;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod render;

pub use self::app::{App, QueueBuilder, SeedQueue};
pub use self::config::QueueConfig;
pub use self::entry::Entry;
pub use self::error::SeedQueueError;
pub use self::render::RenderThread;
