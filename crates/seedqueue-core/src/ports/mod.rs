//! Ports - 抽象化レイヤー
//!
//! このモジュールは entry が協調相手から受け取る能力を定義します。
//! 各 trait は core の外側（worker instance, render backend,
//! foreground の presentation context, 終了処理, scheduler）への
//! 狭いインターフェースです。
//!
//! # 設計原則
//! - entry は worker の pause state machine の薄いクライアント
//! - 協調相手は entry の sync domain を自分では取らない

pub mod presentation;
pub mod preview;
pub mod progress;
pub mod scheduler;
pub mod termination;
pub mod worker;

pub use self::presentation::PresentationContext;
pub use self::preview::{PreviewBackend, PreviewResource};
pub use self::progress::ProgressTracker;
pub use self::scheduler::{PauseAction, PausePolicy, SchedulerPing};
pub use self::termination::{CooperativeShutdown, FastKill};
pub use self::worker::{PauseCapability, WorkerInstance};
