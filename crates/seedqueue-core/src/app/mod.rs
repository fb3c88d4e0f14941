//! App - アプリケーション層
//!
//! このモジュールは entry とキュー、scheduler を組み合わせます。
//!
//! # 主要コンポーネント
//! - **QueueBuilder**: ワイヤリングと起動時の検証
//! - **SeedQueue**: エントリのコンテナ（add, claim, reset）
//! - **ConcurrencyCapPolicy**: デフォルトの pause 対象選択
//! - **SchedulerLoop**: lock の ping と poll tick ごとに pause を再計画

pub mod builder;
pub mod policy;
pub mod queue;
pub mod scheduler_loop;

pub use self::builder::{App, BuildError, QueueBuilder};
pub use self::policy::ConcurrencyCapPolicy;
pub use self::queue::SeedQueue;
pub use self::scheduler_loop::{NotifyPing, SchedulerHandle, SchedulerLoop, run_pass};
