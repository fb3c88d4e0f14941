//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports のプロセス内実装を含めます。
//!
//! # 含まれる実装
//! - **SimulatedWorker**: 偽の chunk を生成するワーカースレッド
//! - **InMemoryPreviewBackend**: CPU 側の preview ターゲット
//! - **RecordingPresentation**: 適用された設定を記録する presentation context
//! - **GracefulShutdown**: ワーカー自身への協調的な停止要求
//! - **CountingPing**: scheduler loop を持たない ping（テスト用）
//!
//! tokio ベースの ping は `app` の scheduler loop と一緒に置いています。

pub mod ping;
pub mod presentation;
pub mod preview;
pub mod sim_worker;
pub mod termination;

pub use self::ping::CountingPing;
pub use self::presentation::RecordingPresentation;
pub use self::preview::InMemoryPreviewBackend;
pub use self::sim_worker::{SimulatedWorker, Workload};
pub use self::termination::GracefulShutdown;
