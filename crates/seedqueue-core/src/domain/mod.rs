//! Domain model (ids, flags, errors, preview/settings metadata, sessions).
//!
//! entry や app から使われる値型とエラー型を置きます。

pub mod errors;
pub mod ids;
pub mod session;
pub mod settings;
pub mod state;

pub use self::errors::EntryError;
pub use self::ids::{Id, IdMarker, WorkerId};
pub use self::session::{OpaqueHandle, SessionServices, StorageSession};
pub use self::settings::{ModelPart, PreviewPlayer, PreviewProperties, SettingsSnapshot};
pub use self::state::{EntryFlags, FlagSnapshot, PauseReasons};
