use thiserror::Error;

use crate::app::BuildError;
use crate::config::ConfigError;
use crate::domain::EntryError;

#[derive(Debug, Error)]
pub enum SeedQueueError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("queue is full (capacity={capacity})")]
    QueueFull { capacity: usize },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
