#![forbid(unsafe_code)]

use std::path::PathBuf;

use relist_core::keymap::KeymapConfigError;
use relist_widgets::ReorderError;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid item list: {0}")]
    Items(#[from] ReorderError),

    #[error("cannot read keymap file {path}: {source}")]
    KeymapRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid keymap file: {0}")]
    Keymap(#[from] KeymapConfigError),
}

impl DemoError {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Items(_) | Self::KeymapRead { .. } | Self::Keymap(_) => 2,
        }
    }
}
