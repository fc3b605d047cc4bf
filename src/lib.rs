//! Sticker image downloader.
//!
//! Two pipelines share the same shape:
//! - [`TreeMirror`] walks a remote directory listing and reproduces it on disk.
//! - [`CatalogOrganizer`] reads one JSON catalog and sorts each asset into a
//!   category folder derived from its metadata.

pub mod catalog;
pub mod config;
pub mod downloader;
pub mod menu;
pub mod mirror;
pub mod source;
pub mod stats;


pub use catalog::{Category, CatalogOrganizer, OrganizeReport};
pub use config::{CatalogSettings, LogSettings, MirrorSettings, Settings};
pub use downloader::{DownloadOutcome, Downloader};
pub use menu::Choice;
pub use mirror::{MirrorReport, TreeMirror};
pub use source::{AssetRecord, AssetSource, ByteStream, CrateRef, DirectoryEntry, EntryKind, HttpSource};
pub use stats::DownloadStats;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid choice: {0:?}")]
    InvalidChoice(String),
}

impl Error {
    /// Whether this error came from the remote side rather than the local disk
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::Transport(_) | Self::Parse(_)
        )
    }
}
