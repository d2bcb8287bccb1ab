//! Error types shared by the data source, the task runner and the UI loop.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while browsing or restoring stashes.
///
/// Only `NotARepository` is fatal, and only at startup. Every other variant is
/// recorded on the app state and shown to the user.
#[derive(Debug, Error)]
pub enum StashError {
    /// The target directory is not inside a git work tree.
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// Git does not know the requested stash ref.
    #[error("no such stash: {0}")]
    NoSuchRef(String),

    /// A read operation (listing, diff) failed.
    #[error("{0}")]
    Fetch(String),

    /// A mutating operation (apply, checkout) failed. The working tree is left
    /// however git left it.
    #[error("{0}")]
    Apply(String),

    /// A background task panicked or its result was lost.
    #[error("background task failed: {0}")]
    Task(String),

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StashError>;
