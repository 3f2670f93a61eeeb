//! Error types for fixture-env.
//!
//! This module provides a unified error type [`Error`] and a convenient
//! [`Result`] type alias used throughout the crate. Filesystem failures are
//! carried by [`FsError`], which names the primitive that failed.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The filesystem primitive that produced an [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Copy,
    MakeDirectory,
    Remove,
    Stat,
    Exists,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsOp::Copy => "FS copy failed",
            FsOp::MakeDirectory => "FS make directory failed",
            FsOp::Remove => "FS remove failed",
            FsOp::Stat => "FS stat failed",
            FsOp::Exists => "FS exists failed",
        };
        f.write_str(msg)
    }
}

/// A failed filesystem primitive, with the path it was applied to.
#[derive(Debug, thiserror::Error)]
#[error("{op}: {}{}: {source}", .path.display(), dest_suffix(.dest))]
pub struct FsError {
    /// Which primitive failed.
    pub op: FsOp,
    /// The path the primitive was applied to. For a copy, the source.
    pub path: PathBuf,
    /// The destination of a failed copy.
    pub dest: Option<PathBuf>,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

fn dest_suffix(dest: &Option<PathBuf>) -> String {
    match dest {
        Some(dest) => format!(" -> {}", dest.display()),
        None => String::new(),
    }
}

/// Read/write capability of a scratch handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    Writable,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::ReadOnly => f.write_str("non writable"),
            Access::Writable => f.write_str("writable"),
        }
    }
}

/// The main error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error outside the wrapped filesystem primitives.
    ///
    /// This variant wraps [`std::io::Error`] and is automatically
    /// converted via the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A clean or remove was requested without a directory.
    #[error("No dir to clean")]
    NoDir,

    /// An argument to a path-affecting call was unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A destructive operation targeted a path outside the project.
    #[error("Can't clean outside of project without force option: {}", .0.display())]
    OutsideProject(PathBuf),

    /// A destructive operation targeted the project root itself.
    #[error("Can't clean the whole project without force option: {}", .0.display())]
    WholeProject(PathBuf),

    /// An operation was invoked on a handle lacking the required capability.
    #[error("Can't {operation} a {access} path: {}", .path.display())]
    Capability {
        /// The rejected operation.
        operation: &'static str,
        /// The capability the handle actually has.
        access: Access,
        /// The handle's bound path.
        path: PathBuf,
    },

    /// A filesystem primitive failed.
    #[error(transparent)]
    Fs(FsError),

    /// A filesystem primitive failed because the entity does not exist.
    #[error("{0} (not found)")]
    NotFound(FsError),

    /// An error occurred while scanning the output directory.
    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// An options file could not be parsed.
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// A blocking filesystem task panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Wraps an I/O error from `op` on `path`, picking [`Error::NotFound`]
    /// when the entity is missing.
    pub fn fs(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::from_fs_error(FsError {
            op,
            path: path.into(),
            dest: None,
            source,
        })
    }

    /// Wraps an I/O error from copying `src` to `dest`, keeping both paths.
    pub fn fs_copy(src: impl Into<PathBuf>, dest: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::from_fs_error(FsError {
            op: FsOp::Copy,
            path: src.into(),
            dest: Some(dest.into()),
            source,
        })
    }

    fn from_fs_error(err: FsError) -> Self {
        if err.source.kind() == io::ErrorKind::NotFound {
            Error::NotFound(err)
        } else {
            Error::Fs(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True for the errors raised by the project containment guards.
    pub fn is_safety_violation(&self) -> bool {
        matches!(self, Error::OutsideProject(_) | Error::WholeProject(_))
    }

    /// The underlying filesystem error, if this is one.
    pub fn fs_error(&self) -> Option<&FsError> {
        match self {
            Error::Fs(e) | Error::NotFound(e) => Some(e),
            _ => None,
        }
    }
}
