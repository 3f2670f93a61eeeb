//! Filesystem primitives with uniform error reporting.
//!
//! Each function performs one primitive action and maps any failure to
//! [`Error::Fs`] or [`Error::NotFound`], tagged with the [`FsOp`] that failed
//! and the path it was applied to.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, FsOp, Result};

/// Options for [`copy`].
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    /// Replace files that already exist at the destination.
    pub overwrite: bool,
    /// Leave existing destination files alone instead of failing.
    pub skip_existing: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            skip_existing: false,
        }
    }
}

/// Copies `src` to `dest`.
///
/// A directory source has its contents copied recursively into `dest`, which
/// is created if needed. A file source is copied to the file path `dest`.
pub async fn copy(src: &Path, dest: &Path, options: &CopyOptions) -> Result<()> {
    log::debug!("copy {:?} -> {:?} ({:?})", src, dest, options);

    let meta = fs::metadata(src)
        .await
        .map_err(|e| Error::fs_copy(src, dest, e))?;

    let from = src.to_path_buf();
    let to = dest.to_path_buf();
    let options = *options;

    tokio::task::spawn_blocking(move || {
        if meta.is_dir() {
            copy_dir_blocking(&from, &to, &options)
        } else {
            copy_file_blocking(&from, &to, &options)
        }
    })
    .await?
    .map_err(|e| Error::fs_copy(src, dest, e))
}

fn copy_dir_blocking(from: &Path, to: &Path, options: &CopyOptions) -> io::Result<()> {
    std::fs::create_dir_all(to)?;

    let mut dir_options = fs_extra::dir::CopyOptions::new();
    dir_options.overwrite = options.overwrite;
    dir_options.skip_exist = options.skip_existing;
    dir_options.copy_inside = true;
    dir_options.content_only = true;

    fs_extra::dir::copy(from, to, &dir_options)
        .map(|_| ())
        .map_err(into_io_error)
}

fn copy_file_blocking(from: &Path, to: &Path, options: &CopyOptions) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file_options = fs_extra::file::CopyOptions::new();
    file_options.overwrite = options.overwrite;
    file_options.skip_exist = options.skip_existing;

    fs_extra::file::copy(from, to, &file_options)
        .map(|_| ())
        .map_err(into_io_error)
}

// Keeps the io kind for the cases callers distinguish.
fn into_io_error(err: fs_extra::error::Error) -> io::Error {
    use fs_extra::error::ErrorKind;

    let kind = match &err.kind {
        ErrorKind::NotFound => io::ErrorKind::NotFound,
        ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
        ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
        ErrorKind::Io(io_err) => io_err.kind(),
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, err)
}

/// Creates `path` and any missing parents. Succeeds if it already exists.
pub async fn mkdirs(path: &Path) -> Result<PathBuf> {
    log::debug!("mkdirs {:?}", path);
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::fs(FsOp::MakeDirectory, path, e))?;
    Ok(path.to_path_buf())
}

/// Removes a file, or a directory and everything below it.
///
/// A missing path is not an error.
pub async fn remove(path: &Path) -> Result<()> {
    log::debug!("remove {:?}", path);

    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::fs(FsOp::Remove, path, e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::fs(FsOp::Remove, path, e)),
    }
}

/// Removes everything inside `path`, keeping the directory itself.
///
/// The directory is created if it does not exist. A symlink is refused, since
/// its entries live wherever the link points.
pub async fn empty_dir(path: &Path) -> Result<()> {
    log::debug!("empty_dir {:?}", path);

    match fs::symlink_metadata(path).await {
        Ok(meta) if meta.file_type().is_symlink() => {
            log::warn!("Refusing to empty symlinked directory {:?}", path);
            let source = io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to empty a symlinked directory",
            );
            return Err(Error::fs(FsOp::Remove, path, source));
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return mkdirs(path).await.map(|_| ());
        }
        Err(e) => return Err(Error::fs(FsOp::Remove, path, e)),
    }

    let mut entries = match fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return mkdirs(path).await.map(|_| ());
        }
        Err(e) => return Err(Error::fs(FsOp::Remove, path, e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::fs(FsOp::Remove, path, e))?
    {
        remove(&entry.path()).await?;
    }

    Ok(())
}

pub async fn stat(path: &Path) -> Result<Metadata> {
    log::debug!("stat {:?}", path);
    fs::metadata(path)
        .await
        .map_err(|e| Error::fs(FsOp::Stat, path, e))
}

/// Synchronous existence check. Any error reads as "does not exist".
pub fn exists_sync(path: &Path) -> bool {
    log::debug!("exists_sync {:?}", path);
    path.exists()
}

/// Asynchronous existence check.
///
/// Unlike [`exists_sync`], errors other than "not found" are returned.
pub async fn exists(path: &Path) -> Result<bool> {
    log::debug!("exists {:?}", path);
    fs::try_exists(path)
        .await
        .map_err(|e| Error::fs(FsOp::Exists, path, e))
}
