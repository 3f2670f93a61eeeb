//! Scratch directory handles.
//!
//! A [`TestEnvPath`] binds one resolved path of a [`TestEnv`] together with a
//! read/write capability. Fixture handles are read-only, output handles are
//! writable, and each side only exposes the operations its capability allows.

use std::path::{Path, PathBuf};

use crate::environment::{CleanOptions, TestEnv};
use crate::error::{Access, Error, Result};
use crate::services::paths;

/// A path argument: nothing, a plain path, a list of segments, or another
/// handle's bound path.
///
/// Plain paths and segments are resolved against a root chosen by the
/// receiving operation; a handle contributes its own path unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PathArg<'a> {
    /// The root itself.
    #[default]
    Root,
    Raw(PathBuf),
    Segments(Vec<PathBuf>),
    Handle(&'a Path),
}

impl PathArg<'_> {
    /// Resolves this argument against `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        match self {
            PathArg::Root => paths::normalize(root),
            PathArg::Raw(rel) => paths::join_under(root, rel),
            PathArg::Segments(segments) => segments
                .iter()
                .fold(paths::normalize(root), |acc, seg| paths::join_under(&acc, seg)),
            PathArg::Handle(path) => path.to_path_buf(),
        }
    }
}

impl From<()> for PathArg<'_> {
    fn from(_: ()) -> Self {
        PathArg::Root
    }
}

impl From<&str> for PathArg<'_> {
    fn from(path: &str) -> Self {
        PathArg::Raw(PathBuf::from(path))
    }
}

impl From<String> for PathArg<'_> {
    fn from(path: String) -> Self {
        PathArg::Raw(PathBuf::from(path))
    }
}

impl From<&Path> for PathArg<'_> {
    fn from(path: &Path) -> Self {
        PathArg::Raw(path.to_path_buf())
    }
}

impl From<PathBuf> for PathArg<'_> {
    fn from(path: PathBuf) -> Self {
        PathArg::Raw(path)
    }
}

impl From<&PathBuf> for PathArg<'_> {
    fn from(path: &PathBuf) -> Self {
        PathArg::Raw(path.clone())
    }
}

impl<S: AsRef<Path>> From<Vec<S>> for PathArg<'_> {
    fn from(segments: Vec<S>) -> Self {
        PathArg::Segments(segments.iter().map(|s| s.as_ref().to_path_buf()).collect())
    }
}

impl<S: AsRef<Path>> From<&[S]> for PathArg<'_> {
    fn from(segments: &[S]) -> Self {
        PathArg::Segments(segments.iter().map(|s| s.as_ref().to_path_buf()).collect())
    }
}

impl<S: AsRef<Path>, const N: usize> From<[S; N]> for PathArg<'_> {
    fn from(segments: [S; N]) -> Self {
        PathArg::Segments(segments.iter().map(|s| s.as_ref().to_path_buf()).collect())
    }
}

impl<'a, T: Into<PathArg<'a>>> From<Option<T>> for PathArg<'a> {
    fn from(arg: Option<T>) -> Self {
        arg.map_or(PathArg::Root, Into::into)
    }
}

impl<'a> From<&'a TestEnvPath<'_>> for PathArg<'a> {
    fn from(handle: &'a TestEnvPath<'_>) -> Self {
        PathArg::Handle(handle.root())
    }
}

/// A path inside a [`TestEnv`], bound to a read or write capability.
///
/// Handles borrow the environment that issued them and are cheap to create
/// and drop; the environment does not track them.
#[derive(Debug, Clone)]
pub struct TestEnvPath<'env> {
    env: &'env TestEnv,
    path: PathBuf,
    writable: bool,
}

impl<'env> TestEnvPath<'env> {
    pub(crate) fn new(env: &'env TestEnv, path: PathBuf, writable: bool) -> Self {
        log::debug!("new handle {:?} (writable: {})", path, writable);
        Self {
            env,
            path,
            writable,
        }
    }

    /// The environment this handle belongs to.
    pub fn env(&self) -> &'env TestEnv {
        self.env
    }

    /// The bound path.
    pub fn root(&self) -> &Path {
        &self.path
    }

    /// Joins `rel` under the bound path.
    pub fn path<'a>(&self, rel: impl Into<PathArg<'a>>) -> PathBuf {
        rel.into().resolve(&self.path)
    }

    /// Parent of the bound path.
    pub fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn access(&self) -> Access {
        if self.writable {
            Access::Writable
        } else {
            Access::ReadOnly
        }
    }

    fn require(&self, required: Access, operation: &'static str) -> Result<()> {
        if self.access() == required {
            return Ok(());
        }
        Err(Error::Capability {
            operation,
            access: self.access(),
            path: self.path.clone(),
        })
    }

    /// Copies `source` into this handle and returns the destination.
    ///
    /// `source` is resolved against the fixture root, `dest` against this
    /// handle's path. Only writable handles accept copies.
    pub async fn copy_into<'a>(
        &self,
        source: impl Into<PathArg<'a>>,
        dest: impl Into<PathArg<'a>>,
    ) -> Result<PathBuf> {
        self.require(Access::Writable, "copy into")?;

        let src = source.into().resolve(&self.env.fixture_root());
        let dst = dest.into().resolve(&self.path);
        self.env.copy(&src, &dst).await?;
        Ok(dst)
    }

    /// Copies this handle's path to `dest` and returns the destination.
    ///
    /// `dest` is resolved against the output root. Only read-only handles can
    /// be copied out.
    pub async fn copy_to<'a>(&self, dest: impl Into<PathArg<'a>>) -> Result<PathBuf> {
        self.require(Access::ReadOnly, "copy out of")?;

        let dst = dest.into().resolve(&self.env.output_root());
        self.env.copy(&self.path, &dst).await?;
        Ok(dst)
    }

    /// Copies this handle's path into a `tmp-` output directory.
    ///
    /// A fresh random suffix is used when `suffix` is `None`.
    pub async fn copy_to_tmp(&self, suffix: Option<&str>) -> Result<PathBuf> {
        self.require(Access::ReadOnly, "copy out of")?;

        let dst = self.env.output_tmp_path(suffix);
        self.env.copy(&self.path, &dst).await?;
        Ok(dst)
    }

    /// Empties the bound directory.
    pub async fn clean(&self) -> Result<PathBuf> {
        self.require(Access::Writable, "clean")?;
        self.env.clean(&self.path, CleanOptions::default()).await
    }

    /// Deletes the bound directory.
    pub async fn remove(&self) -> Result<PathBuf> {
        self.require(Access::Writable, "remove")?;
        self.env.remove(&self.path, CleanOptions::default()).await
    }
}

impl AsRef<Path> for TestEnvPath<'_> {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
