//! The test environment: resolved project paths plus guarded filesystem
//! operations on them.
//!
//! A [`TestEnv`] knows the project base path and the names of the test,
//! fixture and output directories below it:
//!
//! ```text
//! <base>/<test>/fixture/**          read-only inputs
//! <base>/<test>/output/**           scratch area
//! <base>/<test>/output/tmp-<hex>/** ephemeral scratch, bulk removable
//! ```
//!
//! Every destructive operation goes through the same checks: the target must
//! be an absolute path inside the base path and must not be the base path
//! itself, unless [`CleanOptions::force`] is set. With `DEBUG_CLEAN` set the
//! checks still run but nothing is deleted.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use walkdir::WalkDir;

use crate::config::EnvOptions;
use crate::error::{Error, Result};
use crate::scratch::{PathArg, TestEnvPath};
use crate::services::fs_ops::{self, CopyOptions};
use crate::services::paths;
use crate::services::random::{self, DEFAULT_HEX_LEN};

/// Overrides for destructive operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Allow targets outside the project, or the project root itself.
    pub force: bool,
}

impl CleanOptions {
    pub fn force() -> Self {
        Self { force: true }
    }
}

#[derive(Debug, Clone, Copy)]
enum Teardown {
    /// Remove the contents, keep the directory.
    Empty,
    /// Remove the directory itself.
    Delete,
}

impl fmt::Display for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Teardown::Empty => f.write_str("clean"),
            Teardown::Delete => f.write_str("remove"),
        }
    }
}

/// Resolved paths and operations for one test run.
#[derive(Debug, Clone)]
pub struct TestEnv {
    base_path: PathBuf,
    test_dir_name: String,
    fixture_dir_name: String,
    output_dir_name: String,
    tmp_prefix: String,
    debug_clean: bool,
}

impl TestEnv {
    /// Builds an environment from `options`.
    ///
    /// A supplied base path is made absolute against the current directory
    /// and may point at either the project root or its test directory. When
    /// no base path is supplied one is guessed, see [`TestEnv::guess`].
    pub fn new(options: EnvOptions) -> Result<Self> {
        if options.tmp_prefix.is_empty() {
            return Err(Error::InvalidArgument(
                "tmp prefix must not be empty".to_string(),
            ));
        }

        let base = match &options.base_path {
            Some(base) => base.clone(),
            None => guess_base_path()?,
        };
        let base_path = resolve_base_path(&base, &options.test_dir_name)?;
        let debug_clean = options.resolve_debug_clean();

        log::debug!(
            "TestEnv base: {:?}, test: {:?}, fixture: {:?}, output: {:?}, tmp prefix: {:?}, debug_clean: {}",
            base_path,
            options.test_dir_name,
            options.fixture_dir,
            options.output_dir,
            options.tmp_prefix,
            debug_clean
        );

        Ok(Self {
            base_path,
            test_dir_name: options.test_dir_name,
            fixture_dir_name: options.fixture_dir,
            output_dir_name: options.output_dir,
            tmp_prefix: options.tmp_prefix,
            debug_clean,
        })
    }

    /// Builds an environment rooted at `base` with default directory names.
    pub fn setup(base: impl Into<PathBuf>) -> Result<Self> {
        Self::new(EnvOptions::new().with_base_path(base))
    }

    /// Builds an environment with a guessed base path.
    ///
    /// The guess is the `CARGO_MANIFEST_DIR` of the running test binary,
    /// i.e. the package under test when run through cargo, falling back to
    /// the current directory. This is a heuristic: workspaces that keep their
    /// fixtures elsewhere should pass an explicit base path.
    pub fn guess() -> Result<Self> {
        Self::new(EnvOptions::new())
    }

    // Paths

    pub fn base_dir(&self) -> &Path {
        &self.base_path
    }

    pub fn test_root(&self) -> PathBuf {
        self.base_path.join(&self.test_dir_name)
    }

    pub fn fixture_root(&self) -> PathBuf {
        self.test_root().join(&self.fixture_dir_name)
    }

    pub fn output_root(&self) -> PathBuf {
        self.test_root().join(&self.output_dir_name)
    }

    pub fn tmp_prefix(&self) -> &str {
        &self.tmp_prefix
    }

    /// True when destructive operations are dry runs.
    pub fn debug_clean(&self) -> bool {
        self.debug_clean
    }

    /// Resolves `rel` under the base path. Accepts a path, a list of
    /// segments, or `()` for the base path itself.
    pub fn base_path<'a>(&self, rel: impl Into<PathArg<'a>>) -> PathBuf {
        rel.into().resolve(&self.base_path)
    }

    pub fn test_path<'a>(&self, rel: impl Into<PathArg<'a>>) -> PathBuf {
        rel.into().resolve(&self.test_root())
    }

    pub fn fixture_path<'a>(&self, rel: impl Into<PathArg<'a>>) -> PathBuf {
        rel.into().resolve(&self.fixture_root())
    }

    pub fn output_path<'a>(&self, rel: impl Into<PathArg<'a>>) -> PathBuf {
        rel.into().resolve(&self.output_root())
    }

    /// Path of a `tmp-` directory in output.
    ///
    /// Without a suffix a random 10 character hex suffix is generated, so two
    /// calls return different paths.
    pub fn output_tmp_path(&self, suffix: Option<&str>) -> PathBuf {
        match suffix {
            Some(suffix) if !suffix.is_empty() => self.tmp_dir_for(OsStr::new(suffix)),
            _ => self.tmp_dir_for(OsStr::new(&random::random_hex(DEFAULT_HEX_LEN))),
        }
    }

    /// Like [`TestEnv::output_tmp_path`], with `rel` joined below it.
    pub fn output_tmp_path_join(&self, suffix: Option<&str>, rel: impl AsRef<Path>) -> PathBuf {
        paths::join_under(&self.output_tmp_path(suffix), rel.as_ref())
    }

    /// Strips the `output/tmp-` prefix from `candidate`, if present.
    ///
    /// Accepts either a bare suffix or a full path returned by
    /// [`TestEnv::output_tmp_path`] and returns the suffix.
    pub fn remove_tmp_prefix_from_path(&self, candidate: impl AsRef<Path>) -> PathBuf {
        paths::strip_path_prefix(candidate.as_ref(), &self.tmp_path_prefix())
    }

    fn tmp_path_prefix(&self) -> PathBuf {
        self.output_root().join(&self.tmp_prefix)
    }

    fn tmp_dir_for(&self, suffix: &OsStr) -> PathBuf {
        let mut name = OsString::from(&self.tmp_prefix);
        name.push(suffix);
        self.output_path(Path::new(&name))
    }

    // Handles

    /// A read-only handle below the fixture root.
    pub fn fixture<'a>(&self, rel: impl Into<PathArg<'a>>) -> TestEnvPath<'_> {
        TestEnvPath::new(self, self.fixture_path(rel), false)
    }

    /// A writable handle below the output root.
    pub fn output<'a>(&self, rel: impl Into<PathArg<'a>>) -> TestEnvPath<'_> {
        TestEnvPath::new(self, self.output_path(rel), true)
    }

    /// A writable handle on a `tmp-` output directory.
    pub fn output_tmp(&self, suffix: Option<&str>) -> TestEnvPath<'_> {
        TestEnvPath::new(self, self.output_tmp_path(suffix), true)
    }

    // Destructive operations

    /// Empties `dir`, keeping the directory. Returns the affected path.
    pub async fn clean(&self, dir: impl AsRef<Path>, options: CleanOptions) -> Result<PathBuf> {
        self.teardown(dir.as_ref(), options, Teardown::Empty).await
    }

    /// Deletes `dir` and everything below it. Returns the affected path.
    pub async fn remove(&self, dir: impl AsRef<Path>, options: CleanOptions) -> Result<PathBuf> {
        self.teardown(dir.as_ref(), options, Teardown::Delete).await
    }

    async fn teardown(&self, dir: &Path, options: CleanOptions, mode: Teardown) -> Result<PathBuf> {
        let dir = self.check_teardown_target(dir, options)?;

        if self.debug_clean {
            log::debug!("debug would have {} dir {:?}", mode, dir);
            return Ok(dir);
        }

        log::debug!("{} dir {:?}", mode, dir);
        match mode {
            Teardown::Empty => fs_ops::empty_dir(&dir).await?,
            Teardown::Delete => fs_ops::remove(&dir).await?,
        }
        log::info!("{} done: {:?}", mode, dir);

        Ok(dir)
    }

    /// Runs the teardown guards on `dir` and returns its normalized form.
    ///
    /// The normalized path is what gets checked, so it is also what gets
    /// deleted.
    pub fn check_teardown_target(&self, dir: &Path, options: CleanOptions) -> Result<PathBuf> {
        if dir.as_os_str().is_empty() {
            return Err(Error::NoDir);
        }

        if !dir.is_absolute() {
            return Err(Error::InvalidArgument(format!(
                "directory must be absolute: {}",
                dir.display()
            )));
        }

        let dir = paths::normalize(dir);

        if !options.force && !paths::is_within(&self.base_path, &dir) {
            return Err(Error::OutsideProject(dir));
        }

        if !options.force && dir == self.base_path {
            return Err(Error::WholeProject(dir));
        }

        Ok(dir)
    }

    /// Empties the whole output directory.
    pub async fn clean_all_output(&self) -> Result<PathBuf> {
        let dir = self.output_root();
        log::debug!("emptying output dir {:?}", dir);
        self.clean(&dir, CleanOptions::default()).await
    }

    /// Empties `output/<subdir>`.
    pub async fn clean_output(&self, subdir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.output_subdir(subdir.as_ref())?;
        self.clean(&dir, CleanOptions::default()).await
    }

    /// Deletes `output/<subdir>`.
    pub async fn remove_output(&self, subdir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.output_subdir(subdir.as_ref())?;
        self.remove(&dir, CleanOptions::default()).await
    }

    fn output_subdir(&self, subdir: &Path) -> Result<PathBuf> {
        if subdir.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("No subdir to clean".to_string()));
        }
        Ok(self.output_path(subdir))
    }

    /// Empties the `tmp-` directory named by `suffix` (bare or full path).
    pub async fn clean_output_tmp(&self, suffix: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.output_tmp_dir(suffix.as_ref())?;
        self.clean(&dir, CleanOptions::default()).await
    }

    /// Deletes the `tmp-` directory named by `suffix` (bare or full path).
    pub async fn remove_output_tmp(&self, suffix: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.output_tmp_dir(suffix.as_ref())?;
        self.remove(&dir, CleanOptions::default()).await
    }

    fn output_tmp_dir(&self, suffix: &Path) -> Result<PathBuf> {
        let suffix = self.remove_tmp_prefix_from_path(suffix);
        if suffix.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("No tmp suffix to clean".to_string()));
        }
        Ok(self.tmp_dir_for(suffix.as_os_str()))
    }

    /// Deletes every `tmp-` entry in the output directory.
    ///
    /// The output tree is scanned first, then all matches are removed
    /// concurrently. The first failure fails the whole call. Returns the
    /// removed paths; a missing output directory yields an empty list.
    pub async fn remove_all_output_tmp(&self) -> Result<Vec<PathBuf>> {
        let output = self.output_root();
        let prefix = self.tmp_path_prefix();
        log::debug!("cleaning all output tmp- directories in {:?}", output);

        let found = tokio::task::spawn_blocking(move || collect_prefixed(&output, &prefix)).await??;
        log::debug!("found {} tmp- items", found.len());

        try_join_all(
            found
                .iter()
                .map(|dir| self.remove(dir, CleanOptions::default())),
        )
        .await
    }

    // Creation and copies

    /// Creates `output/<rel>` and returns it.
    pub async fn mkdir_output(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        fs_ops::mkdirs(&self.output_path(rel.as_ref())).await
    }

    /// Creates a `tmp-` output directory and returns it.
    pub async fn mkdir_output_tmp(&self, suffix: Option<&str>) -> Result<PathBuf> {
        fs_ops::mkdirs(&self.output_tmp_path(suffix)).await
    }

    /// Copies `src` to `dest` with default options.
    pub async fn copy(&self, src: &Path, dest: &Path) -> Result<()> {
        fs_ops::copy(src, dest, &CopyOptions::default()).await
    }

    pub async fn copy_with(&self, src: &Path, dest: &Path, options: &CopyOptions) -> Result<()> {
        fs_ops::copy(src, dest, options).await
    }

    /// Copies `fixture/<rel>` to `output/<rel>` and returns the destination.
    pub async fn copy_fixture_to_output(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let rel = rel.as_ref();
        self.copy_fixture_to_output_as(rel, rel).await
    }

    /// Copies `fixture/<fixture_rel>` to `output/<output_rel>` and returns
    /// the destination.
    pub async fn copy_fixture_to_output_as(
        &self,
        fixture_rel: impl AsRef<Path>,
        output_rel: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let src = self.fixture_path(fixture_rel.as_ref());
        let dest = self.output_path(output_rel.as_ref());
        self.copy(&src, &dest).await?;
        Ok(dest)
    }

    /// Copies `fixture/<rel>` into a fresh `tmp-` output directory and
    /// returns it.
    pub async fn copy_fixture_to_tmp_output(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let src = self.fixture_path(rel.as_ref());
        let dest = self.output_tmp_path(None);
        self.copy(&src, &dest).await?;
        Ok(dest)
    }

    // Checks

    /// True if `fixture/<rel>` exists. Errors read as `false`.
    pub fn check_fixture_path(&self, rel: impl AsRef<Path>) -> bool {
        fs_ops::exists_sync(&self.fixture_path(rel.as_ref()))
    }

    /// True if `fixture/<rel>` exists.
    ///
    /// A missing entry is `Ok(false)`; any other failure is returned.
    pub async fn check_fixture_path_async(&self, rel: impl AsRef<Path>) -> Result<bool> {
        match fs_ops::stat(&self.fixture_path(rel.as_ref())).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn guess_base_path() -> Result<PathBuf> {
    match std::env::var_os("CARGO_MANIFEST_DIR") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(std::env::current_dir()?),
    }
}

fn resolve_base_path(base: &Path, test_dir_name: &str) -> Result<PathBuf> {
    let absolute = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir()?.join(base)
    };
    Ok(paths::trim_dir_name_from_path(&absolute, test_dir_name))
}

// Collects entries under `root` whose path starts with `prefix`, without
// descending into the matches themselves.
fn collect_prefixed(root: &Path, prefix: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry?;
        if !paths::starts_with_str(entry.path(), prefix) {
            continue;
        }
        log::debug!("found tmp item {:?}", entry.path());
        if entry.file_type().is_dir() {
            walker.skip_current_dir();
        }
        found.push(entry.into_path());
    }

    Ok(found)
}
