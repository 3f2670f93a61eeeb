//! Construction options for [`TestEnv`](crate::TestEnv).

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_TEST_DIR: &str = "test";
pub const DEFAULT_FIXTURE_DIR: &str = "fixture";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_TMP_PREFIX: &str = "tmp-";

/// Environment variable that turns destructive operations into no-ops.
pub const DEBUG_CLEAN_VAR: &str = "DEBUG_CLEAN";

/// Options recognized when building a [`TestEnv`](crate::TestEnv).
///
/// Every key is optional; missing keys take the defaults above. The same
/// record can be read from a JSON file with [`EnvOptions::from_json_file`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvOptions {
    /// Project root, or its test directory. Guessed when absent.
    pub base_path: Option<PathBuf>,
    #[serde(alias = "test_dir")]
    pub test_dir_name: String,
    pub fixture_dir: String,
    pub output_dir: String,
    pub tmp_prefix: String,
    /// Dry-run override. `None` defers to the `DEBUG_CLEAN` variable.
    pub debug_clean: Option<bool>,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            base_path: None,
            test_dir_name: DEFAULT_TEST_DIR.to_string(),
            fixture_dir: DEFAULT_FIXTURE_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            tmp_prefix: DEFAULT_TMP_PREFIX.to_string(),
            debug_clean: None,
        }
    }
}

impl EnvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        log::debug!("Loading options from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let options = serde_json::from_str(&content)?;
        Ok(options)
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_test_dir_name(mut self, name: impl Into<String>) -> Self {
        self.test_dir_name = name.into();
        self
    }

    pub fn with_fixture_dir(mut self, name: impl Into<String>) -> Self {
        self.fixture_dir = name.into();
        self
    }

    pub fn with_output_dir(mut self, name: impl Into<String>) -> Self {
        self.output_dir = name.into();
        self
    }

    pub fn with_tmp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tmp_prefix = prefix.into();
        self
    }

    pub fn with_debug_clean(mut self, debug_clean: bool) -> Self {
        self.debug_clean = Some(debug_clean);
        self
    }

    /// Resolves the dry-run flag, reading `DEBUG_CLEAN` when not set explicitly.
    pub(crate) fn resolve_debug_clean(&self) -> bool {
        self.debug_clean_with(std::env::var_os(DEBUG_CLEAN_VAR).as_deref())
    }

    fn debug_clean_with(&self, var: Option<&OsStr>) -> bool {
        self.debug_clean.unwrap_or_else(|| debug_clean_from(var))
    }
}

/// Interprets a `DEBUG_CLEAN` value. Set and non-empty means enabled, so
/// `"0"` and `"false"` enable it too.
fn debug_clean_from(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
