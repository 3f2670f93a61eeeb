//! fixture-env library.
//!
//! Resolves a project's `test/fixture` and `test/output` directories, copies
//! fixtures into scratch output locations and cleans those locations up
//! again, refusing to delete anything outside the project.
//!
//! ```no_run
//! use fixture_env::TestEnv;
//!
//! # async fn run() -> fixture_env::Result<()> {
//! let env = TestEnv::setup(env!("CARGO_MANIFEST_DIR"))?;
//! let out = env.output("newdir");
//! out.copy_into("files", "subdir").await?;
//! // ... exercise the code under test against out.path("subdir") ...
//! out.remove().await?;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod logger;
pub mod scratch;
pub mod services;

pub use config::EnvOptions;
pub use environment::{CleanOptions, TestEnv};
pub use error::{Error, Result};
pub use scratch::{PathArg, TestEnvPath};
