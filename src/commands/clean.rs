use std::path::PathBuf;

use async_trait::async_trait;
use console::style;

use super::{Command, INFO_PREFIX, SUCCESS_PREFIX};
use crate::environment::{CleanOptions, TestEnv};
use crate::error::Result;

/// Empties (or deletes) the output directory or one of its subdirectories.
pub struct Cleaner {
    env: TestEnv,
    subdir: Option<PathBuf>,
    remove: bool,
    force: bool,
    quiet: bool,
}

impl Cleaner {
    pub fn new(
        env: TestEnv,
        subdir: Option<PathBuf>,
        remove: bool,
        force: bool,
        quiet: bool,
    ) -> Self {
        Self {
            env,
            subdir,
            remove,
            force,
            quiet,
        }
    }

    /// The directory this command acts on.
    pub fn target(&self) -> PathBuf {
        match &self.subdir {
            Some(subdir) => self.env.output_path(subdir),
            None => self.env.output_root(),
        }
    }
}

#[async_trait]
impl Command for Cleaner {
    async fn execute(&self) -> Result<()> {
        let target = self.target();
        let options = CleanOptions { force: self.force };

        log::debug!(
            "Clean target: {:?}, remove: {}, force: {}",
            target,
            self.remove,
            self.force
        );

        let affected = if self.remove {
            self.env.remove(&target, options).await?
        } else {
            self.env.clean(&target, options).await?
        };

        if !self.quiet {
            if self.env.debug_clean() {
                println!(
                    "{} DEBUG_CLEAN is set, left in place: {}",
                    style(INFO_PREFIX).blue().bold(),
                    style(affected.display()).cyan()
                );
            } else {
                let verb = if self.remove { "Removed" } else { "Cleaned" };
                println!(
                    "{} {}: {}",
                    style(SUCCESS_PREFIX).green().bold(),
                    verb,
                    style(affected.display()).cyan()
                );
            }
        }

        Ok(())
    }
}
