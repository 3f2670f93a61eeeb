use std::path::PathBuf;

use async_trait::async_trait;
use console::style;

use super::{Command, SUCCESS_PREFIX};
use crate::environment::TestEnv;
use crate::error::Result;

/// Copies a fixture into the output directory.
pub struct Copier {
    env: TestEnv,
    fixture: PathBuf,
    output: Option<PathBuf>,
    tmp: bool,
    quiet: bool,
}

impl Copier {
    pub fn new(
        env: TestEnv,
        fixture: PathBuf,
        output: Option<PathBuf>,
        tmp: bool,
        quiet: bool,
    ) -> Self {
        Self {
            env,
            fixture,
            output,
            tmp,
            quiet,
        }
    }
}

#[async_trait]
impl Command for Copier {
    async fn execute(&self) -> Result<()> {
        log::debug!(
            "Copy fixture: {:?}, output: {:?}, tmp: {}",
            self.fixture,
            self.output,
            self.tmp
        );

        let dest = if self.tmp {
            let dest = match &self.output {
                Some(rel) => self.env.output_tmp_path_join(None, rel),
                None => self.env.output_tmp_path(None),
            };
            self.env
                .copy(&self.env.fixture_path(&self.fixture), &dest)
                .await?;
            dest
        } else {
            let output = self.output.as_ref().unwrap_or(&self.fixture);
            self.env
                .copy_fixture_to_output_as(&self.fixture, output)
                .await?
        };

        log::info!("Copied fixture {:?} to {:?}", self.fixture, dest);

        if !self.quiet {
            println!(
                "{} Copied to: {}",
                style(SUCCESS_PREFIX).green().bold(),
                style(dest.display()).cyan()
            );
        }

        Ok(())
    }
}
