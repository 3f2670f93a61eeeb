use async_trait::async_trait;
use console::style;

use super::{Command, INFO_PREFIX, SUCCESS_PREFIX};
use crate::environment::TestEnv;
use crate::error::Result;

/// Deletes every `tmp-` directory in the output directory.
pub struct TmpPurger {
    env: TestEnv,
    quiet: bool,
}

impl TmpPurger {
    pub fn new(env: TestEnv, quiet: bool) -> Self {
        Self { env, quiet }
    }
}

#[async_trait]
impl Command for TmpPurger {
    async fn execute(&self) -> Result<()> {
        let removed = self.env.remove_all_output_tmp().await?;

        log::info!("Purged {} tmp directories", removed.len());

        if self.quiet {
            return Ok(());
        }

        if removed.is_empty() {
            println!(
                "{} No {}* directories in: {}",
                style(INFO_PREFIX).blue().bold(),
                self.env.tmp_prefix(),
                style(self.env.output_root().display()).cyan()
            );
            return Ok(());
        }

        let prefix = if self.env.debug_clean() {
            style(INFO_PREFIX).blue().bold()
        } else {
            style(SUCCESS_PREFIX).green().bold()
        };
        for dir in &removed {
            println!("{} {}", prefix, style(dir.display()).cyan());
        }

        Ok(())
    }
}
