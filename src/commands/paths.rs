use async_trait::async_trait;
use console::style;

use super::Command;
use crate::environment::TestEnv;
use crate::error::Result;

/// Prints the resolved project paths.
pub struct PathsReport {
    env: TestEnv,
}

impl PathsReport {
    pub fn new(env: TestEnv) -> Self {
        Self { env }
    }

    /// Label/path pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, std::path::PathBuf)> {
        vec![
            ("base", self.env.base_dir().to_path_buf()),
            ("test", self.env.test_root()),
            ("fixture", self.env.fixture_root()),
            ("output", self.env.output_root()),
        ]
    }
}

#[async_trait]
impl Command for PathsReport {
    async fn execute(&self) -> Result<()> {
        for (label, path) in self.entries() {
            println!("{:<8} {}", style(label).bold(), style(path.display()).cyan());
        }
        Ok(())
    }
}
