//! Maintenance commands run by the `fxenv` binary.

pub mod clean;
pub mod copy;
pub mod paths;
pub mod purge_tmp;

use async_trait::async_trait;

use crate::error::Result;

// Styled output prefixes (Classic ASCII)
pub(crate) const SUCCESS_PREFIX: &str = "[OK]";
pub(crate) const INFO_PREFIX: &str = "[*]";

#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self) -> Result<()>;
}
