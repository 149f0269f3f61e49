use std::path::PathBuf;

use anyhow::Context;
use dsprep::{DEFAULT_CHECKPOINTS_DIR, ensure_checkpoints_dir};
use tracing::info;

/// Make sure the checkpoints directory exists.
#[derive(Debug, clap::Args)]
pub struct Checkpoints {
    #[arg(long, env = "DSPREP_CHECKPOINTS_DIR", default_value = DEFAULT_CHECKPOINTS_DIR)]
    pub dir: PathBuf,
}

impl Checkpoints {
    pub fn run(self) -> anyhow::Result<()> {
        let created = ensure_checkpoints_dir(Some(&self.dir))
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        if created {
            info!(path = %self.dir.display(), "created checkpoints directory");
        }
        Ok(())
    }
}
