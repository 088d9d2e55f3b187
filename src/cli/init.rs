use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use anyhow::Context;
use dialoguer::Confirm;
use sowreq::{Config, storage::CONFIG_FILE};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Overwrite an existing file without asking
    #[arg(short, long)]
    force: bool,
}

impl Init {
    /// Writes the default configuration to `path`, or `./sowreq.toml`.
    #[instrument]
    pub fn run(self, path: Option<&Path>) -> anyhow::Result<()> {
        let path = path.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);

        if path.exists() && !self.force {
            if !std::io::stdin().is_terminal() {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let overwrite = Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite?", path.display()))
                .default(false)
                .interact()
                .context("failed to read confirmation")?;
            if !overwrite {
                println!("Left {} unchanged", path.display());
                return Ok(());
            }
        }

        Config::default()
            .save(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        println!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}
