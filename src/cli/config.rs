use sowreq::Config;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct ShowConfig {
    /// Validate the configuration without printing it
    #[arg(long)]
    check: bool,
}

impl ShowConfig {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        config.compile()?;
        if self.check {
            println!("Configuration is valid");
        } else {
            print!("{}", config.to_toml()?);
        }
        Ok(())
    }
}
