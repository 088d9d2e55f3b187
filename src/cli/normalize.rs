use std::path::PathBuf;

use sowreq::{Config, Document, Extractor, NoAnnotation};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Normalize {
    /// The text document to normalise
    #[arg(value_name = "PATH")]
    input: PathBuf,
}

impl Normalize {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let extractor = Extractor::new(config, NoAnnotation)?;
        let document = Document::load(&self.input)?;
        println!("{}", extractor.normalize(document.text()));
        Ok(())
    }
}
