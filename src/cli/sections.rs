use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use sowreq::{Config, Document, Extractor, Section, domain::word_count};
use tracing::instrument;

use super::{OutputFormat, render_table, terminal, truncate};

#[derive(Debug, clap::Parser)]
pub struct Sections {
    /// The text document to segment
    #[arg(value_name = "PATH")]
    input: PathBuf,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Serialize)]
struct JsonSection<'a> {
    id: &'a str,
    title: &'a str,
    content: &'a str,
    start: usize,
    end: usize,
}

impl<'a> From<&'a Section> for JsonSection<'a> {
    fn from(section: &'a Section) -> Self {
        Self {
            id: section.id().as_str(),
            title: section.title(),
            content: section.content(),
            start: section.span().start,
            end: section.span().end,
        }
    }
}

impl Sections {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let extractor = Extractor::new(config, sowreq::NoAnnotation)?;
        let document = Document::load(&self.input)?;
        let normalized = extractor.normalize(document.text());
        let sections = extractor.sections(&normalized);

        match self.output {
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = sections
                    .iter()
                    .map(|section| {
                        vec![
                            section.id().to_string(),
                            word_count(section.content()).to_string(),
                            truncate(section.title(), 60),
                        ]
                    })
                    .collect();
                render_table(&["Section", "Words", "Title"], &rows, &[terminal::plain]);
            }
            OutputFormat::Json => {
                let sections: Vec<JsonSection<'_>> = sections.iter().map(Into::into).collect();
                serde_json::to_writer_pretty(std::io::stdout(), &sections)
                    .context("failed to render json output")?;
                println!();
            }
        }
        Ok(())
    }
}
