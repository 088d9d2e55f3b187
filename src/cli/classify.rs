use anyhow::Context;
use serde::Serialize;
use sowreq::{Config, Confidence, Extractor, RequirementType};
use tracing::instrument;

use super::{OutputFormat, annotator::AnnotatorArgs, render_table, terminal};

#[derive(Debug, clap::Parser)]
pub struct Classify {
    /// Sentences to classify
    #[arg(required = true, value_name = "SENTENCE")]
    sentences: Vec<String>,

    #[command(flatten)]
    annotator: AnnotatorArgs,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Serialize)]
struct Verdict<'a> {
    sentence: &'a str,
    #[serde(rename = "type")]
    kind: Option<RequirementType>,
    confidence: Confidence,
    kept: bool,
}

impl Classify {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let annotator = self.annotator.build(config)?;
        let extractor = Extractor::new(config, annotator)?;
        let min_confidence = config.thresholds.min_confidence;

        let verdicts = self
            .sentences
            .iter()
            .map(|sentence| {
                let classification = extractor
                    .classify(sentence)
                    .with_context(|| format!("failed to classify '{sentence}'"))?;
                Ok(Verdict {
                    sentence,
                    kind: classification.kind(),
                    confidence: classification.confidence(),
                    kept: classification.is_requirement()
                        && classification.confidence().get() >= min_confidence,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match self.output {
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = verdicts
                    .iter()
                    .map(|verdict| {
                        vec![
                            verdict
                                .kind
                                .map_or_else(|| "Rejected".to_string(), |kind| kind.to_string()),
                            verdict.confidence.to_string(),
                            if verdict.kept { "yes" } else { "no" }.to_string(),
                            verdict.sentence.to_string(),
                        ]
                    })
                    .collect();
                render_table(
                    &["Type", "Conf", "Kept", "Sentence"],
                    &rows,
                    &[terminal::requirement_type],
                );
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &verdicts)
                    .context("failed to render json output")?;
                println!();
            }
        }
        Ok(())
    }
}
