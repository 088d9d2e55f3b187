use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use sowreq::{Category, Config, Extractor, Requirement, RequirementType, storage};
use tracing::instrument;

use super::{
    OutputFormat,
    annotator::AnnotatorArgs,
    render_table,
    terminal::{self, Colorize},
    truncate,
};

#[derive(Debug, clap::Parser)]
pub struct Extract {
    /// Text documents, or directories to search for them
    #[arg(required = true, value_name = "PATH")]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    annotator: AnnotatorArgs,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Keep only requirements at or above this confidence
    #[arg(long, value_name = "SCORE")]
    min_confidence: Option<f64>,

    /// Omit the summary line
    #[arg(short, long)]
    quiet: bool,
}

/// One document's results.
struct Extracted {
    path: PathBuf,
    requirements: Vec<Requirement>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    document: &'a Path,
    fingerprint: String,
    #[serde(flatten)]
    requirement: &'a Requirement,
}

impl Extract {
    #[instrument(skip(config))]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        if let Some(min_confidence) = self.min_confidence {
            config.thresholds.min_confidence = min_confidence;
        }

        let annotator = self.annotator.build(&config)?;
        let extractor = Extractor::new(&config, annotator).context("invalid configuration")?;
        let paths = storage::collect_documents(&self.inputs)?;

        let progress = ProgressBar::new(paths.len() as u64);
        if self.output == OutputFormat::Table {
            progress.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")
                    .context("invalid progress template")?,
            );
        } else {
            progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }

        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let result = extractor.extract_document(path);
                progress.set_message(path.display().to_string());
                progress.inc(1);
                (path, result)
            })
            .collect();
        progress.finish_and_clear();

        let documents = results
            .into_iter()
            .map(|(path, result)| {
                result
                    .map(|requirements| Extracted {
                        path: path.clone(),
                        requirements,
                    })
                    .with_context(|| format!("failed to extract {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match self.output {
            OutputFormat::Table => {
                print_table(&documents);
                if !self.quiet {
                    println!();
                    println!("{}", summary(&documents));
                }
            }
            OutputFormat::Json => print_json(&documents)?,
        }
        Ok(())
    }
}

fn print_table(documents: &[Extracted]) {
    let multiple = documents.len() > 1;
    let mut headers = vec!["Section", "Type", "Conf", "Category", "Requirement"];
    if multiple {
        headers.insert(0, "Document");
    }

    // Room taken by the other columns and their gutters.
    let fixed = if multiple { 70 } else { 46 };
    let text_width = terminal::terminal_width().map_or(usize::MAX, |w| w.saturating_sub(fixed));

    let rows: Vec<Vec<String>> = documents
        .iter()
        .flat_map(|document| {
            let name = document.path.file_name().map_or_else(
                || document.path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            document.requirements.iter().map(move |requirement| {
                let mut row = vec![
                    requirement.section_id().to_string(),
                    requirement.kind().to_string(),
                    requirement.confidence().to_string(),
                    requirement.category().to_string(),
                    truncate(requirement.text(), text_width),
                ];
                if multiple {
                    row.insert(0, name.clone());
                }
                row
            })
        })
        .collect();

    let styles: Vec<fn(&str) -> String> = if multiple {
        vec![terminal::dimmed, terminal::plain, terminal::requirement_type]
    } else {
        vec![terminal::plain, terminal::requirement_type]
    };

    if rows.is_empty() {
        println!("{}", "No requirements found".dim());
        return;
    }
    render_table(&headers, &rows, &styles);
}

fn print_json(documents: &[Extracted]) -> anyhow::Result<()> {
    let rows: Vec<JsonRow<'_>> = documents
        .iter()
        .flat_map(|document| {
            document.requirements.iter().map(|requirement| JsonRow {
                document: &document.path,
                fingerprint: requirement.fingerprint(),
                requirement,
            })
        })
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

fn summary(documents: &[Extracted]) -> String {
    let requirements = || documents.iter().flat_map(|d| &d.requirements);

    let total = requirements().count();
    let mandatory = requirements()
        .filter(|r| r.kind() == RequirementType::Mandatory)
        .count();

    let mut by_category: BTreeMap<Category, usize> = BTreeMap::new();
    for requirement in requirements() {
        *by_category.entry(requirement.category()).or_default() += 1;
    }
    let categories = by_category
        .iter()
        .map(|(category, count)| format!("{category} {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut line = format!(
        "{total} requirements ({mandatory} mandatory, {} informative) from {} document{}",
        total - mandatory,
        documents.len(),
        if documents.len() == 1 { "" } else { "s" },
    );
    if !categories.is_empty() {
        line.push_str(&format!("; {categories}"));
    }
    line
}
