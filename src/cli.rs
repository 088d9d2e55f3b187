use std::path::PathBuf;

mod annotator;
mod classify;
mod config;
mod extract;
mod init;
mod normalize;
mod sections;
mod terminal;

use clap::{ArgAction, ValueEnum};
use sowreq::storage::load_config;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./sowreq.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Extract requirements from documents or directories of documents
    Extract(extract::Extract),

    /// Show the sections recovered from a document
    Sections(sections::Sections),

    /// Print a document's normalised text
    Normalize(normalize::Normalize),

    /// Classify individual sentences
    Classify(classify::Classify),

    /// Write a configuration file populated with the defaults
    Init(init::Init),

    /// Print the effective configuration
    Config(config::ShowConfig),
}

impl Command {
    fn run(self, config_path: Option<PathBuf>) -> anyhow::Result<()> {
        let config_path = config_path.as_deref();
        match self {
            Self::Extract(command) => command.run(load_config(config_path)?)?,
            Self::Sections(command) => command.run(&load_config(config_path)?)?,
            Self::Normalize(command) => command.run(&load_config(config_path)?)?,
            Self::Classify(command) => command.run(&load_config(config_path)?)?,
            Self::Init(command) => command.run(config_path)?,
            Self::Config(command) => command.run(&load_config(config_path)?)?,
        }
        Ok(())
    }
}

/// Output format shared by the reporting commands.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints rows as an aligned table.
///
/// `styles` is applied to each cell after padding, so colour codes do not
/// upset the alignment.
fn render_table(headers: &[&str], rows: &[Vec<String>], styles: &[fn(&str) -> String]) {
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    let last = headers.len().saturating_sub(1);
    for (idx, header) in headers.iter().enumerate() {
        let width = if idx == last { 0 } else { widths[idx] };
        print!("{header:<width$}  ");
    }
    println!();
    for (idx, width) in widths.iter().enumerate() {
        let width = if idx == last { headers[idx].len() } else { *width };
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in rows {
        for (idx, value) in row.iter().enumerate() {
            let width = if idx == last { 0 } else { widths[idx] };
            let padded = format!("{value:<width$}");
            let styled = match styles.get(idx) {
                Some(style) => style(&padded),
                None => padded,
            };
            print!("{styled}  ");
        }
        println!();
    }
}

/// Shortens `text` to at most `width` characters.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width || width < 4 {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 1).collect();
    format!("{}…", kept.trim_end())
}
