//! `sowreq`: extract structured requirements from Statement-of-Work documents.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
