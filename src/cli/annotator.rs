use anyhow::Context;
use clap::ValueEnum;
use sowreq::{Annotator, CommandAnnotator, Config, LexiconAnnotator, NoAnnotation};

/// Which linguistic annotator feeds the classifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum AnnotatorKind {
    /// No annotation; lexicons and patterns only
    None,
    /// The built-in rule-based English tagger
    #[default]
    Lexicon,
    /// An external program speaking JSON on stdin/stdout
    Command,
}

#[derive(Debug, clap::Args)]
pub struct AnnotatorArgs {
    /// Linguistic annotator used for confidence boosts
    #[arg(long, value_enum, default_value_t)]
    annotator: AnnotatorKind,

    /// Command line of the external annotator (with `--annotator command`)
    #[arg(long, value_name = "COMMAND", required_if_eq("annotator", "command"))]
    annotator_command: Option<String>,
}

impl AnnotatorArgs {
    /// Builds the annotator once, for the lifetime of the command.
    pub fn build(&self, config: &Config) -> anyhow::Result<Box<dyn Annotator>> {
        Ok(match self.annotator {
            AnnotatorKind::None => Box::new(NoAnnotation),
            AnnotatorKind::Lexicon => {
                Box::new(LexiconAnnotator::default().with_verbs(&config.action_verbs))
            }
            AnnotatorKind::Command => {
                let command_line = self.annotator_command.as_deref().unwrap_or_default();
                let annotator = CommandAnnotator::from_command_line(command_line)
                    .context("--annotator-command must name a program")?;
                Box::new(annotator)
            }
        })
    }
}
