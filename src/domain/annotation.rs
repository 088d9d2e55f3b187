use std::io;

use serde::{Deserialize, Serialize};

/// The facts the classifier reads from an annotated token.
///
/// Implementations can wrap any linguistic-annotation backend.
pub trait TokenAnnotation {
    /// The token's dictionary form.
    fn lemma(&self) -> &str;

    /// Whether the token is a verb.
    fn is_verb(&self) -> bool;

    /// Whether the token is the nominal subject of its clause.
    fn is_nominal_subject(&self) -> bool;
}

/// Coarse part-of-speech tags, named after the Universal Dependencies set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    /// Adjective.
    Adj,
    /// Adposition.
    Adp,
    /// Adverb.
    Adv,
    /// Auxiliary or modal verb.
    Aux,
    /// Coordinating conjunction.
    Cconj,
    /// Determiner.
    Det,
    /// Common noun.
    Noun,
    /// Numeral.
    Num,
    /// Particle.
    Part,
    /// Pronoun.
    Pron,
    /// Proper noun.
    Propn,
    /// Punctuation.
    Punct,
    /// Main verb.
    Verb,
    /// Any other tag.
    #[serde(other)]
    Other,
}

/// Syntactic dependency roles the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyRole {
    /// Nominal subject of an active clause.
    #[serde(rename = "nsubj")]
    NominalSubject,
    /// Nominal subject of a passive clause.
    #[serde(rename = "nsubjpass")]
    PassiveSubject,
    /// Root of the sentence.
    #[serde(rename = "ROOT")]
    Root,
    /// Direct object.
    #[serde(rename = "dobj")]
    Object,
    /// Any other role.
    #[serde(other)]
    Other,
}

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The dictionary form of the token.
    pub lemma: String,
    /// The coarse part-of-speech tag.
    pub pos: PartOfSpeech,
    /// The dependency role of the token.
    pub dep: DependencyRole,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(lemma: impl Into<String>, pos: PartOfSpeech, dep: DependencyRole) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
            dep,
        }
    }
}

impl TokenAnnotation for Token {
    fn lemma(&self) -> &str {
        &self.lemma
    }

    fn is_verb(&self) -> bool {
        self.pos == PartOfSpeech::Verb
    }

    fn is_nominal_subject(&self) -> bool {
        self.dep == DependencyRole::NominalSubject
    }
}

/// Errors raised by a linguistic annotator.
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    /// The annotator process could not be started.
    #[error("annotator '{command}' is unavailable")]
    Unavailable {
        /// The command that failed to start.
        command: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The annotator ran but reported failure.
    #[error("annotator '{command}' failed ({status}): {stderr}")]
    Failed {
        /// The command that failed.
        command: String,
        /// The exit status, as reported by the OS.
        status: String,
        /// Whatever the annotator wrote to stderr.
        stderr: String,
    },

    /// The annotator's output could not be decoded.
    #[error("annotator produced malformed output")]
    Malformed(#[from] serde_json::Error),

    /// The annotator returned a different number of results than requested.
    #[error("annotator returned {actual} annotations for {expected} sentences")]
    CountMismatch {
        /// How many sentences were sent.
        expected: usize,
        /// How many annotations came back.
        actual: usize,
    },

    /// An I/O error occurred while talking to the annotator.
    #[error("failed to communicate with annotator")]
    Io(#[from] io::Error),
}
