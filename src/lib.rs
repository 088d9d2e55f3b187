//! Statement-of-Work requirement extraction
//!
//! Turns the flattened text of a requirements document into a deterministic,
//! categorised list of individual requirements.

pub mod domain;
pub use domain::{
    AnnotationError, Candidate, Category, Confidence, Config, ConfigError, Requirement,
    RequirementType, Rules, Section, SectionId, Token, TokenAnnotation,
};

pub mod annotate;
pub use annotate::{Annotator, CommandAnnotator, LexiconAnnotator, NoAnnotation};

pub mod pipeline;
pub use pipeline::{Classification, Extractor};

pub mod storage;
pub use storage::{Document, LoadError};

/// Errors surfaced by the collaborators around the extraction core.
///
/// The core itself never fails on bad input; it yields fewer (or no)
/// requirements instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document loader failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The linguistic annotator failed.
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// The configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
