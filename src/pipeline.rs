//! The extraction pipeline.
//!
//! Text flows strictly forward: [`normalize`] → [`segment`] → [`sentence`] →
//! [`classify`] → [`postprocess`]. Every stage is infallible on ordinary input;
//! only the annotator can fail.

use std::path::Path;

use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::{
    Error,
    annotate::{Annotator, NoAnnotation},
    domain::{AnnotationError, Candidate, Config, ConfigError, Requirement, Rules, Section},
    storage::Document,
};

pub mod classify;
mod header;
pub mod normalize;
pub mod postprocess;
pub mod segment;
pub mod sentence;

pub use classify::Classification;

/// Runs the full pipeline with a fixed rule set and annotator.
///
/// An extractor is built once and can be shared between threads; it holds no
/// mutable state.
#[derive(Debug, Clone)]
pub struct Extractor<A = NoAnnotation> {
    rules: Rules,
    annotator: A,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::with_rules(Rules::default(), NoAnnotation)
    }
}

impl<A: Annotator> Extractor<A> {
    /// Compiles `config` and pairs it with `annotator`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &Config, annotator: A) -> Result<Self, ConfigError> {
        Ok(Self::with_rules(config.compile()?, annotator))
    }

    /// Builds an extractor from already-compiled rules.
    #[must_use]
    pub const fn with_rules(rules: Rules, annotator: A) -> Self {
        Self { rules, annotator }
    }

    /// The compiled rules.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The annotator.
    #[must_use]
    pub const fn annotator(&self) -> &A {
        &self.annotator
    }

    /// Cleans raw document text.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        normalize::normalize(text, &self.rules.noise)
    }

    /// Slices normalised text into sections.
    #[must_use]
    pub fn sections(&self, normalized: &str) -> Vec<Section> {
        segment::segment(normalized, self.rules.thresholds.min_section_words)
    }

    /// Splits sections into candidate sentences, in document order.
    #[must_use]
    pub fn candidates(&self, sections: &[Section]) -> Vec<Candidate> {
        let min_words = self.rules.thresholds.min_candidate_words;
        sections
            .par_iter()
            .flat_map_iter(|section| sentence::extract_candidates(section, min_words))
            .collect()
    }

    /// Annotates and classifies a single sentence.
    ///
    /// # Errors
    ///
    /// Returns an error if the annotator fails.
    pub fn classify(&self, sentence: &str) -> Result<Classification, AnnotationError> {
        let tokens = self.annotator.annotate(sentence)?;
        Ok(classify::classify(sentence, &tokens, &self.rules))
    }

    /// Extracts the requirements from raw document text.
    ///
    /// The result is sorted and free of duplicates. A document with no
    /// recognisable sections yields no requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the annotator fails.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn extract(&self, text: &str) -> Result<Vec<Requirement>, AnnotationError> {
        let normalized = self.normalize(text);
        let sections = self.sections(&normalized);
        let candidates = self.candidates(&sections);
        debug!(
            sections = sections.len(),
            candidates = candidates.len(),
            "segmented document"
        );

        let sentences: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        let annotations = self.annotator.annotate_batch(&sentences)?;
        if annotations.len() != sentences.len() {
            return Err(AnnotationError::CountMismatch {
                expected: sentences.len(),
                actual: annotations.len(),
            });
        }

        let min_confidence = self.rules.thresholds.min_confidence;
        let accepted: Vec<Requirement> = candidates
            .par_iter()
            .zip(annotations.par_iter())
            .filter_map(|(candidate, tokens)| {
                match classify::classify(&candidate.text, tokens, &self.rules) {
                    Classification::Accepted { kind, confidence }
                        if confidence.get() >= min_confidence =>
                    {
                        Some(Requirement::new(
                            candidate.section_id.clone(),
                            candidate.text.clone(),
                            kind,
                            confidence,
                        ))
                    }
                    _ => None,
                }
            })
            .collect();
        debug!(accepted = accepted.len(), "classified candidates");

        Ok(postprocess::post_process(accepted, &self.rules))
    }

    /// Loads a document and extracts its requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or the annotator
    /// fails.
    #[instrument(skip(self))]
    pub fn extract_document(&self, path: &Path) -> Result<Vec<Requirement>, Error> {
        let document = Document::load(path)?;
        let requirements = self.extract(document.text())?;
        info!(requirements = requirements.len(), "extracted document");
        Ok(requirements)
    }
}
