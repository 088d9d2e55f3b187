//! Domain models for requirement extraction.
//!
//! This module contains the core domain types including sections and their
//! identifiers, extracted requirements, token annotations and configuration.

/// Section identifiers, sections and sentence candidates.
pub mod section;
pub use section::{Candidate, Section, SectionId};

/// Extracted requirement records.
pub mod requirement;
pub use requirement::{Category, Confidence, Requirement, RequirementType};

mod annotation;
pub use annotation::{AnnotationError, DependencyRole, PartOfSpeech, Token, TokenAnnotation};

mod config;
pub use config::{CategoryRule, Config, ConfigError, ImplicitPattern, Scoring, Thresholds};

mod rules;
pub use rules::Rules;

/// Counts whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
