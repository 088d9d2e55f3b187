use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::domain::{Category, Config, ConfigError, Scoring, Thresholds};

/// A validated, compiled [`Config`].
///
/// Rules are read-only once built and are shared by every stage of the
/// pipeline, including across worker threads.
#[derive(Debug, Clone)]
pub struct Rules {
    pub(crate) noise: Vec<Regex>,
    pub(crate) mandatory: Option<Regex>,
    pub(crate) informative: Option<Regex>,
    pub(crate) indicators: Option<Regex>,
    pub(crate) action_verbs: HashSet<String>,
    pub(crate) implicit: Vec<(Regex, f64)>,
    pub(crate) categories: Vec<(Category, Regex)>,
    pub(crate) conjunctions: Option<Regex>,
    pub(crate) thresholds: Thresholds,
    pub(crate) scoring: Scoring,
}

impl Rules {
    pub(crate) fn compile(config: &Config) -> Result<Self, ConfigError> {
        check_unit("thresholds.min_confidence", config.thresholds.min_confidence)?;
        let scoring = config.scoring;
        check_unit("scoring.mandatory_confidence", scoring.mandatory_confidence)?;
        check_unit("scoring.informative_confidence", scoring.informative_confidence)?;
        check_unit("scoring.action_verb_boost", scoring.action_verb_boost)?;
        check_unit("scoring.subject_boost", scoring.subject_boost)?;
        check_unit("scoring.verb_boost", scoring.verb_boost)?;

        let noise = config
            .noise_patterns
            .iter()
            .map(|pattern| multiline("noise_patterns", pattern))
            .collect::<Result<_, _>>()?;

        let implicit = config
            .implicit_patterns
            .iter()
            .enumerate()
            .map(|(index, implicit)| {
                check_unit(
                    &format!("implicit_patterns[{index}].confidence"),
                    implicit.confidence,
                )?;
                Ok((
                    insensitive("implicit_patterns", &implicit.pattern)?,
                    implicit.confidence,
                ))
            })
            .collect::<Result<_, ConfigError>>()?;

        let categories = config
            .categories
            .iter()
            .map(|rule| Ok((rule.category, insensitive("categories", &rule.pattern)?)))
            .collect::<Result<_, ConfigError>>()?;

        Ok(Self {
            noise,
            mandatory: phrases("mandatory_phrases", &config.mandatory_phrases)?,
            informative: phrases("informative_phrases", &config.informative_phrases)?,
            indicators: phrases(
                "non_requirement_indicators",
                &config.non_requirement_indicators,
            )?,
            action_verbs: config
                .action_verbs
                .iter()
                .map(|verb| verb.trim().to_lowercase())
                .collect(),
            implicit,
            categories,
            conjunctions: conjunctions(&config.split_conjunctions)?,
            thresholds: config.thresholds,
            scoring,
        })
    }

    /// The thresholds these rules were compiled with.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// The scoring parameters these rules were compiled with.
    #[must_use]
    pub const fn scoring(&self) -> &Scoring {
        &self.scoring
    }
}

impl Default for Rules {
    fn default() -> Self {
        Config::default()
            .compile()
            .expect("the default configuration is valid")
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

fn build(
    field: &'static str,
    pattern: &str,
    builder: &mut RegexBuilder,
) -> Result<Regex, ConfigError> {
    builder.build().map_err(|source| ConfigError::Pattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

fn multiline(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    build(field, pattern, RegexBuilder::new(pattern).multi_line(true))
}

fn insensitive(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    build(field, pattern, RegexBuilder::new(pattern).case_insensitive(true))
}

/// Builds a single whole-word alternation over a phrase list.
///
/// Returns `None` for an empty list, which then never matches.
fn phrases(field: &'static str, phrases: &[String]) -> Result<Option<Regex>, ConfigError> {
    let alternation = alternation(phrases);
    if alternation.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"\b(?:{alternation})\b");
    insensitive(field, &pattern).map(Some)
}

fn conjunctions(conjunctions: &[String]) -> Result<Option<Regex>, ConfigError> {
    let alternation = alternation(conjunctions);
    if alternation.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"\s+(?:{alternation})\s+");
    insensitive("split_conjunctions", &pattern).map(Some)
}

/// Escapes and joins phrases, longest first so multi-word phrases win.
fn alternation(phrases: &[String]) -> String {
    let mut escaped: Vec<String> = phrases
        .iter()
        .map(|phrase| phrase.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|phrase| !phrase.is_empty())
        .map(|phrase| regex::escape(&phrase).replace(' ', r"\s+"))
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    escaped.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImplicitPattern;

    #[test]
    fn default_config_compiles() {
        let rules = Config::default().compile().unwrap();
        assert_eq!(rules.categories.len(), 6);
        assert!(rules.action_verbs.contains("provide"));
    }

    #[test]
    fn phrases_match_whole_words_only() {
        let rules = Rules::default();
        let mandatory = rules.mandatory.as_ref().unwrap();

        assert!(mandatory.is_match("The vendor SHALL deliver"));
        assert!(mandatory.is_match("staff are required to attend"));
        assert!(!mandatory.is_match("the marshall will attend"));
    }

    #[test]
    fn multi_word_phrases_tolerate_wrapped_whitespace() {
        let rules = Rules::default();
        let informative = rules.informative.as_ref().unwrap();
        assert!(informative.is_match("the agency plans  to migrate"));
    }

    #[test]
    fn empty_lexicon_never_matches() {
        let config = Config {
            mandatory_phrases: Vec::new(),
            ..Config::default()
        };
        assert!(config.compile().unwrap().mandatory.is_none());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let config = Config {
            implicit_patterns: vec![ImplicitPattern {
                pattern: "(unclosed".to_string(),
                confidence: 0.5,
            }],
            ..Config::default()
        };

        let error = config.compile().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Pattern {
                field: "implicit_patterns",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_confidence_is_reported() {
        let mut config = Config::default();
        config.implicit_patterns[2].confidence = 1.5;

        let error = config.compile().unwrap_err();
        match error {
            ConfigError::OutOfRange { field, .. } => {
                assert_eq!(field, "implicit_patterns[2].confidence");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
