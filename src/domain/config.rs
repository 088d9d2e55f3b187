use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Rules};

/// Configuration for requirement extraction.
///
/// Everything here is data: lexicons, pattern tables and numeric thresholds.
/// [`Config::compile`] validates it and turns it into [`Rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Phrases that mark a binding obligation (`shall`, `must`, ...).
    ///
    /// Matched case-insensitively as whole words or phrases.
    pub mandatory_phrases: Vec<String>,

    /// Phrases that mark a weaker commitment (`will`, `plans to`, ...).
    pub informative_phrases: Vec<String>,

    /// Verb lemmas that boost confidence when a candidate uses them.
    pub action_verbs: Vec<String>,

    /// Phrases whose presence rejects a candidate outright (table-of-contents
    /// markers, page banners).
    pub non_requirement_indicators: Vec<String>,

    /// Regular expressions tried, in order, when neither lexicon matches.
    pub implicit_patterns: Vec<ImplicitPattern>,

    /// Topic patterns, in precedence order. The first match wins.
    pub categories: Vec<CategoryRule>,

    /// Regular expressions for boilerplate removed during normalisation.
    ///
    /// Each pattern is applied line by line; lines left blank by the removal
    /// are dropped entirely.
    pub noise_patterns: Vec<String>,

    /// Conjunctions that long informative requirements are split on.
    pub split_conjunctions: Vec<String>,

    /// Word-count and confidence thresholds.
    pub thresholds: Thresholds,

    /// Base confidences and linguistic boosts.
    pub scoring: Scoring,
}

/// An implicit-requirement pattern paired with the confidence it seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitPattern {
    /// Case-insensitive regular expression.
    pub pattern: String,
    /// Base confidence assigned when the pattern matches.
    pub confidence: f64,
}

/// A category paired with the pattern that selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// The category assigned on a match.
    pub category: Category,
    /// Case-insensitive regular expression.
    pub pattern: String,
}

/// Numeric thresholds used across the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A section is kept only if its title and content together have more
    /// words than this.
    pub min_section_words: usize,

    /// Sentence candidates with fewer words than this are discarded.
    pub min_candidate_words: usize,

    /// Candidates with fewer words than this are rejected by the classifier.
    pub min_requirement_words: usize,

    /// Accepted candidates below this confidence are not kept.
    pub min_confidence: f64,

    /// Informative requirements with more words than this are split.
    pub split_threshold_words: usize,

    /// Every clause of a split must have more words than this.
    pub min_split_words: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_section_words: 10,
            min_candidate_words: 3,
            min_requirement_words: 5,
            min_confidence: 0.6,
            split_threshold_words: 30,
            min_split_words: 10,
        }
    }
}

/// Confidence arithmetic for the classifier.
///
/// The final score is the base confidence plus any applicable boosts, clamped
/// to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    /// Base confidence when the mandatory lexicon matches.
    pub mandatory_confidence: f64,

    /// Base confidence when the informative lexicon matches.
    pub informative_confidence: f64,

    /// Added when a verb's lemma is in the action-verb set.
    pub action_verb_boost: f64,

    /// Added when a token is a nominal subject.
    pub subject_boost: f64,

    /// Added when the candidate contains any verb.
    pub verb_boost: f64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            mandatory_confidence: 0.8,
            informative_confidence: 0.6,
            action_verb_boost: 0.15,
            subject_boost: 0.15,
            verb_boost: 0.1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mandatory_phrases: strings(DEFAULT_MANDATORY),
            informative_phrases: strings(DEFAULT_INFORMATIVE),
            action_verbs: strings(DEFAULT_ACTION_VERBS),
            non_requirement_indicators: strings(DEFAULT_INDICATORS),
            implicit_patterns: default_implicit_patterns(),
            categories: default_categories(),
            noise_patterns: strings(DEFAULT_NOISE),
            split_conjunctions: strings(DEFAULT_CONJUNCTIONS),
            thresholds: Thresholds::default(),
            scoring: Scoring::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validates the configuration and compiles its patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid regular expression, or if a
    /// confidence value lies outside `[0, 1]`.
    pub fn compile(&self) -> Result<Rules, ConfigError> {
        Rules::compile(self)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

const DEFAULT_MANDATORY: &[&str] = &[
    "shall",
    "must",
    "required to",
    "responsible for",
    "directed to",
    "shall provide",
    "shall develop",
    "shall support",
    "shall describe",
    "shall coordinate",
    "shall ensure",
    "shall comply",
    "shall implement",
    "required",
    "mandatory",
    "essential",
    "critical",
    "shall be",
    "is required",
    "are required",
    "must be",
    "must have",
];

const DEFAULT_INFORMATIVE: &[&str] = &[
    "will",
    "plans to",
    "anticipates",
    "anticipated",
    "intends to",
    "to be implemented",
    "to support",
    "to utilize",
    "to replace",
    "like-for-like",
    "equivalent basis",
    "will address",
    "will include",
    "should",
    "expected to",
    "recommended",
    "proposed",
    "will be",
    "should be",
    "may be",
    "can be",
];

const DEFAULT_ACTION_VERBS: &[&str] = &[
    "provide",
    "implement",
    "support",
    "maintain",
    "develop",
    "establish",
    "ensure",
    "perform",
    "deliver",
    "create",
    "replace",
    "transition",
    "utilize",
    "coordinate",
    "design",
    "install",
    "configure",
    "manage",
    "operate",
    "test",
    "verify",
    "document",
    "report",
    "monitor",
];

const DEFAULT_INDICATORS: &[&str] = &[
    "table of contents",
    "for official use only",
    "source selection sensitive",
    "source-selection-sensitive",
    "page",
];

const DEFAULT_NOISE: &[&str] = &[
    r"(?i)\b(?:page|paeg)\s*\d+\s*(?:of|fo)\s*\d+\b",
    r"(?i)^\s*page\s+\d+\s*$",
    r"^\s*\d+\s*$",
    r"(?i)for\s+official\s+use\s+only",
    r"(?:ioFrf|For)\s*Ofiacs\s*l\s*UOneyl",
    r"(?i)source[\s-]+selection[\s-]+sensitive",
    r"oSuerc\s*-\s*leStcoien\s*-\s*Snestivie",
    r"(?i)^\s*table\s+of\s+contents\s*$",
    r"^.*\.{3,}\s*\d+\s*$",
    r"\(cid:\d*\)",
];

const DEFAULT_CONJUNCTIONS: &[&str] = &[
    "and",
    "or",
    "as well as",
    "additionally",
    "furthermore",
    "moreover",
];

fn default_implicit_patterns() -> Vec<ImplicitPattern> {
    [
        (
            r"\bthis (?:sow|statement of work)\b.*?\b(?:address|describe|define|specify|outline)",
            0.6,
        ),
        (
            r"\b(?:agency|government|customer|client)\b.*?\b(?:plans|intends|needs|requires)\b",
            0.7,
        ),
        (
            r"\b(?:like-for-like|equivalent)\b.*?\b(?:basis|service|replacement|solution)",
            0.7,
        ),
        (
            r"\b(?:transition|replace|support|utilize)\b.*?\b(?:service|requirement|system|solution)s?\b",
            0.7,
        ),
        (
            r"\b(?:contractor|vendor|provider)\b.*?\b(?:responsible|accountable)",
            0.8,
        ),
        (
            r"\b(?:service|system|solution)\b.*?\b(?:must|should|shall|will)\b",
            0.8,
        ),
    ]
    .into_iter()
    .map(|(pattern, confidence)| ImplicitPattern {
        pattern: pattern.to_string(),
        confidence,
    })
    .collect()
}

fn default_categories() -> Vec<CategoryRule> {
    [
        (
            Category::Technical,
            r"\b(?:technical|system|software|hardware|network|infrastructure|security)\b",
        ),
        (
            Category::Process,
            r"\b(?:process|procedure|workflow|method|approach|implementation)\b",
        ),
        (
            Category::Service,
            r"\b(?:service|support|maintenance|operation|performance)\b",
        ),
        (
            Category::Documentation,
            r"\b(?:document|report|plan|deliverable|submission)\b",
        ),
        (
            Category::Compliance,
            r"\b(?:comply|compliance|requirement|standard|regulation|policy)\b",
        ),
        (
            Category::Training,
            r"\b(?:training|instruction|education|knowledge|skill)\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| CategoryRule {
        category,
        pattern: pattern.to_string(),
    })
    .collect()
}

/// Errors raised while loading, saving or compiling a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file '{path}'")]
    Read {
        /// The file that was read.
        path: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config file '{path}'")]
    Parse {
        /// The file that was parsed.
        path: String,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config")]
    Serialize(#[source] toml::ser::Error),

    /// The configuration file could not be written.
    #[error("Failed to write config file '{path}'")]
    Write {
        /// The file that was written.
        path: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A configured pattern is not a valid regular expression.
    #[error("Invalid pattern in {field}: '{pattern}'")]
    Pattern {
        /// The configuration field holding the pattern.
        field: &'static str,
        /// The offending pattern.
        pattern: String,
        /// The underlying error.
        #[source]
        source: regex::Error,
    },

    /// A confidence or boost lies outside `[0, 1]`.
    #[error("{field} must lie within [0, 1], got {value}")]
    OutOfRange {
        /// The configuration field holding the value.
        field: String,
        /// The offending value.
        value: f64,
    },
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1(V1),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct V1 {
    mandatory_phrases: Vec<String>,
    informative_phrases: Vec<String>,
    action_verbs: Vec<String>,
    non_requirement_indicators: Vec<String>,
    noise_patterns: Vec<String>,
    split_conjunctions: Vec<String>,
    thresholds: Thresholds,
    scoring: Scoring,
    implicit_patterns: Vec<ImplicitPattern>,
    categories: Vec<CategoryRule>,
}

impl Default for V1 {
    fn default() -> Self {
        Config::default().into_v1()
    }
}

impl Config {
    fn into_v1(self) -> V1 {
        V1 {
            mandatory_phrases: self.mandatory_phrases,
            informative_phrases: self.informative_phrases,
            action_verbs: self.action_verbs,
            non_requirement_indicators: self.non_requirement_indicators,
            noise_patterns: self.noise_patterns,
            split_conjunctions: self.split_conjunctions,
            thresholds: self.thresholds,
            scoring: self.scoring,
            implicit_patterns: self.implicit_patterns,
            categories: self.categories,
        }
    }
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1(v1) => Self {
                mandatory_phrases: v1.mandatory_phrases,
                informative_phrases: v1.informative_phrases,
                action_verbs: v1.action_verbs,
                non_requirement_indicators: v1.non_requirement_indicators,
                implicit_patterns: v1.implicit_patterns,
                categories: v1.categories,
                noise_patterns: v1.noise_patterns,
                split_conjunctions: v1.split_conjunctions,
                thresholds: v1.thresholds,
                scoring: v1.scoring,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1(config.into_v1())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmandatory_phrases = [\"shall\"]\n\n[thresholds]\nmin_confidence = 0.7\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.mandatory_phrases, ["shall".to_string()]);
        assert!((config.thresholds.min_confidence - 0.7).abs() < f64::EPSILON);
        // unspecified threshold fields keep their defaults
        assert_eq!(config.thresholds.min_section_words, 10);
        assert_eq!(config.informative_phrases, Config::default().informative_phrases);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\n[thresholds]\nmin_section_words = \"ten\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sowreq.toml");

        let mut config = Config::default();
        config.categories.truncate(2);
        config.implicit_patterns[0].confidence = 0.65;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(std::fs::read_to_string(&path).unwrap().contains("_version = \"1\""));
    }

    #[test]
    fn default_category_order_is_precedence_order() {
        let order: Vec<Category> = Config::default()
            .categories
            .iter()
            .map(|rule| rule.category)
            .collect();
        assert_eq!(order, &Category::ALL[..6]);
    }
}
