//! Requirement classification of a single candidate sentence.

use tracing::trace;

use crate::domain::{Confidence, RequirementType, Rules, TokenAnnotation, word_count};

/// The classifier's verdict on a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The candidate is not a requirement.
    Rejected,
    /// The candidate is a requirement.
    Accepted {
        /// Mandatory or informative.
        kind: RequirementType,
        /// The combined confidence, in `[0, 1]`.
        confidence: Confidence,
    },
}

impl Classification {
    /// Whether the candidate was accepted.
    #[must_use]
    pub const fn is_requirement(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The requirement type, if accepted.
    #[must_use]
    pub const fn kind(&self) -> Option<RequirementType> {
        match self {
            Self::Rejected => None,
            Self::Accepted { kind, .. } => Some(*kind),
        }
    }

    /// The confidence; zero when rejected.
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        match self {
            Self::Rejected => Confidence::ZERO,
            Self::Accepted { confidence, .. } => *confidence,
        }
    }
}

/// Classifies one candidate sentence.
///
/// The lexicons decide the type and the base confidence: a mandatory phrase
/// wins over an informative one, and the implicit patterns are only consulted
/// when neither matched. Linguistic boosts from `tokens` are then added and the
/// sum is clamped to `[0, 1]`.
pub fn classify<T: TokenAnnotation>(text: &str, tokens: &[T], rules: &Rules) -> Classification {
    if word_count(text) < rules.thresholds.min_requirement_words {
        trace!(text, "rejected: too short");
        return Classification::Rejected;
    }
    if rules.indicators.as_ref().is_some_and(|re| re.is_match(text)) {
        trace!(text, "rejected: non-requirement indicator");
        return Classification::Rejected;
    }

    let scoring = &rules.scoring;
    let (kind, base) = if rules.mandatory.as_ref().is_some_and(|re| re.is_match(text)) {
        (RequirementType::Mandatory, scoring.mandatory_confidence)
    } else if rules.informative.as_ref().is_some_and(|re| re.is_match(text)) {
        (RequirementType::Informative, scoring.informative_confidence)
    } else if let Some((_, confidence)) = rules.implicit.iter().find(|(re, _)| re.is_match(text))
    {
        (RequirementType::Informative, *confidence)
    } else {
        trace!(text, "rejected: no obligation language");
        return Classification::Rejected;
    };

    let mut boost = 0.0;
    if tokens
        .iter()
        .any(|t| t.is_verb() && rules.action_verbs.contains(&t.lemma().to_lowercase()))
    {
        boost += scoring.action_verb_boost;
    }
    if tokens.iter().any(TokenAnnotation::is_nominal_subject) {
        boost += scoring.subject_boost;
    }
    if tokens.iter().any(TokenAnnotation::is_verb) {
        boost += scoring.verb_boost;
    }

    Classification::Accepted {
        kind,
        confidence: Confidence::new(base + boost),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{DependencyRole, PartOfSpeech, Token};

    fn bare(text: &str) -> Classification {
        classify::<Token>(text, &[], &Rules::default())
    }

    fn annotated() -> Vec<Token> {
        vec![
            Token::new("contractor", PartOfSpeech::Noun, DependencyRole::NominalSubject),
            Token::new("shall", PartOfSpeech::Aux, DependencyRole::Other),
            Token::new("provide", PartOfSpeech::Verb, DependencyRole::Root),
        ]
    }

    #[test]
    fn mandatory_phrase_sets_type_and_base() {
        let result = bare("The system shall provide secure access.");
        assert_eq!(result.kind(), Some(RequirementType::Mandatory));
        assert!((result.confidence().get() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn informative_phrase_sets_type_and_base() {
        let result = bare("The network will be monitored daily.");
        assert_eq!(result.kind(), Some(RequirementType::Informative));
        assert!((result.confidence().get() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn mandatory_wins_over_informative() {
        let result = bare("The contractor shall ensure staff will attend.");
        assert_eq!(result.kind(), Some(RequirementType::Mandatory));
    }

    #[test]
    fn implicit_pattern_seeds_confidence() {
        let result = bare("The contractor is accountable for every deliverable.");
        assert_eq!(result.kind(), Some(RequirementType::Informative));
        assert!((result.confidence().get() - 0.8).abs() < f64::EPSILON);
    }

    #[test_case("Too short to count."; "below minimum words")]
    #[test_case("See the table of contents for the shall clauses."; "indicator phrase")]
    #[test_case("The weather today is rather pleasant outside."; "no obligation language")]
    fn rejects(text: &str) {
        let result = bare(text);
        assert!(!result.is_requirement());
        assert_eq!(result.kind(), None);
        assert_eq!(result.confidence(), Confidence::ZERO);
    }

    #[test]
    fn linguistic_boosts_are_summed_then_clamped() {
        let rules = Rules::default();
        let result = classify(
            "The contractor shall provide secure access.",
            &annotated(),
            &rules,
        );
        // 0.8 + 0.15 + 0.15 + 0.1 exceeds one.
        assert_eq!(result.confidence(), Confidence::new(1.0));
    }

    #[test]
    fn each_boost_applies_independently() {
        let rules = Rules::default();
        let text = "The network will be monitored daily.";

        let verb_only = [Token::new("observe", PartOfSpeech::Verb, DependencyRole::Root)];
        let subject_only = [Token::new(
            "network",
            PartOfSpeech::Noun,
            DependencyRole::NominalSubject,
        )];
        let action_verb = [Token::new("monitor", PartOfSpeech::Verb, DependencyRole::Root)];

        let score = |tokens: &[Token]| classify(text, tokens, &rules).confidence().get();
        assert!((score(&verb_only) - 0.7).abs() < 1e-9);
        assert!((score(&subject_only) - 0.75).abs() < 1e-9);
        assert!((score(&action_verb) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "The vendor must report outages within one hour.";
        assert_eq!(bare(text), bare(text));
    }
}
