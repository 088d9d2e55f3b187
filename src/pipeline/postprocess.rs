//! The global reduction over classified requirements.

use std::collections::{HashMap, hash_map::Entry};

use nonempty::NonEmpty;
use tracing::debug;

use crate::domain::{Category, Requirement, RequirementType, Rules, word_count};

/// Deduplicates, categorises, splits and sorts requirements.
///
/// Splitting can reproduce an existing statement, so deduplication runs again
/// afterwards.
#[must_use]
pub fn post_process(requirements: Vec<Requirement>, rules: &Rules) -> Vec<Requirement> {
    let classified = requirements.len();
    let unique = deduplicate(requirements);
    let deduplicated = unique.len();

    let split: Vec<Requirement> = unique
        .into_iter()
        .map(|requirement| categorize(requirement, rules))
        .flat_map(|requirement| split_informative(requirement, rules))
        .collect();
    let pieces = split.len();

    let mut requirements = deduplicate(split);
    sort(&mut requirements);

    debug!(
        classified,
        deduplicated,
        pieces,
        kept = requirements.len(),
        "post-processed requirements"
    );
    requirements
}

/// The deduplication key: lowercase, punctuation removed, whitespace collapsed.
#[must_use]
pub fn dedup_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps one requirement per [`dedup_key`], preferring higher confidence.
///
/// On a tie the first requirement encountered is kept, in its original
/// position.
#[must_use]
pub fn deduplicate(requirements: Vec<Requirement>) -> Vec<Requirement> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Requirement> = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        match positions.entry(dedup_key(requirement.text())) {
            Entry::Occupied(entry) => {
                let kept = &mut unique[*entry.get()];
                if requirement.confidence() > kept.confidence() {
                    *kept = requirement;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(unique.len());
                unique.push(requirement);
            }
        }
    }
    unique
}

/// Assigns the first matching category, or [`Category::General`].
#[must_use]
pub fn categorize(requirement: Requirement, rules: &Rules) -> Requirement {
    let category = rules
        .categories
        .iter()
        .find(|(_, pattern)| pattern.is_match(requirement.text()))
        .map_or(Category::General, |(category, _)| *category);
    requirement.with_category(category)
}

/// Splits a long informative requirement into its conjoined clauses.
///
/// The split is only taken when it yields at least two clauses and every clause
/// is long enough to stand alone; otherwise the requirement is returned as is.
#[must_use]
pub fn split_informative(requirement: Requirement, rules: &Rules) -> NonEmpty<Requirement> {
    let thresholds = &rules.thresholds;
    let Some(conjunctions) = &rules.conjunctions else {
        return NonEmpty::new(requirement);
    };
    if requirement.kind() != RequirementType::Informative
        || word_count(requirement.text()) <= thresholds.split_threshold_words
    {
        return NonEmpty::new(requirement);
    }

    let pieces: Vec<&str> = conjunctions
        .split(requirement.text())
        .map(|piece| piece.trim().trim_end_matches([',', ';']).trim_end())
        .collect();

    let accepted = pieces.len() >= 2
        && pieces
            .iter()
            .all(|piece| word_count(piece) > thresholds.min_split_words);
    if !accepted {
        return NonEmpty::new(requirement);
    }

    let clauses: Vec<Requirement> = pieces
        .into_iter()
        .map(|piece| requirement.with_text(piece.to_string()))
        .collect();
    NonEmpty::from_vec(clauses).unwrap_or_else(|| NonEmpty::new(requirement))
}

/// Orders requirements by section id, then confidence (descending), then text.
pub fn sort(requirements: &mut [Requirement]) {
    requirements.sort_by(|a, b| {
        a.section_id()
            .cmp(b.section_id())
            .then_with(|| b.confidence().cmp(&a.confidence()))
            .then_with(|| a.text().cmp(b.text()))
    });
}
