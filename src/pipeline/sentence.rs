//! Sentence candidates within a section.

use std::sync::LazyLock;

use regex::Regex;

use super::header::looks_like_header;
use crate::domain::{Candidate, Section, word_count};

/// Paragraph breaks and bullet lines always end a sentence.
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t]*\n\s*|\n[ \t]*-[ \t]+").expect("valid block break regex")
});

/// Sentence-ending punctuation, optional closing quotes or brackets, then a
/// capital letter (possibly behind a bullet marker).
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([.!?]["')\]]*)\s+(?:-\s+)?([A-Z])"#).expect("valid sentence break regex")
});

/// Splits a section body into candidate sentences.
///
/// Spans with fewer than `min_words` words, or that look like a header, are
/// discarded.
#[must_use]
pub fn extract_candidates(section: &Section, min_words: usize) -> Vec<Candidate> {
    split_sentences(section.content())
        .into_iter()
        .filter(|sentence| word_count(sentence) >= min_words && !looks_like_header(sentence))
        .map(|text| Candidate {
            section_id: section.id().clone(),
            text,
        })
        .collect()
}

/// Splits text into whitespace-collapsed sentences.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    BLOCK_BREAK
        .split(text)
        .flat_map(|block| {
            let mut sentences = Vec::new();
            let mut start = 0;
            for captures in SENTENCE_BREAK.captures_iter(block) {
                let (Some(end), Some(next)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                sentences.push(&block[start..end.end()]);
                start = next.start();
            }
            sentences.push(&block[start..]);
            sentences
        })
        .map(clean)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

fn clean(sentence: &str) -> String {
    let sentence = sentence.trim_start();
    let sentence = sentence.strip_prefix("- ").unwrap_or(sentence);
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::pipeline::segment::segment;

    fn section(content: &str) -> Section {
        let text = format!("A.1 Requirements For The Test Section\n{content}");
        segment(&text, 0).remove(0)
    }

    #[test]
    fn splits_on_sentence_punctuation_before_capitals() {
        assert_eq!(
            split_sentences("The system shall provide access. The network will be monitored."),
            [
                "The system shall provide access.",
                "The network will be monitored."
            ]
        );
    }

    #[test]
    fn lowercase_continuation_is_not_a_boundary() {
        assert_eq!(
            split_sentences("Support is provided approx. once a week. Reports follow."),
            ["Support is provided approx. once a week.", "Reports follow."]
        );
    }

    #[test_case("Is it ready? Yes it is.", &["Is it ready?", "Yes it is."])]
    #[test_case("He said \"stop.\" Then he left.", &["He said \"stop.\"", "Then he left."])]
    #[test_case("Scope:\n- Provide staff\n- Deliver reports", &["Scope:", "Provide staff", "Deliver reports"])]
    #[test_case("First paragraph\n\nsecond paragraph", &["First paragraph", "second paragraph"])]
    fn recognises_boundaries(text: &str, expected: &[&str]) {
        assert_eq!(split_sentences(text), expected);
    }

    #[test]
    fn short_spans_are_dropped() {
        let candidates = extract_candidates(&section("Yes. The contractor shall comply."), 3);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "The contractor shall comply.");
        assert_eq!(candidates[0].section_id.as_str(), "A.1");
    }

    #[test]
    fn header_like_spans_are_dropped() {
        let candidates = extract_candidates(
            &section("The vendor shall comply. C.3.2 Network Operations Support Details"),
            3,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "The vendor shall comply.");
    }

    #[test]
    fn collapses_internal_whitespace() {
        let candidates = extract_candidates(&section("The vendor   shall\ncomply  with policy."), 3);
        assert_eq!(candidates[0].text, "The vendor shall comply with policy.");
    }

    #[test]
    fn sentence_opening_with_a_quantity_is_kept() {
        let candidates = extract_candidates(
            &section("2.5 percent of all tickets shall be escalated to the vendor within one hour."),
            5,
        );

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].text.starts_with("2.5 percent"));
    }
}
