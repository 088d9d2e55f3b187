//! Section header recognition, shared by the normaliser (which must not join
//! a header onto its neighbours), the segmenter and the sentence filter.

use std::{cmp::Reverse, sync::LazyLock};

use regex::{Captures, Regex};

/// `A.1 Scope`, `Section B.2.3`, `C.4.` (title optional).
static LETTER_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:Section[ \t]+)?([A-Z](?:\.\d+)+)\.?(?:[ \t]+(\S.*?))?[ \t]*$")
        .expect("valid letter-number header regex")
});

/// `1.2 Background`, `Section 3.1.4 Security` (title required).
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:Section[ \t]+)?(\d+(?:\.\d+)+)\.?[ \t]+([A-Z].*?)[ \t]*$")
        .expect("valid numeric header regex")
});

/// `C Statement of Work`, `Section D: Deliverables` (title required).
static LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:Section[ \t]+)?([A-Z])[.:]?[ \t]+([A-Z].*?)[ \t]*$")
        .expect("valid letter header regex")
});

/// A dotted label opening a line of body text. Numeric labels need a
/// capitalised word after them, so quantities like `2.5 percent` are prose.
static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Section\s+)?(?:[A-Z](?:\.\d+)+\.?\s|\d+(?:\.\d+)+\.?\s+[A-Z])")
        .expect("valid label prefix regex")
});

const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "in", "of", "on", "or", "the", "to", "with",
];

const MAX_LETTER_TITLE_WORDS: usize = 12;

/// A recognised header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header<'t> {
    /// Where the header line starts.
    pub start: usize,
    /// Where the header ends and the section content begins.
    pub end: usize,
    pub label: &'t str,
    pub title: &'t str,
}

#[derive(Clone, Copy)]
enum Family {
    LetterNumber,
    Numeric,
    Letter,
}

impl Family {
    const ALL: [Self; 3] = [Self::LetterNumber, Self::Numeric, Self::Letter];

    fn regex(self) -> &'static Regex {
        match self {
            Self::LetterNumber => &LETTER_NUMBER,
            Self::Numeric => &NUMERIC,
            Self::Letter => &LETTER,
        }
    }

    fn header<'t>(self, captures: &Captures<'t>, text: &str) -> Option<Header<'t>> {
        let line = captures.get(0)?;
        let label = captures.get(1)?;
        let Some(title) = captures.get(2) else {
            return Some(Header {
                start: line.start(),
                end: line.end(),
                label: label.as_str(),
                title: "",
            });
        };

        if matches!(self, Self::Letter) && !is_title_case(title.as_str()) {
            return None;
        }

        // A label followed by a sentence, whole or wrapped: the sentence is content.
        if title.as_str().ends_with(['.', '!', '?', ',', ';'])
            || continues_on_next_line(text, line.end())
        {
            return Some(Header {
                start: line.start(),
                end: title.start(),
                label: label.as_str(),
                title: "",
            });
        }

        Some(Header {
            start: line.start(),
            end: line.end(),
            label: label.as_str(),
            title: title.as_str(),
        })
    }
}

/// Finds every header in `text`, ordered by position.
///
/// All families are scanned and merged. Where matches overlap, the one starting
/// first wins, and at equal starts the longer label wins.
pub(crate) fn find_headers(text: &str) -> Vec<Header<'_>> {
    let mut headers: Vec<Header<'_>> = Family::ALL
        .into_iter()
        .flat_map(|family| {
            family
                .regex()
                .captures_iter(text)
                .filter_map(move |captures| family.header(&captures, text))
        })
        .collect();

    resolve_overlaps(headers)
}

/// Orders headers by position and drops any that start inside an earlier one.
/// At equal starts the longer label wins.
fn resolve_overlaps(mut headers: Vec<Header<'_>>) -> Vec<Header<'_>> {
    headers.sort_by_key(|header| (header.start, Reverse(header.label.len())));

    let mut last_end = 0;
    headers.retain(|header| {
        let keep = header.start >= last_end;
        if keep {
            last_end = header.end.max(header.start + 1);
        }
        keep
    });
    headers
}

/// Whether a single line is a section header.
pub(crate) fn is_header_line(line: &str) -> bool {
    !line.contains('\n') && !find_headers(line).is_empty()
}

/// Whether a span of text looks like a header rather than prose.
pub(crate) fn looks_like_header(text: &str) -> bool {
    LABEL_PREFIX.is_match(text) || is_header_line(text)
}

/// Whether the line after `line_end` carries on a sentence, i.e. starts with a
/// lowercase letter.
fn continues_on_next_line(text: &str, line_end: usize) -> bool {
    text[line_end..]
        .strip_prefix('\n')
        .map(|rest| rest.trim_start_matches([' ', '\t']))
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_lowercase)
}

fn is_title_case(title: &str) -> bool {
    let words: Vec<&str> = title.split_whitespace().collect();
    !title.ends_with(['.', ';', ':', ',', '!', '?'])
        && words.len() <= MAX_LETTER_TITLE_WORDS
        && words.iter().all(|word| {
            word.starts_with(|c: char| c.is_uppercase() || c.is_ascii_digit() || c == '(')
                || SMALL_WORDS.contains(&word.to_lowercase().as_str())
        })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("A.1 Requirements", "A.1", "Requirements")]
    #[test_case("Section B.2.3 Network Security", "B.2.3", "Network Security")]
    #[test_case("C.4.", "C.4", "")]
    #[test_case("1.2 Background", "1.2", "Background")]
    #[test_case("3.1.4. Help Desk Support", "3.1.4", "Help Desk Support")]
    #[test_case("C Statement of Work", "C", "Statement of Work")]
    #[test_case("Section D: Deliverables", "D", "Deliverables")]
    fn recognises_header_families(line: &str, label: &str, title: &str) {
        let headers = find_headers(line);
        assert_eq!(headers.len(), 1, "{headers:?}");
        assert_eq!(headers[0].label, label);
        assert_eq!(headers[0].title, title);
    }

    #[test_case("A Contractor shall provide staff."; "sentence starting with article")]
    #[test_case("A contractor may apply"; "lowercase title")]
    #[test_case("1.5 hours of support"; "decimal quantity")]
    #[test_case("The system shall provide access."; "prose")]
    fn ignores_prose(line: &str) {
        assert!(find_headers(line).is_empty());
    }

    #[test]
    fn sentence_after_label_is_content() {
        let text = "A.2 The contractor shall provide support.";
        let headers = find_headers(text);

        assert_eq!(headers[0].label, "A.2");
        assert_eq!(headers[0].title, "");
        assert_eq!(&text[headers[0].end..], "The contractor shall provide support.");
    }

    #[test]
    fn mixed_families_are_ordered_by_position() {
        let text = "1.1 Scope\nbody\nA.1 Tasks\nbody\nC Deliverables\nbody";
        let labels: Vec<&str> = find_headers(text).iter().map(|h| h.label).collect();
        assert_eq!(labels, ["1.1", "A.1", "C"]);
    }

    #[test]
    fn dotted_label_prefix_looks_like_header() {
        assert!(looks_like_header("C.3.2 the contractor shall"));
        assert!(looks_like_header("Section 4.1 Transition"));
        assert!(!looks_like_header("The contractor shall provide support."));
    }

    #[test_case("2.5 percent of all tickets shall be escalated."; "decimal quantity")]
    #[test_case("1.5 hours of support are included each month."; "hours")]
    fn quantities_do_not_look_like_headers(text: &str) {
        assert!(!looks_like_header(text));
    }

    #[test]
    fn wrapped_sentence_after_label_is_content() {
        let text = "C.3 The contractor shall provide help desk support to all\n\
                    agency users during business hours every weekday.";
        let headers = find_headers(text);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].label, "C.3");
        assert_eq!(headers[0].title, "");
        assert!(text[headers[0].end..].starts_with("The contractor shall provide"));
    }

    #[test]
    fn title_followed_by_capitalised_line_is_kept() {
        let headers = find_headers("C.3 Help Desk Support\nThe contractor shall staff it.");
        assert_eq!(headers[0].title, "Help Desk Support");
    }

    #[test]
    fn longer_label_wins_at_equal_start() {
        let header = |label, end| Header {
            start: 0,
            end,
            label,
            title: "Tasks",
        };
        let later = Header {
            start: 4,
            end: 12,
            label: "B",
            title: "Inside",
        };

        let kept = resolve_overlaps(vec![header("C", 7), later, header("C.2", 9)]);

        let labels: Vec<&str> = kept.iter().map(|h| h.label).collect();
        assert_eq!(labels, ["C.2"]);
    }
}
