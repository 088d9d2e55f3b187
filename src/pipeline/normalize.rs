//! Cleaning of layout-mangled text.
//!
//! Each pass removes noise lines, repairs hyphenation, joins soft line wraps,
//! canonicalises list markers and tidies whitespace, in that order. Passes are
//! repeated until the text stops changing, so normalising normalised text is a
//! no-op.

use std::sync::LazyLock;

use regex::Regex;

use super::header::is_header_line;

const MAX_PASSES: usize = 8;

static HYPHENATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z])-[ \t]*\n[ \t]*([a-z])").expect("valid hyphenation regex")
});

static LIST_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\((?:[a-z]|\d{1,3}|[ivx]+)\)|[a-z]\.|[•●○◦▪▫■□‣⁃∙·*–])[ \t]+")
        .expect("valid list prefix regex")
});

static INLINE_ENUMERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+\((?:[a-z]|\d{1,3})\)[ \t]+").expect("valid inline enumerator regex")
});

static INLINE_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*[•●○◦▪▫■□‣⁃∙][ \t]*").expect("valid bullet regex"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid whitespace regex"));

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([,;.:])").expect("valid punctuation regex"));

static MISSING_SPACE_AFTER_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,;])([A-Za-z])").expect("valid separator regex"));

static MISSING_SPACE_AFTER_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]{2})\.([A-Z])").expect("valid period regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank line regex"));

/// Normalises raw document text.
///
/// `noise` holds line-level patterns for boilerplate such as page banners; a
/// line left blank by removing them is dropped. Normalisation never fails.
#[must_use]
pub fn normalize(text: &str, noise: &[Regex]) -> String {
    let mut current = text.replace("\r\n", "\n").replace('\r', "\n");
    for _ in 0..MAX_PASSES {
        let next = pass(&current, noise);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn pass(text: &str, noise: &[Regex]) -> String {
    let text = remove_noise(text, noise);
    let text = HYPHENATED.replace_all(&text, "$1$2");
    let text = join_soft_wraps(&text);
    let text = normalize_lists(&text);
    normalize_whitespace(&text)
}

fn remove_noise(text: &str, noise: &[Regex]) -> String {
    text.lines()
        .filter_map(|line| {
            let cleaned = noise.iter().fold(line.to_string(), |line, pattern| {
                pattern.replace_all(&line, "").into_owned()
            });
            (line.trim().is_empty() || !cleaned.trim().is_empty()).then_some(cleaned)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins lines broken between two letters, leaving headers, bullets and
/// paragraph breaks alone.
fn join_soft_wraps(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if let Some(previous) = lines.last_mut() {
            let head = line.trim_start();
            let joinable = previous.trim_end().ends_with(char::is_alphabetic)
                && head.starts_with(char::is_alphabetic)
                && !is_header_line(previous)
                && !is_header_line(line);
            if joinable {
                previous.truncate(previous.trim_end().len());
                previous.push(' ');
                previous.push_str(head);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines.join("\n")
}

fn normalize_lists(text: &str) -> String {
    let text = LIST_PREFIX.replace_all(text, "- ");
    let text = INLINE_ENUMERATOR.replace_all(&text, " ");
    INLINE_BULLET.replace_all(&text, " - ").into_owned()
}

fn normalize_whitespace(text: &str) -> String {
    let text = HORIZONTAL_SPACE.replace_all(text, " ");
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = MISSING_SPACE_AFTER_SEPARATOR.replace_all(&text, "$1 $2");
    let text = MISSING_SPACE_AFTER_PERIOD.replace_all(&text, "$1. $2");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::Rules;

    fn clean(text: &str) -> String {
        normalize(text, &Rules::default().noise)
    }

    #[test]
    fn removes_page_banners() {
        let text = "A.1 Scope\nThe contractor shall provide support.\nPage 3 of 10\n\
                    For Official Use Only\nThe network will be monitored.";
        let cleaned = clean(text);

        assert!(!cleaned.contains("Page 3 of 10"));
        assert!(!cleaned.contains("For Official Use Only"));
        assert!(cleaned.contains("The contractor shall provide support."));
        assert!(cleaned.contains("The network will be monitored."));
    }

    #[test_case("Table of Contents\nA.1 Scope"; "table of contents")]
    #[test_case("12\nA.1 Scope"; "lone page number")]
    #[test_case("Scope ........ 4\nA.1 Scope"; "leader dots")]
    #[test_case("(cid:12)A.1 Scope"; "extraction artifacts")]
    fn strips_noise(text: &str) {
        assert_eq!(clean(text), "A.1 Scope");
    }

    #[test]
    fn repairs_hyphenation() {
        assert_eq!(
            clean("A.1 Scope\nThe contractor shall imple-\nment the plan."),
            "A.1 Scope\nThe contractor shall implement the plan."
        );
    }

    #[test]
    fn joins_soft_wraps_but_keeps_headers() {
        assert_eq!(
            clean("A.1 Scope\nThe contractor shall provide\nsecure access.\nA.2 Tasks"),
            "A.1 Scope\nThe contractor shall provide secure access.\nA.2 Tasks"
        );
    }

    #[test]
    fn keeps_paragraph_breaks() {
        assert_eq!(
            clean("First paragraph ends here\n\n\n\nsecond paragraph"),
            "First paragraph ends here\n\nsecond paragraph"
        );
    }

    #[test_case("• Provide support", "- Provide support")]
    #[test_case("(a) Provide support", "- Provide support")]
    #[test_case("(3) Provide support", "- Provide support")]
    #[test_case("b. Provide support", "- Provide support")]
    #[test_case("▪ Provide support", "- Provide support")]
    fn canonicalises_list_markers(text: &str, expected: &str) {
        assert_eq!(clean(text), expected);
    }

    #[test]
    fn strips_inline_enumerators() {
        assert_eq!(
            clean("The contractor shall (a) provide staff"),
            "The contractor shall provide staff"
        );
    }

    #[test]
    fn tidies_spacing_around_punctuation() {
        assert_eq!(
            clean("Provide   staff ,training ;and tools .The vendor shall comply."),
            "Provide staff, training; and tools. The vendor shall comply."
        );
    }

    #[test]
    fn normalises_line_endings() {
        assert_eq!(clean("A.1 Scope\r\nbody text\r\n"), "A.1 Scope\nbody text");
    }

    #[test_case("A.1 Scope\nThe contractor shall imple-\nment\n• the plan ,daily.Page 2 of 9\n\n\n\nB Other Work\nx"; "mixed artifacts")]
    #[test_case("   "; "blank")]
    #[test_case("(a) (b) first\n(c) second"; "stacked enumerators")]
    #[test_case("word -\nnext\nlast ..... 3"; "dangling hyphen")]
    fn is_idempotent(text: &str) {
        let once = clean(text);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(clean(""), "");
    }
}
