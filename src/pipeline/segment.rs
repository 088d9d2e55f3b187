//! Splitting normalised text into numbered sections.

use tracing::trace;

use super::header::find_headers;
use crate::domain::{Section, SectionId, word_count};

/// Slices normalised text into labelled sections.
///
/// A section's content runs from the end of its header to the start of the
/// next header (or the end of the text), trimmed. Sections whose title and
/// content together have no more than `min_words` words are dropped. Text
/// before the first header belongs to no section.
#[must_use]
pub fn segment(text: &str, min_words: usize) -> Vec<Section> {
    let headers = find_headers(text);

    headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let limit = headers.get(index + 1).map_or(text.len(), |next| next.start);
            let raw = &text[header.end..limit];
            let start = header.end + (raw.len() - raw.trim_start().len());
            let end = start + raw.trim().len();
            let content = &text[start..end];

            let words = word_count(header.title) + word_count(content);
            if words <= min_words {
                trace!(label = header.label, words, "dropping short section");
                return None;
            }

            let id = SectionId::new(header.label.to_string()).ok()?;
            Some(Section::new(
                id,
                header.title.to_string(),
                content.to_string(),
                start..end,
            ))
        })
        .collect()
}
