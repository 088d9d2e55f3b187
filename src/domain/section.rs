use std::{cmp::Ordering, fmt, ops::Range, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static SECTION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z](?:\.\d+)*|\d+(?:\.\d+)+)$").expect("valid section id regex")
});

/// A hierarchical section label.
///
/// Two families are accepted:
/// - letter form, optionally followed by dotted numbers (`A`, `A.1`, `B.2.3`)
/// - numeric dotted form with at least two components (`1.2`, `1.2.3`)
///
/// Section ids order naturally: each dot-separated component is compared
/// numerically when it parses as an integer and lexically otherwise, so `A.2`
/// sorts before `A.10`. Numeric components sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionId(NonEmptyString);

impl SectionId {
    /// Creates a new `SectionId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSectionIdError` if the string is empty or does not
    /// match either accepted label family.
    pub fn new(s: String) -> Result<Self, InvalidSectionIdError> {
        if !SECTION_ID.is_match(&s) {
            return Err(InvalidSectionIdError(s));
        }
        let non_empty =
            NonEmptyString::new(s).map_err(|_| InvalidSectionIdError(String::new()))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the dot-separated components used for natural ordering.
    fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        self.as_str().split('.').map(|part| {
            part.parse::<u64>().map_or(Segment::Text(part), Segment::Number)
        })
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Number(u64),
    Text(&'a str),
}

impl Ord for SectionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments()
            .cmp(other.segments())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for SectionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SectionId {
    type Err = InvalidSectionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<&str> for SectionId {
    type Error = InvalidSectionIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string is not a recognised section label.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid section id '{0}': expected a letter label (A, A.1) or a dotted number (1.2.3)")]
pub struct InvalidSectionIdError(String);

/// A labelled slice of a normalised document.
///
/// `content` is the text after the header line up to the next header (or the
/// end of the document). It is always a contiguous substring of the text the
/// section was cut from; [`Section::span`] records where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    content: String,
    span: Range<usize>,
}

impl Section {
    pub(crate) const fn new(
        id: SectionId,
        title: String,
        content: String,
        span: Range<usize>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            span,
        }
    }

    /// The section label.
    #[must_use]
    pub const fn id(&self) -> &SectionId {
        &self.id
    }

    /// The header title, if the header carried one.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The body text of the section.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte range of [`Section::content`] within the normalised text.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// A sentence-like span of a section that has not been classified yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The section the candidate was cut from.
    pub section_id: SectionId,
    /// The candidate text, whitespace-collapsed.
    pub text: String,
}
