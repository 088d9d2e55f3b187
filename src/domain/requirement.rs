use std::{cmp::Ordering, fmt, str::FromStr};

use borsh::BorshSerialize;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::SectionId;

/// The strength of an obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequirementType {
    /// A binding obligation ("shall", "must", "required to").
    Mandatory,
    /// A weaker commitment or statement of intent ("will", "plans to").
    Informative,
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mandatory => "Mandatory",
            Self::Informative => "Informative",
        })
    }
}

/// The topical category of a requirement.
///
/// Assigned by first-match precedence over the configured category table,
/// falling back to [`Category::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Systems, software, hardware, networks and security.
    Technical,
    /// Processes, procedures and workflows.
    Process,
    /// Support, maintenance and operations.
    Service,
    /// Reports, plans and deliverables.
    Documentation,
    /// Standards, regulations and policy.
    Compliance,
    /// Training and skills.
    Training,
    /// Anything not matched by a more specific category.
    General,
}

impl Category {
    /// Every category, in default precedence order.
    pub const ALL: [Self; 7] = [
        Self::Technical,
        Self::Process,
        Self::Service,
        Self::Documentation,
        Self::Compliance,
        Self::Training,
        Self::General,
    ];

    /// The category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Process => "Process",
            Self::Service => "Service",
            Self::Documentation => "Documentation",
            Self::Compliance => "Compliance",
            Self::Training => "Training",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategoryError(s.to_string()))
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown category '{0}'")]
pub struct UnknownCategoryError(String);

/// A confidence score, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence at all.
    pub const ZERO: Self = Self(0.0);

    /// Creates a confidence score, clamping the value into `[0, 1]`.
    ///
    /// `NaN` is treated as zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The raw score.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Eq for Confidence {}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A single extracted requirement.
///
/// A requirement always originates from exactly one sentence candidate (or,
/// after splitting, from a clause of one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    section_id: SectionId,
    text: String,
    #[serde(rename = "type")]
    kind: RequirementType,
    confidence: Confidence,
    category: Category,
}

impl Requirement {
    /// Construct a new, uncategorised [`Requirement`].
    ///
    /// The category starts as [`Category::General`] until post-processing
    /// assigns one.
    #[must_use]
    pub const fn new(
        section_id: SectionId,
        text: String,
        kind: RequirementType,
        confidence: Confidence,
    ) -> Self {
        Self {
            section_id,
            text,
            kind,
            confidence,
            category: Category::General,
        }
    }

    /// The section the requirement was found in.
    #[must_use]
    pub const fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    /// The requirement statement.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the requirement is mandatory or informative.
    #[must_use]
    pub const fn kind(&self) -> RequirementType {
        self.kind
    }

    /// The classifier's confidence in this requirement.
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// The topical category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    pub(crate) fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Derives a requirement from a clause of this one.
    ///
    /// The clause inherits the section id, type, confidence and category.
    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            section_id: self.section_id.clone(),
            text,
            kind: self.kind,
            confidence: self.confidence,
            category: self.category,
        }
    }

    /// A stable identifier for the requirement.
    ///
    /// The fingerprint is a SHA256 hash of the Borsh-serialized section id and
    /// text, so it is identical across runs for identical input.
    ///
    /// # Panics
    ///
    /// Panics if borsh serialization fails (which should never happen for this
    /// data structure).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        #[derive(BorshSerialize)]
        struct FingerprintData<'a> {
            section_id: &'a str,
            text: &'a str,
        }

        let data = FingerprintData {
            section_id: self.section_id.as_str(),
            text: &self.text,
        };

        // encode using [borsh](https://borsh.io/)
        let encoded = borsh::to_vec(&data).expect("this should never fail");

        let hash = Sha256::digest(encoded);

        format!("{hash:x}")
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn requirement(section: &str, text: &str) -> Requirement {
        Requirement::new(
            SectionId::try_from(section).unwrap(),
            text.to_string(),
            RequirementType::Mandatory,
            Confidence::new(0.8),
        )
    }

    #[test_case(-0.5, 0.0; "negative clamps to zero")]
    #[test_case(0.35, 0.35; "in range is kept")]
    #[test_case(1.2, 1.0; "overflow clamps to one")]
    #[test_case(f64::NAN, 0.0; "nan is zero")]
    fn confidence_is_clamped(raw: f64, expected: f64) {
        assert!((Confidence::new(raw).get() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("technical".parse::<Category>(), Ok(Category::Technical));
        assert_eq!("TRAINING".parse::<Category>(), Ok(Category::Training));
        assert!("Finance".parse::<Category>().is_err());
    }

    #[test]
    fn new_requirement_is_general_until_categorised() {
        let req = requirement("A.1", "The contractor shall report monthly.");
        assert_eq!(req.category(), Category::General);
        assert_eq!(
            req.with_category(Category::Documentation).category(),
            Category::Documentation
        );
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = requirement("A.1", "The contractor shall report monthly.");
        let b = requirement("A.1", "The contractor shall report monthly.");
        let c = requirement("A.2", "The contractor shall report monthly.");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn serializes_type_field() {
        let json = serde_json::to_value(requirement("B.3", "Vendors must comply.")).unwrap();
        assert_eq!(json["section_id"], "B.3");
        assert_eq!(json["type"], "Mandatory");
        assert_eq!(json["category"], "General");
    }
}
