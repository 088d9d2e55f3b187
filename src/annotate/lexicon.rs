//! A small rule-based English annotator.
//!
//! This is not a statistical tagger. It recognises function words from closed
//! lists, promotes words following a modal, auxiliary or infinitive `to` to
//! verbs, and takes the head of the first noun phrase outside a prepositional
//! phrase as the subject of the first verb group. That is enough to drive the
//! classifier's boosts on the declarative sentences requirement documents are
//! made of.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use super::Annotator;
use crate::domain::{AnnotationError, DependencyRole, PartOfSpeech, Token};

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]+(?:['’-][A-Za-z]+)*|\d+(?:[.,]\d+)*|[^\sA-Za-z\d]")
        .expect("valid word regex")
});

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "all", "each", "every", "any", "some",
    "its", "their", "our", "your", "his", "her", "no",
];

const MODALS: &[&str] = &[
    "shall", "must", "will", "should", "may", "can", "could", "would", "might",
];

const AUXILIARIES: &[&str] = &[
    "be", "is", "are", "was", "were", "been", "being", "am", "has", "have", "had", "do", "does",
    "did",
];

const PRONOUNS: &[&str] = &["it", "they", "we", "he", "she", "i", "you", "who", "which"];

const ADPOSITIONS: &[&str] = &[
    "of", "for", "in", "on", "at", "by", "with", "from", "into", "within", "under", "over",
    "through", "during", "including", "per", "across", "between", "without", "upon", "after",
    "before", "via",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];

const BASE_VERBS: &[&str] = &[
    "address", "adhere", "allow", "analyze", "anticipate", "apply", "approve", "assess",
    "assist", "attend", "complete", "comply", "conduct", "coordinate", "configure", "create",
    "define", "deliver", "describe", "design", "develop", "document", "enable", "ensure",
    "establish", "expect", "follow", "host", "identify", "implement", "include", "install",
    "integrate", "intend", "maintain", "manage", "meet", "migrate", "monitor", "need", "notify",
    "operate", "outline", "participate", "perform", "plan", "prepare", "procure", "propose",
    "protect", "provide", "recommend", "replace", "report", "require", "resolve", "respond",
    "retain", "review", "secure", "specify", "store", "submit", "support", "test", "track",
    "train", "transition", "update", "use", "utilize", "verify",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("am", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("made", "make"),
    ("built", "build"),
    ("kept", "keep"),
    ("met", "meet"),
    ("sent", "send"),
    ("taken", "take"),
    ("given", "give"),
    ("written", "write"),
];

/// A rule-based annotator for English requirement prose.
#[derive(Debug, Clone)]
pub struct LexiconAnnotator {
    verbs: HashSet<String>,
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self {
            verbs: BASE_VERBS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl LexiconAnnotator {
    /// Extends the known-verb vocabulary, typically with the configured action
    /// verbs so that their inflections lemmatise correctly.
    #[must_use]
    pub fn with_verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.verbs
            .extend(verbs.into_iter().map(|verb| verb.as_ref().trim().to_lowercase()));
        self
    }

    fn tag(&self, sentence: &str) -> Vec<Token> {
        let words: Vec<&str> = WORD.find_iter(sentence).map(|m| m.as_str()).collect();
        let mut tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(index, word)| initial_token(word, index == 0))
            .collect();

        self.promote_verbs(&words, &mut tokens);
        assign_roles(&words, &mut tokens);
        tokens
    }

    fn promote_verbs(&self, words: &[&str], tokens: &mut [Token]) {
        let mut seen_verb = false;
        for index in 0..tokens.len() {
            if !matches!(tokens[index].pos, PartOfSpeech::Noun | PartOfSpeech::Propn) {
                continue;
            }
            let lemma = lemmatize(words[index], &self.verbs);
            let governed = previous_content(tokens, index)
                .is_some_and(|prev| matches!(tokens[prev].pos, PartOfSpeech::Aux | PartOfSpeech::Part));
            let finite = !seen_verb
                && self.verbs.contains(&lemma)
                && (index == 0 || is_inflected(words[index]))
                && previous_content(tokens, index).is_none_or(|prev| {
                    matches!(
                        tokens[prev].pos,
                        PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Pron
                    )
                });

            if governed || finite {
                tokens[index].pos = PartOfSpeech::Verb;
                tokens[index].lemma = lemma;
                seen_verb = true;
            }
        }
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, sentence: &str) -> Result<Vec<Token>, AnnotationError> {
        Ok(self.tag(sentence))
    }
}

fn initial_token(word: &str, sentence_start: bool) -> Token {
    let lower = word.to_lowercase();
    let first = word.chars().next().unwrap_or(' ');
    let pos = if !first.is_alphanumeric() {
        PartOfSpeech::Punct
    } else if first.is_ascii_digit() {
        PartOfSpeech::Num
    } else if DETERMINERS.contains(&lower.as_str()) {
        PartOfSpeech::Det
    } else if MODALS.contains(&lower.as_str()) || AUXILIARIES.contains(&lower.as_str()) {
        PartOfSpeech::Aux
    } else if PRONOUNS.contains(&lower.as_str()) {
        PartOfSpeech::Pron
    } else if lower == "to" {
        PartOfSpeech::Part
    } else if ADPOSITIONS.contains(&lower.as_str()) {
        PartOfSpeech::Adp
    } else if CONJUNCTIONS.contains(&lower.as_str()) {
        PartOfSpeech::Cconj
    } else if lower.len() > 4 && lower.ends_with("ly") {
        PartOfSpeech::Adv
    } else if first.is_uppercase() && !sentence_start {
        PartOfSpeech::Propn
    } else {
        PartOfSpeech::Noun
    };

    let lemma = IRREGULAR
        .iter()
        .find(|(form, _)| *form == lower)
        .map_or(lower, |(_, lemma)| (*lemma).to_string());

    Token::new(lemma, pos, DependencyRole::Other)
}

/// Index of the closest preceding token that is not an adverb.
fn previous_content(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index)
        .rev()
        .find(|&prev| tokens[prev].pos != PartOfSpeech::Adv)
}

fn is_inflected(word: &str) -> bool {
    let lower = word.to_lowercase();
    (lower.ends_with('s') && !lower.ends_with("ss")) || lower.ends_with("ed")
}

/// Marks the first verb as the root and the head of the first noun phrase
/// before its verb group as the subject.
fn assign_roles(words: &[&str], tokens: &mut [Token]) {
    let Some(root) = tokens.iter().position(|t| t.pos == PartOfSpeech::Verb) else {
        return;
    };
    tokens[root].dep = DependencyRole::Root;

    let group_start = (0..root)
        .rev()
        .take_while(|&i| matches!(tokens[i].pos, PartOfSpeech::Aux | PartOfSpeech::Adv))
        .last()
        .unwrap_or(root);

    let passive = group_start < root
        && tokens[group_start..root]
            .iter()
            .any(|t| t.pos == PartOfSpeech::Aux && t.lemma == "be")
        && is_participle(words[root]);

    let mut in_prepositional_phrase = false;
    let mut subject = None;
    let mut index = 0;
    while index < group_start {
        match tokens[index].pos {
            PartOfSpeech::Adp => in_prepositional_phrase = true,
            PartOfSpeech::Punct => in_prepositional_phrase = false,
            PartOfSpeech::Pron if !in_prepositional_phrase => {
                subject = Some(index);
                break;
            }
            PartOfSpeech::Noun | PartOfSpeech::Propn if !in_prepositional_phrase => {
                let mut head = index;
                while head + 1 < group_start
                    && matches!(tokens[head + 1].pos, PartOfSpeech::Noun | PartOfSpeech::Propn)
                {
                    head += 1;
                }
                subject = Some(head);
                break;
            }
            _ => {}
        }
        index += 1;
    }

    if let Some(subject) = subject {
        tokens[subject].dep = if passive {
            DependencyRole::PassiveSubject
        } else {
            DependencyRole::NominalSubject
        };
    }
}

fn is_participle(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower.ends_with("ed") || lower.ends_with("en") || IRREGULAR.iter().any(|(form, _)| *form == lower)
}

/// Reduces an inflected verb form to its lemma.
///
/// Known verbs are preferred; otherwise the plainest suffix-stripped form is
/// used.
fn lemmatize(word: &str, verbs: &HashSet<String>) -> String {
    let lower = word.to_lowercase();
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == lower) {
        return (*lemma).to_string();
    }
    if verbs.contains(&lower) {
        return lower;
    }

    let candidates = suffix_candidates(&lower);
    candidates
        .iter()
        .find(|candidate| verbs.contains(candidate.as_str()))
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or(lower)
}

fn suffix_candidates(lower: &str) -> Vec<String> {
    let strip = |suffix: &str| lower.strip_suffix(suffix).filter(|stem| stem.len() > 1);

    if let Some(stem) = strip("ies").or_else(|| strip("ied")) {
        return vec![format!("{stem}y")];
    }
    if let Some(stem) = strip("ing").or_else(|| strip("ed")) {
        let mut candidates = Vec::new();
        if let Some(single) = undouble(stem) {
            candidates.push(single);
        }
        candidates.push(stem.to_string());
        candidates.push(format!("{stem}e"));
        return candidates;
    }
    if let Some(stem) = strip("es") {
        return vec![format!("{stem}e"), stem.to_string()];
    }
    if lower.ends_with("ss") {
        return Vec::new();
    }
    strip("s").map(|stem| vec![stem.to_string()]).unwrap_or_default()
}

/// `planned` -> `plan`, `running` -> `run`.
fn undouble(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    (n >= 3 && bytes[n - 1] == bytes[n - 2] && !b"aeioulsz".contains(&bytes[n - 1]))
        .then(|| stem[..n - 1].to_string())
}
