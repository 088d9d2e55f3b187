//! The linguistic annotation boundary.
//!
//! The classifier reads three facts per token (lemma, whether it is a verb,
//! whether it is a nominal subject). Annotators supply those facts; they are
//! constructed once by the caller, owned by the [`Extractor`](crate::Extractor)
//! and shared read-only across all classification work.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::domain::{AnnotationError, Token};

mod command;
mod lexicon;

pub use command::CommandAnnotator;
pub use lexicon::LexiconAnnotator;

/// A source of per-token linguistic annotation.
pub trait Annotator: Send + Sync {
    /// Annotates a single sentence.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing annotator is unavailable or fails.
    fn annotate(&self, sentence: &str) -> Result<Vec<Token>, AnnotationError>;

    /// Annotates many sentences, returning one token list per sentence in
    /// input order.
    ///
    /// The default implementation annotates sentences in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    fn annotate_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<Token>>, AnnotationError> {
        sentences
            .par_iter()
            .map(|sentence| self.annotate(sentence))
            .collect()
    }
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    fn annotate(&self, sentence: &str) -> Result<Vec<Token>, AnnotationError> {
        (**self).annotate(sentence)
    }

    fn annotate_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<Token>>, AnnotationError> {
        (**self).annotate_batch(sentences)
    }
}

/// An annotator that produces no tokens.
///
/// Classification then relies on the lexicons and implicit patterns alone,
/// with no linguistic boosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotation;

impl Annotator for NoAnnotation {
    fn annotate(&self, _sentence: &str) -> Result<Vec<Token>, AnnotationError> {
        Ok(Vec::new())
    }

    fn annotate_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<Token>>, AnnotationError> {
        Ok(vec![Vec::new(); sentences.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_annotation_returns_one_empty_list_per_sentence() {
        let tokens = NoAnnotation.annotate_batch(&["one", "two", "three"]).unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(Vec::is_empty));
    }

    #[test]
    fn boxed_annotator_delegates() {
        let annotator: Box<dyn Annotator> = Box::new(LexiconAnnotator::default());
        let tokens = annotator
            .annotate("The contractor shall provide support.")
            .unwrap();
        assert!(tokens.iter().any(|token| token.lemma == "provide"));
    }
}
