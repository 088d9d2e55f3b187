use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
};

use tracing::{debug, instrument};

use super::Annotator;
use crate::domain::{AnnotationError, Token};

/// Delegates annotation to an external program.
///
/// The program receives a JSON array of sentences on stdin and must print a
/// JSON array holding one array of `{"lemma", "pos", "dep"}` objects per
/// sentence, in input order. Tags follow the Universal Dependencies and
/// `ClearNLP` conventions, so a thin wrapper around most NLP toolkits will do.
///
/// The whole batch is sent in a single invocation.
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    program: String,
    args: Vec<String>,
}

impl CommandAnnotator {
    /// Creates an annotator that runs `program` with `args`.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a shell-style command line, splitting on whitespace.
    ///
    /// Returns `None` if the command line is blank.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Annotator for CommandAnnotator {
    fn annotate(&self, sentence: &str) -> Result<Vec<Token>, AnnotationError> {
        let mut batch = self.annotate_batch(&[sentence])?;
        batch.pop().ok_or(AnnotationError::CountMismatch {
            expected: 1,
            actual: 0,
        })
    }

    #[instrument(level = "debug", skip_all, fields(command = %self.program, sentences = sentences.len()))]
    fn annotate_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<Token>>, AnnotationError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let input = serde_json::to_vec(sentences)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AnnotationError::Unavailable {
                command: self.display(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            AnnotationError::Io(std::io::Error::other("annotator stdin was not captured"))
        })?;

        // Feed stdin from a separate thread so a chatty child can't deadlock on a
        // full stdout pipe.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(&input));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("annotator stdin writer panicked")));
            (written, output)
        });
        let output = output?;

        if !output.status.success() {
            return Err(AnnotationError::Failed {
                command: self.display(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // A child that exits cleanly without reading the whole batch.
        written?;

        let annotations: Vec<Vec<Token>> = serde_json::from_slice(&output.stdout)?;
        debug!(annotations = annotations.len(), "annotator finished");

        if annotations.len() != sentences.len() {
            return Err(AnnotationError::CountMismatch {
                expected: sentences.len(),
                actual: annotations.len(),
            });
        }

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenAnnotation;

    #[cfg(unix)]
    fn shell(script: &str) -> CommandAnnotator {
        CommandAnnotator::new("sh", ["-c", script])
    }

    #[test]
    fn parses_command_line() {
        let annotator =
            CommandAnnotator::from_command_line("python3 annotate.py --model en").unwrap();
        assert_eq!(annotator.program, "python3");
        assert_eq!(annotator.args, ["annotate.py", "--model", "en"]);
        assert!(CommandAnnotator::from_command_line("   ").is_none());
    }

    #[test]
    fn missing_program_is_unavailable() {
        let annotator =
            CommandAnnotator::new("definitely-not-an-annotator-binary", Vec::<String>::new());
        let error = annotator.annotate("The vendor shall comply.").unwrap_err();
        assert!(matches!(error, AnnotationError::Unavailable { .. }));
    }

    #[test]
    fn empty_batch_does_not_spawn() {
        let annotator =
            CommandAnnotator::new("definitely-not-an-annotator-binary", Vec::<String>::new());
        assert!(annotator.annotate_batch(&[]).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn decodes_annotations() {
        let annotator = shell(
            r#"cat > /dev/null; echo '[[{"lemma":"vendor","pos":"NOUN","dep":"nsubj"},{"lemma":"comply","pos":"VERB","dep":"ROOT"}]]'"#,
        );

        let tokens = annotator.annotate("The vendor shall comply.").unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_nominal_subject());
        assert!(tokens[1].is_verb());
    }

    #[cfg(unix)]
    #[test]
    fn receives_sentences_as_json() {
        // Echo the input back as one empty annotation per sentence.
        let annotator = shell(r#"sed 's/"[^"]*"/[]/g'"#);

        let batch = annotator.annotate_batch(&["one", "two", "three"]).unwrap();
        assert_eq!(batch.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failure() {
        let annotator = shell("cat > /dev/null; echo 'model not found' >&2; exit 3");
        let error = annotator.annotate("The vendor shall comply.").unwrap_err();

        match error {
            AnnotationError::Failed { stderr, .. } => assert_eq!(stderr, "model not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn malformed_output_is_reported() {
        let annotator = shell("cat > /dev/null; echo 'not json'");
        let error = annotator.annotate("The vendor shall comply.").unwrap_err();
        assert!(matches!(error, AnnotationError::Malformed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn wrong_count_is_reported() {
        let annotator = shell("cat > /dev/null; echo '[[], []]'");
        let error = annotator.annotate_batch(&["only one"]).unwrap_err();
        assert!(matches!(
            error,
            AnnotationError::CountMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unread_input_is_an_io_error() {
        // Exits cleanly before draining a batch far larger than a pipe buffer.
        let annotator = shell("echo '[]'");
        let sentence = "The vendor shall comply with every applicable agency policy.";
        let batch = vec![sentence; 20_000];

        let error = annotator.annotate_batch(&batch).unwrap_err();
        assert!(matches!(error, AnnotationError::Io(_)), "{error}");
    }
}
