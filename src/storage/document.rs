use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use walkdir::WalkDir;

/// Extensions treated as plain text when walking a directory.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// Container formats that need external text extraction.
const CONTAINER_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "odt", "rtf"];

/// A document's text, as handed to the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Reads a plain-text document.
    ///
    /// Line endings are normalised to `\n`.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the file does not exist
    /// - the file is a binary container format (PDF, DOCX, ...)
    /// - the file cannot be read
    /// - the file is not valid UTF-8
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        if let Some(extension) = path.extension().and_then(OsStr::to_str) {
            let extension = extension.to_lowercase();
            if CONTAINER_EXTENSIONS.contains(&extension.as_str()) {
                return Err(LoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    extension,
                });
            }
        }

        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| LoadError::NotUtf8 {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded document");

        Ok(Self::from_text(path, &text))
    }

    /// Wraps text that was obtained elsewhere.
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            text: text.replace("\r\n", "\n").replace('\r', "\n"),
        }
    }

    /// Where the document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Expands files and directories into the list of documents to process.
///
/// Files are kept as given. Directories are walked recursively for plain-text
/// files, which are returned sorted by path.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if an input does not exist.
pub fn collect_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter(|entry| {
                    entry
                        .path()
                        .extension()
                        .and_then(OsStr::to_str)
                        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                })
                .map(walkdir::DirEntry::into_path)
                .collect();
            found.sort();
            tracing::debug!(dir = %input.display(), documents = found.len(), "walked directory");
            documents.extend(found);
        } else if input.exists() {
            documents.push(input.clone());
        } else {
            return Err(LoadError::NotFound(input.clone()));
        }
    }
    Ok(documents)
}

/// Errors raised by the document loader.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document was not found.
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The document is a container format that must be converted to text
    /// first.
    #[error("unsupported document format '.{extension}' for {}; convert it to text first", path.display())]
    UnsupportedFormat {
        /// The document.
        path: PathBuf,
        /// Its (lowercased) extension.
        extension: String,
    },

    /// An I/O error occurred.
    #[error("failed to read {}", path.display())]
    Io {
        /// The document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The document is not valid UTF-8 text.
    #[error("{} is not valid UTF-8 text", path.display())]
    NotUtf8 {
        /// The document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;

    #[test]
    fn loads_text_and_normalises_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sow.txt");
        fs::write(&path, "A.1 Scope\r\nbody\rmore").unwrap();

        let document = Document::load(&path).unwrap();
        assert_eq!(document.text(), "A.1 Scope\nbody\nmore");
        assert_eq!(document.path(), path);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = Document::load(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test_case("sow.pdf")]
    #[test_case("sow.DOCX")]
    fn containers_are_unsupported(name: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, b"%PDF-1.7").unwrap();

        let result = Document::load(&path);
        assert!(matches!(result, Err(LoadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sow.txt");
        fs::write(&path, b"\xff\xfe\x00").unwrap();

        let result = Document::load(&path);
        assert!(matches!(result, Err(LoadError::NotUtf8 { .. })));
    }

    #[test]
    fn directories_are_walked_for_text_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("nested/c.text"), "c").unwrap();
        fs::write(dir.path().join("image.png"), "x").unwrap();

        let documents = collect_documents(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = documents
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            [
                PathBuf::from("a.md"),
                PathBuf::from("b.txt"),
                PathBuf::from("nested/c.text")
            ]
        );
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = collect_documents(&[dir.path().join("nope")]);
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }
}
