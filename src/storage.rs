//! The boundary to the filesystem.
//!
//! Documents arrive here already flattened to text; binary containers such as
//! PDF or DOCX must be converted by an external tool first.

use std::path::{Path, PathBuf};

use crate::domain::{Config, ConfigError};

mod document;

pub use document::{Document, LoadError, collect_documents};

/// The configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "sowreq.toml";

/// Resolves the configuration to use.
///
/// An explicit path must exist and parse. Without one, [`CONFIG_FILE`] in the
/// working directory is used if present, otherwise the defaults.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return Config::load(path);
    }

    let path = PathBuf::from(CONFIG_FILE);
    if path.is_file() {
        Config::load(&path)
    } else {
        tracing::debug!("No {CONFIG_FILE} found, using default configuration");
        Ok(Config::default())
    }
}
