//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as a binding obligation (amber)
    fn mandatory(&self) -> String;
    /// Color as a weaker commitment (blue)
    fn informative(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn mandatory(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn informative(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

/// Styles a padded requirement-type cell by its content.
pub fn requirement_type(cell: &str) -> String {
    match cell.trim_end() {
        "Mandatory" => cell.mandatory(),
        "Informative" => cell.informative(),
        _ => cell.dim(),
    }
}

/// Leaves a cell unstyled.
pub fn plain(cell: &str) -> String {
    cell.to_string()
}

/// Dims a cell.
pub fn dimmed(cell: &str) -> String {
    cell.dim()
}
