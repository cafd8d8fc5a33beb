//! Error types for building slide decks from stanza text.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// The template presentation does not exist.
    #[error(
        "Template not found at {}. Run `lyric-slides init-template` to create one.",
        .0.display()
    )]
    TemplateMissing(PathBuf),

    /// The destination already exists and will not be overwritten.
    #[error("File already exists: {}. Please choose a different name.", .0.display())]
    DestinationExists(PathBuf),

    /// The destination does not name a file.
    #[error("Unsupported output path: {} (expected a file name)", .0.display())]
    UnsupportedOutput(PathBuf),

    /// The template has no slide layout at the requested position.
    #[error("Template has no slide layout at index {index} ({available} layouts available)")]
    LayoutNotFound { index: usize, available: usize },

    /// A slide was created without a title placeholder.
    #[error("Slide {slide} has no title placeholder")]
    MissingTitle { slide: usize },

    /// No shape on the slide can take the stanza body.
    #[error("Slide {slide} has no placeholder to hold the stanza body")]
    MissingPlaceholder { slide: usize },

    /// The template package is missing a part or relationship it needs.
    #[error("Malformed presentation package: {0}")]
    MalformedPackage(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),
}
