//! PPTX (Office Open XML) backend for lyric slide decks.
//!
//! Opens a template presentation, appends slides built from its layouts and
//! writes the result as a new ZIP package.

mod content_types;
mod package;
mod presentation;
mod rels;
mod writer;
mod xml;

pub mod document;
pub mod generator;
pub mod layout;
pub mod output;
pub mod reader;
pub mod template;

pub use document::PptxDocument;
pub use generator::{DeckGenerator, GenerationReport, GeneratorConfig, DEFAULT_TEMPLATE_PATH};
pub use layout::SlideLayout;
pub use output::{normalize_output_path, DEFAULT_OUTPUT_NAME, PPTX_EXTENSION};
pub use package::Package;
pub use reader::{DeckContents, DeckReader};
pub use template::{bundled_package, create_template, SAMPLE_TITLE};
