//! End-to-end deck generation from stanza text.

use crate::document::PptxDocument;
use crate::output::{ensure_available, normalize_output_path};
use lyric_core::{
    ComposedSlide, Result, SlideComposer, SlideDeck, StanzaSplitter, DEFAULT_LAYOUT_INDEX,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default template location, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/template.pptx";

/// Where the template lives and which of its layouts to use.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Template presentation new slides are added to.
    pub template_path: PathBuf,

    /// Layout index each slide is built from.
    pub layout_index: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            layout_index: DEFAULT_LAYOUT_INDEX,
        }
    }
}

impl GeneratorConfig {
    /// Use a different template file.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// Use a different slide layout.
    pub fn with_layout_index(mut self, index: usize) -> Self {
        self.layout_index = index;
        self
    }
}

/// Summary of a generated deck.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// File the deck was written to.
    pub output: PathBuf,

    /// Template the deck was built from.
    pub template: PathBuf,

    /// Number of stanzas, and therefore slides, generated.
    pub stanza_count: usize,

    /// Per-slide composition details.
    pub slides: Vec<ComposedSlide>,
}

/// Turns multi-stanza text into a saved presentation.
pub struct DeckGenerator {
    config: GeneratorConfig,
    splitter: StanzaSplitter,
    composer: SlideComposer,
}

impl DeckGenerator {
    /// Create a generator for the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let composer = SlideComposer::new().with_layout_index(config.layout_index);
        Self {
            config,
            splitter: StanzaSplitter::new(),
            composer,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a deck from `text` and save it at `destination`.
    ///
    /// The destination is checked before any work is done, and nothing is
    /// written unless every slide composes successfully.
    pub fn generate(&self, text: &str, destination: &Path) -> Result<GenerationReport> {
        let output = normalize_output_path(destination)?;
        ensure_available(&output)?;

        let stanzas = self.splitter.split(text);
        log::info!("Split input into {} stanzas", stanzas.len());

        let mut document = PptxDocument::open(&self.config.template_path)?;
        log::debug!(
            "Template {} offers {} layouts, using index {}",
            self.config.template_path.display(),
            document.layout_count(),
            self.composer.layout_index()
        );

        let slides = self.composer.compose_all(&mut document, &stanzas)?;
        document.save(&output)?;
        log::info!("Saved {} slides to {}", slides.len(), output.display());

        Ok(GenerationReport {
            output,
            template: self.config.template_path.clone(),
            stanza_count: stanzas.len(),
            slides,
        })
    }
}

impl Default for DeckGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
