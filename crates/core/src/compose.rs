//! Populating one slide per stanza.
//!
//! Each stanza becomes a new slide whose title holds the stanza text. A
//! second shape, the body region, receives the same text and is centered
//! horizontally and anchored to the vertical middle. Which shape becomes
//! the body region is decided by an explicit [`ResolutionPolicy`].

use crate::types::{inches, Alignment, Emu, Geometry, Slide, SlideSize, VerticalAnchor};
use crate::{Error, Result, Stanza};
use serde::{Deserialize, Serialize};

/// Layout used for lyric slides ("Title Only" in the standard template).
pub const DEFAULT_LAYOUT_INDEX: usize = 5;

/// Width of a fabricated body region.
pub const FALLBACK_BODY_WIDTH: Emu = inches(9);

/// Height of a fabricated body region.
pub const FALLBACK_BODY_HEIGHT: Emu = inches(5);

/// A presentation that new slides can be added to.
pub trait SlideDeck {
    /// Dimensions shared by every slide.
    fn slide_size(&self) -> SlideSize;

    /// Number of slide layouts available.
    fn layout_count(&self) -> usize;

    /// Append a slide built from the layout at `layout_index`.
    fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide>;
}

/// A way of choosing the body region on a fresh slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyStrategy {
    /// First text-capable shape, in document order, that is not the title.
    SecondaryTextShape,

    /// The slide's first placeholder, resized and centered on the slide.
    PlaceholderFallback,
}

impl BodyStrategy {
    /// Find the shape this strategy would use, if any.
    fn select(&self, slide: &Slide, title: usize) -> Option<usize> {
        match self {
            Self::SecondaryTextShape => slide
                .shapes
                .iter()
                .enumerate()
                .find(|&(i, shape)| i != title && shape.has_text_frame())
                .map(|(i, _)| i),
            Self::PlaceholderFallback => slide.placeholder_indices().first().copied(),
        }
    }
}

/// Ordered list of body strategies; the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPolicy {
    strategies: Vec<BodyStrategy>,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            strategies: vec![
                BodyStrategy::SecondaryTextShape,
                BodyStrategy::PlaceholderFallback,
            ],
        }
    }
}

impl ResolutionPolicy {
    /// Create a policy from an explicit strategy order.
    pub fn new(strategies: Vec<BodyStrategy>) -> Self {
        Self { strategies }
    }

    /// The strategies in priority order.
    pub fn strategies(&self) -> &[BodyStrategy] {
        &self.strategies
    }

    /// Resolve the body region: the shape index and the strategy that found it.
    pub fn resolve(&self, slide: &Slide, title: usize) -> Option<(usize, BodyStrategy)> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.select(slide, title).map(|i| (i, *strategy)))
    }
}

/// Outcome of composing one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedSlide {
    /// 1-based slide number in the output deck.
    pub number: usize,

    /// Strategy that resolved the body region.
    pub strategy: BodyStrategy,

    /// Name of the shape holding the stanza body.
    pub body_shape: String,

    /// Whether the body region is also the title shape.
    pub body_is_title: bool,
}

/// Builds one slide per stanza.
#[derive(Debug, Clone)]
pub struct SlideComposer {
    layout_index: usize,
    policy: ResolutionPolicy,
    fallback_width: Emu,
    fallback_height: Emu,
}

impl Default for SlideComposer {
    fn default() -> Self {
        Self {
            layout_index: DEFAULT_LAYOUT_INDEX,
            policy: ResolutionPolicy::default(),
            fallback_width: FALLBACK_BODY_WIDTH,
            fallback_height: FALLBACK_BODY_HEIGHT,
        }
    }
}

impl SlideComposer {
    /// Create a composer using layout 5 and the default resolution policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different slide layout.
    pub fn with_layout_index(mut self, index: usize) -> Self {
        self.layout_index = index;
        self
    }

    /// Use a different body resolution policy.
    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Layout index new slides are built from.
    pub fn layout_index(&self) -> usize {
        self.layout_index
    }

    /// Add a slide for `stanza` to `deck`.
    ///
    /// Content is written first, then formatting is applied, then the body
    /// text is committed once more so formatting never leaves stale content.
    pub fn compose<D: SlideDeck + ?Sized>(
        &self,
        deck: &mut D,
        stanza: &Stanza,
    ) -> Result<ComposedSlide> {
        let slide_size = deck.slide_size();
        let slide = deck.add_slide(self.layout_index)?;
        let text = stanza.text();

        let title = slide
            .title_index()
            .ok_or(Error::MissingTitle { slide: slide.number })?;
        {
            let title_shape = &mut slide.shapes[title];
            title_shape.set_text(text);
            title_shape
                .text_frame_mut()
                .align_first_paragraph(Alignment::Center);
        }

        let (body, strategy) = self
            .policy
            .resolve(slide, title)
            .ok_or(Error::MissingPlaceholder { slide: slide.number })?;

        let body_shape = &mut slide.shapes[body];

        // Content phase.
        body_shape.clear_text();
        body_shape.set_text(text);
        match strategy {
            BodyStrategy::SecondaryTextShape => {
                body_shape
                    .text_frame_mut()
                    .align_first_paragraph(Alignment::Center);
            }
            BodyStrategy::PlaceholderFallback => {
                body_shape.geometry = Some(Geometry::centered(
                    slide_size,
                    self.fallback_width,
                    self.fallback_height,
                ));
            }
        }

        // Formatting phase.
        body_shape.text_frame_mut().anchor = Some(VerticalAnchor::Middle);

        // Final content commit.
        body_shape.set_text(text);

        let composed = ComposedSlide {
            number: slide.number,
            strategy,
            body_shape: body_shape.name.clone(),
            body_is_title: body == title,
        };

        log::debug!(
            "Slide {}: body region '{}' via {:?}",
            composed.number,
            composed.body_shape,
            composed.strategy
        );

        Ok(composed)
    }

    /// Add one slide per stanza, in order.
    pub fn compose_all<D: SlideDeck + ?Sized>(
        &self,
        deck: &mut D,
        stanzas: &[Stanza],
    ) -> Result<Vec<ComposedSlide>> {
        stanzas
            .iter()
            .map(|stanza| self.compose(deck, stanza))
            .collect()
    }
}
