//! Core domain types, stanza splitting, and slide composition for
//! turning lyric text into a slide deck.

pub mod compose;
pub mod error;
pub mod stanza;
pub mod types;

pub use compose::{
    BodyStrategy, ComposedSlide, ResolutionPolicy, SlideComposer, SlideDeck,
    DEFAULT_LAYOUT_INDEX,
};
pub use error::{Error, Result};
pub use stanza::{Stanza, StanzaSplitter};
pub use types::{
    Alignment, Geometry, Paragraph, Placeholder, PlaceholderType, Shape, Slide, SlideSize,
    TextFrame, VerticalAnchor,
};
