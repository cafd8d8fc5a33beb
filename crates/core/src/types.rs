//! Domain types for slides populated from stanza text.

use serde::{Deserialize, Serialize};

/// English Metric Units, the OOXML length unit.
pub type Emu = i64;

/// Number of EMUs in one inch.
pub const EMU_PER_INCH: Emu = 914_400;

/// Convert whole inches to EMUs.
pub const fn inches(value: i64) -> Emu {
    value * EMU_PER_INCH
}

/// Dimensions of every slide in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    /// Slide width in EMUs.
    pub width: Emu,
    /// Slide height in EMUs.
    pub height: Emu,
}

impl SlideSize {
    /// Create a slide size from EMU dimensions.
    pub fn new(width: Emu, height: Emu) -> Self {
        Self { width, height }
    }
}

/// Explicit position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Geometry {
    /// A box of the given size centered within the slide.
    ///
    /// Offsets use floor division, so odd remainders shift the box by at
    /// most one EMU toward the top-left corner.
    pub fn centered(slide: SlideSize, width: Emu, height: Emu) -> Self {
        Self {
            left: (slide.width - width).div_euclid(2),
            top: (slide.height - height).div_euclid(2),
            width,
            height,
        }
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse a DrawingML `algn` attribute value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "l" => Some(Self::Left),
            "ctr" => Some(Self::Center),
            "r" => Some(Self::Right),
            "just" => Some(Self::Justify),
            _ => None,
        }
    }

    /// The DrawingML `algn` attribute value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
        }
    }
}

/// Vertical anchoring of text within its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

impl VerticalAnchor {
    /// Parse a DrawingML `anchor` attribute value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "t" => Some(Self::Top),
            "ctr" => Some(Self::Middle),
            "b" => Some(Self::Bottom),
            _ => None,
        }
    }

    /// The DrawingML `anchor` attribute value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }
}

/// A paragraph of text. Vertical tabs inside `text` are soft line breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    /// Create an unformatted paragraph.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alignment: None,
        }
    }
}

/// The text body of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFrame {
    /// Paragraphs in order. Never empty.
    pub paragraphs: Vec<Paragraph>,

    /// Vertical anchor, if set on the shape itself.
    pub anchor: Option<VerticalAnchor>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            anchor: None,
        }
    }
}

impl TextFrame {
    /// Create a text frame holding one empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All paragraph text joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the content with `text`, one paragraph per line.
    ///
    /// New paragraphs take the formatting of the current first paragraph.
    pub fn set_text(&mut self, text: &str) {
        let alignment = self.first_alignment();
        self.paragraphs = text
            .split('\n')
            .map(|line| Paragraph {
                text: line.to_string(),
                alignment,
            })
            .collect();
    }

    /// Remove all text, leaving a single empty paragraph that keeps the
    /// first paragraph's formatting.
    pub fn clear(&mut self) {
        let alignment = self.first_alignment();
        self.paragraphs = vec![Paragraph {
            text: String::new(),
            alignment,
        }];
    }

    /// Set the alignment of the first paragraph.
    pub fn align_first_paragraph(&mut self, alignment: Alignment) {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        self.paragraphs[0].alignment = Some(alignment);
    }

    fn first_alignment(&self) -> Option<Alignment> {
        self.paragraphs.first().and_then(|p| p.alignment)
    }
}

/// Placeholder role, as named by the `type` attribute of `<p:ph>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    Picture,
    SlideImage,
    Date,
    Footer,
    Header,
    SlideNumber,
}

impl PlaceholderType {
    /// Parse a `<p:ph type>` value. A missing attribute means `obj`.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        let kind = match value {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "hdr" => Self::Header,
            "sldNum" => Self::SlideNumber,
            _ => return None,
        };
        Some(kind)
    }

    /// The `<p:ph type>` value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::Subtitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::Header => "hdr",
            Self::SlideNumber => "sldNum",
        }
    }

    /// Prefix PowerPoint uses when naming a shape cloned from this placeholder.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "Title",
            Self::Subtitle => "Subtitle",
            Self::Body => "Text Placeholder",
            Self::Object => "Content Placeholder",
            Self::Chart => "Chart Placeholder",
            Self::Table => "Table Placeholder",
            Self::ClipArt => "ClipArt Placeholder",
            Self::Diagram => "SmartArt Placeholder",
            Self::Media => "Media Placeholder",
            Self::Picture => "Picture Placeholder",
            Self::SlideImage => "Slide Image Placeholder",
            Self::Date => "Date Placeholder",
            Self::Footer => "Footer Placeholder",
            Self::Header => "Header Placeholder",
            Self::SlideNumber => "Slide Number Placeholder",
        }
    }

    /// Whether this is a slide title.
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Whether a shape cloned with this role starts with an empty text frame.
    pub fn supports_text(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }

    /// Whether a new slide gets a copy of this layout placeholder.
    pub fn is_cloned_to_slides(&self) -> bool {
        !matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }
}

/// Placeholder descriptor of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderType,

    /// Placeholder index linking the shape to its layout counterpart.
    pub idx: u32,

    /// Optional `orient` attribute, carried through unchanged.
    pub orient: Option<String>,

    /// Optional `sz` attribute, carried through unchanged.
    pub size: Option<String>,
}

impl Placeholder {
    /// Create a placeholder descriptor without orientation or size hints.
    pub fn new(kind: PlaceholderType, idx: u32) -> Self {
        Self {
            kind,
            idx,
            orient: None,
            size: None,
        }
    }
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Shape id, unique within the slide.
    pub id: u32,

    /// Display name (e.g. "Title 1").
    pub name: String,

    /// Placeholder descriptor, for shapes that fill a layout placeholder.
    pub placeholder: Option<Placeholder>,

    /// Explicit geometry. `None` means inherited from the layout.
    pub geometry: Option<Geometry>,

    /// Text body, if the shape has one.
    pub text_frame: Option<TextFrame>,
}

impl Shape {
    /// Create a shape cloned from a layout placeholder.
    ///
    /// Text-capable roles get an empty text frame; geometry is inherited.
    pub fn from_placeholder(id: u32, placeholder: Placeholder) -> Self {
        let name = format!("{} {}", placeholder.kind.base_name(), id.saturating_sub(1));
        let text_frame = placeholder.kind.supports_text().then(TextFrame::new);
        Self {
            id,
            name,
            placeholder: Some(placeholder),
            geometry: None,
            text_frame,
        }
    }

    /// Whether this shape is the slide title.
    pub fn is_title(&self) -> bool {
        self.placeholder
            .as_ref()
            .map(|p| p.kind.is_title())
            .unwrap_or(false)
    }

    /// Whether this shape can hold text.
    ///
    /// Every `p:sp` shape can, whatever its placeholder role. Shapes cloned
    /// without a text body get one on first write.
    pub fn has_text_frame(&self) -> bool {
        true
    }

    /// Text of the shape, empty when it has no text frame.
    pub fn text(&self) -> String {
        self.text_frame
            .as_ref()
            .map(TextFrame::text)
            .unwrap_or_default()
    }

    /// The text frame, created on first use.
    pub fn text_frame_mut(&mut self) -> &mut TextFrame {
        self.text_frame.get_or_insert_with(TextFrame::new)
    }

    /// Replace the shape's text.
    pub fn set_text(&mut self, text: &str) {
        self.text_frame_mut().set_text(text);
    }

    /// Remove the shape's text.
    pub fn clear_text(&mut self) {
        self.text_frame_mut().clear();
    }
}

/// A slide and its shapes in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number within the deck.
    pub number: usize,

    /// Name of the layout the slide was created from, if known.
    pub layout_name: Option<String>,

    /// Shapes in document (z) order.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            layout_name: None,
            shapes: Vec::new(),
        }
    }

    /// Index of the title placeholder, if the slide has one.
    pub fn title_index(&self) -> Option<usize> {
        self.shapes.iter().position(Shape::is_title)
    }

    /// The title placeholder, if the slide has one.
    pub fn title(&self) -> Option<&Shape> {
        self.title_index().map(|i| &self.shapes[i])
    }

    /// Indices of placeholder shapes ordered by placeholder idx.
    ///
    /// Shapes sharing an idx keep their document order.
    pub fn placeholder_indices(&self) -> Vec<usize> {
        let mut indices: Vec<(u32, usize)> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.placeholder.as_ref().map(|p| (p.idx, i)))
            .collect();
        indices.sort_by_key(|&(idx, _)| idx);
        indices.into_iter().map(|(_, i)| i).collect()
    }

    /// Next free shape id.
    pub fn next_shape_id(&self) -> u32 {
        // Id 1 belongs to the slide's group shape tree.
        self.shapes.iter().map(|s| s.id).max().unwrap_or(1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_geometry() {
        let size = SlideSize::new(inches(10), 6_858_000);
        let geometry = Geometry::centered(size, inches(9), inches(5));

        assert_eq!(geometry.left, 457_200);
        assert_eq!(geometry.top, 1_143_000);
        assert_eq!(geometry.left + geometry.width / 2, size.width / 2);
        assert_eq!(geometry.top + geometry.height / 2, size.height / 2);
    }

    #[test]
    fn test_centered_geometry_floors_odd_remainder() {
        let geometry = Geometry::centered(SlideSize::new(11, 11), 4, 4);
        assert_eq!((geometry.left, geometry.top), (3, 3));

        // Box larger than the slide: floors toward negative infinity.
        let geometry = Geometry::centered(SlideSize::new(4, 4), 7, 7);
        assert_eq!((geometry.left, geometry.top), (-2, -2));
    }

    #[test]
    fn test_text_frame_set_text_splits_paragraphs() {
        let mut frame = TextFrame::new();
        frame.set_text("Line one\nLine two");

        assert_eq!(frame.paragraphs.len(), 2);
        assert_eq!(frame.text(), "Line one\nLine two");
    }

    #[test]
    fn test_text_frame_keeps_first_paragraph_formatting() {
        let mut frame = TextFrame::new();
        frame.set_text("A\nB");
        frame.align_first_paragraph(Alignment::Center);
        assert_eq!(frame.paragraphs[1].alignment, None);

        frame.set_text("C\nD");
        assert!(frame
            .paragraphs
            .iter()
            .all(|p| p.alignment == Some(Alignment::Center)));

        frame.clear();
        assert_eq!(frame.paragraphs, vec![Paragraph {
            text: String::new(),
            alignment: Some(Alignment::Center),
        }]);
    }

    #[test]
    fn test_placeholder_type_round_trip_names() {
        assert_eq!(PlaceholderType::from_ooxml("ctrTitle"), Some(PlaceholderType::CenterTitle));
        assert_eq!(PlaceholderType::from_ooxml("sldNum"), Some(PlaceholderType::SlideNumber));
        assert_eq!(PlaceholderType::from_ooxml("bogus"), None);
        assert_eq!(PlaceholderType::Body.as_ooxml(), "body");
    }

    #[test]
    fn test_shape_from_placeholder() {
        let title = Shape::from_placeholder(2, Placeholder::new(PlaceholderType::Title, 0));
        assert_eq!(title.name, "Title 1");
        assert!(title.is_title());
        assert!(title.has_text_frame());

        let picture = Shape::from_placeholder(3, Placeholder::new(PlaceholderType::Picture, 1));
        assert_eq!(picture.name, "Picture Placeholder 2");
        assert!(picture.text_frame.is_none());
        assert!(picture.has_text_frame());
    }

    #[test]
    fn test_placeholder_indices_sorted_by_idx() {
        let mut slide = Slide::new(1);
        slide
            .shapes
            .push(Shape::from_placeholder(2, Placeholder::new(PlaceholderType::Body, 13)));
        slide
            .shapes
            .push(Shape::from_placeholder(3, Placeholder::new(PlaceholderType::Title, 0)));

        assert_eq!(slide.placeholder_indices(), vec![1, 0]);
        assert_eq!(slide.title_index(), Some(1));
        assert_eq!(slide.next_shape_id(), 4);
    }
}
