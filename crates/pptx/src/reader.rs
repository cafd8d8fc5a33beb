//! Reading generated decks back into slides.

use crate::document::main_part_name;
use crate::layout::{parse_placeholder, SlideLayout};
use crate::package::{rels_part_for, resolve_target, Package};
use crate::presentation::PresentationInfo;
use crate::rels::{Relationships, RT_SLIDE_LAYOUT};
use crate::xml::{attribute, local_name, numeric_attribute, xml_error};
use lyric_core::{
    Alignment, Geometry, Paragraph, Result, Shape, Slide, SlideSize, TextFrame, VerticalAnchor,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};

/// Slides of a deck, as read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct DeckContents {
    /// Dimensions shared by every slide, if declared.
    pub slide_size: Option<SlideSize>,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

/// Reader for PPTX decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a PPTX file from a reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckContents> {
        let package = Package::from_reader(reader)?;
        self.read_package(&package)
    }

    /// Read the slides of an in-memory package.
    pub fn read_package(&self, package: &Package) -> Result<DeckContents> {
        let presentation_part = main_part_name(package)?;
        let info = PresentationInfo::parse(&package.xml_part(&presentation_part)?)?;
        let rels = Relationships::parse(&package.xml_part(&rels_part_for(&presentation_part))?)?;

        let mut slides = Vec::with_capacity(info.slides.len());
        for (_, rel_id) in &info.slides {
            let Some(rel) = rels.get(rel_id).filter(|r| !r.is_external()) else {
                log::warn!("Slide relationship {} is missing, skipping", rel_id);
                continue;
            };
            let slide_part = resolve_target(&presentation_part, &rel.target);
            let mut slide = parse_slide(&package.xml_part(&slide_part)?, slides.len() + 1)?;
            slide.layout_name = layout_name(package, &slide_part);
            slides.push(slide);
        }

        Ok(DeckContents {
            slide_size: info.slide_size,
            slides,
        })
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of the layout a slide part was built from, if it can be found.
fn layout_name(package: &Package, slide_part: &str) -> Option<String> {
    let rels_xml = package.xml_part(&rels_part_for(slide_part)).ok()?;
    let rels = Relationships::parse(&rels_xml).ok()?;
    let target = rels.of_type(RT_SLIDE_LAYOUT).next()?;
    let layout_part = resolve_target(slide_part, &target.target);
    let layout = SlideLayout::parse(&layout_part, &package.xml_part(&layout_part).ok()?).ok()?;
    Some(layout.name).filter(|n| !n.is_empty())
}

/// Geometry pieces collected while inside `<p:spPr>`.
#[derive(Debug, Default)]
struct XfrmParts {
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
}

impl XfrmParts {
    fn geometry(&self) -> Option<Geometry> {
        let (left, top) = self.offset?;
        let (width, height) = self.extent?;
        Some(Geometry {
            left,
            top,
            width,
            height,
        })
    }
}

/// Parse the shapes of a slide part.
pub fn parse_slide(xml: &str, number: usize) -> Result<Slide> {
    let mut slide = Slide::new(number);
    let mut reader = Reader::from_str(xml);

    let mut current_shape: Option<Shape> = None;
    let mut xfrm = XfrmParts::default();
    let mut in_shape_props = false;
    let mut in_text_run = false;
    let mut paragraph: Option<Paragraph> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        current_shape = Some(Shape {
                            id: 0,
                            name: String::new(),
                            placeholder: None,
                            geometry: None,
                            text_frame: None,
                        });
                        xfrm = XfrmParts::default();
                    }
                    b"spPr" => in_shape_props = true,
                    b"txBody" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.text_frame = Some(TextFrame {
                                paragraphs: Vec::new(),
                                anchor: None,
                            });
                        }
                    }
                    b"p" => paragraph = Some(Paragraph::default()),
                    b"t" => in_text_run = paragraph.is_some(),
                    _ => read_shape_attributes(
                        e,
                        &mut current_shape,
                        &mut xfrm,
                        in_shape_props,
                        &mut paragraph,
                    )?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"spPr" => {}
                    b"p" => {
                        if let Some(frame) =
                            current_shape.as_mut().and_then(|s| s.text_frame.as_mut())
                        {
                            frame.paragraphs.push(Paragraph::default());
                        }
                    }
                    _ => read_shape_attributes(
                        e,
                        &mut current_shape,
                        &mut xfrm,
                        in_shape_props,
                        &mut paragraph,
                    )?,
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text_run {
                    if let Some(ref mut p) = paragraph {
                        let text = e
                            .unescape()
                            .map_err(|err| xml_error("Error reading slide text", err))?;
                        p.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        if let Some(mut shape) = current_shape.take() {
                            shape.geometry = xfrm.geometry();
                            slide.shapes.push(shape);
                        }
                        in_shape_props = false;
                    }
                    b"spPr" => in_shape_props = false,
                    b"t" => in_text_run = false,
                    b"p" => {
                        if let Some(p) = paragraph.take() {
                            if let Some(frame) =
                                current_shape.as_mut().and_then(|s| s.text_frame.as_mut())
                            {
                                frame.paragraphs.push(p);
                            }
                        }
                    }
                    b"txBody" => {
                        if let Some(frame) =
                            current_shape.as_mut().and_then(|s| s.text_frame.as_mut())
                        {
                            if frame.paragraphs.is_empty() {
                                frame.paragraphs.push(Paragraph::default());
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing slide", e)),
            _ => {}
        }
    }

    Ok(slide)
}

/// Pick up attributes of elements nested in a shape.
fn read_shape_attributes(
    e: &BytesStart<'_>,
    current_shape: &mut Option<Shape>,
    xfrm: &mut XfrmParts,
    in_shape_props: bool,
    paragraph: &mut Option<Paragraph>,
) -> Result<()> {
    let Some(shape) = current_shape.as_mut() else {
        return Ok(());
    };

    match local_name(e.name().as_ref()) {
        b"cNvPr" => {
            shape.id = numeric_attribute(e, b"id").unwrap_or(0);
            shape.name = attribute(e, b"name")?.unwrap_or_default();
        }
        b"ph" => shape.placeholder = Some(parse_placeholder(e)?),
        b"off" if in_shape_props => {
            if let (Some(x), Some(y)) = (numeric_attribute(e, b"x"), numeric_attribute(e, b"y")) {
                xfrm.offset = Some((x, y));
            }
        }
        b"ext" if in_shape_props => {
            let cx = numeric_attribute(e, b"cx");
            let cy = numeric_attribute(e, b"cy");
            if let (Some(cx), Some(cy)) = (cx, cy) {
                xfrm.extent = Some((cx, cy));
            }
        }
        b"bodyPr" => {
            if let Some(frame) = shape.text_frame.as_mut() {
                frame.anchor = attribute(e, b"anchor")?
                    .as_deref()
                    .and_then(VerticalAnchor::from_ooxml);
            }
        }
        b"pPr" => {
            if let Some(p) = paragraph.as_mut() {
                p.alignment = attribute(e, b"algn")?
                    .as_deref()
                    .and_then(Alignment::from_ooxml);
            }
        }
        b"br" => {
            if let Some(p) = paragraph.as_mut() {
                p.text.push('\u{b}');
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::slide_xml;
    use lyric_core::{Placeholder, PlaceholderType};

    #[test]
    fn test_parse_written_slide() {
        let mut slide = Slide::new(1);
        let mut title = Shape::from_placeholder(2, Placeholder::new(PlaceholderType::Title, 0));
        title.set_text("Amazing grace\nHow sweet\u{b}the sound");
        title.text_frame_mut().align_first_paragraph(Alignment::Center);
        title.text_frame_mut().anchor = Some(VerticalAnchor::Middle);
        title.geometry = Some(Geometry {
            left: 1,
            top: 2,
            width: 3,
            height: 4,
        });
        slide.shapes.push(title.clone());
        slide
            .shapes
            .push(Shape::from_placeholder(3, Placeholder::new(PlaceholderType::Picture, 1)));

        let parsed = parse_slide(&slide_xml(&slide), 1).unwrap();
        assert_eq!(parsed, slide);
    }

    #[test]
    fn test_parse_slide_text_keeps_inner_spaces() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="4" name="Box"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/>
            <p:txBody><a:bodyPr anchor="b"/><a:p><a:r><a:t>  indented </a:t></a:r><a:r><a:t>line</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let slide = parse_slide(xml, 7).unwrap();
        assert_eq!(slide.number, 7);
        assert_eq!(slide.shapes.len(), 1);
        assert_eq!(slide.shapes[0].name, "Box");
        assert_eq!(slide.shapes[0].text(), "  indented line");
        assert_eq!(
            slide.shapes[0].text_frame.as_ref().unwrap().anchor,
            Some(VerticalAnchor::Bottom)
        );
    }
}
