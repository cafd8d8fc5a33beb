//! Slide layouts and the slides instantiated from them.

use crate::xml::{attribute, local_name, relationship_id, xml_error};
use lyric_core::{Placeholder, PlaceholderType, Result, Shape, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A slide layout of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLayout {
    /// Package part name, e.g. `ppt/slideLayouts/slideLayout6.xml`.
    pub part_name: String,

    /// Display name from `<p:cSld name>`, e.g. "Title Only".
    pub name: String,

    /// Top-level placeholders in document order.
    pub placeholders: Vec<Placeholder>,
}

impl SlideLayout {
    /// Parse a layout part.
    pub fn parse(part_name: &str, xml: &str) -> Result<Self> {
        let mut layout = Self {
            part_name: part_name.to_string(),
            name: String::new(),
            placeholders: Vec::new(),
        };

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        // Placeholders inside group shapes are not cloned onto slides.
        let mut group_depth = 0usize;
        let mut in_shape = false;
        let mut current: Option<Placeholder> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"cSld" => layout.name = attribute(e, b"name")?.unwrap_or_default(),
                    b"grpSp" => group_depth += 1,
                    b"sp" if group_depth == 0 => {
                        in_shape = true;
                        current = None;
                    }
                    b"ph" if in_shape => current = Some(parse_placeholder(e)?),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                    b"cSld" => layout.name = attribute(e, b"name")?.unwrap_or_default(),
                    b"ph" if in_shape => current = Some(parse_placeholder(e)?),
                    _ => {}
                },
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"grpSp" => group_depth = group_depth.saturating_sub(1),
                    b"sp" if in_shape && group_depth == 0 => {
                        in_shape = false;
                        if let Some(placeholder) = current.take() {
                            layout.placeholders.push(placeholder);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(xml_error(&format!("Error parsing layout '{}'", part_name), e));
                }
                _ => {}
            }
        }

        Ok(layout)
    }

    /// Build slide `number` with a copy of every cloneable placeholder.
    ///
    /// Shape ids start at 2; geometry is inherited from the layout.
    pub fn instantiate(&self, number: usize) -> Slide {
        let mut slide = Slide::new(number);
        slide.layout_name = Some(self.name.clone()).filter(|n| !n.is_empty());

        for placeholder in &self.placeholders {
            if !placeholder.kind.is_cloned_to_slides() {
                continue;
            }
            let id = slide.next_shape_id();
            slide
                .shapes
                .push(Shape::from_placeholder(id, placeholder.clone()));
        }

        slide
    }
}

/// Read a `<p:ph>` element. Missing `type` means object, missing `idx` means 0.
pub(crate) fn parse_placeholder(e: &BytesStart<'_>) -> Result<Placeholder> {
    let kind = match attribute(e, b"type")? {
        Some(value) => PlaceholderType::from_ooxml(&value).unwrap_or_else(|| {
            log::warn!("Unknown placeholder type '{}', treating as object", value);
            PlaceholderType::Object
        }),
        None => PlaceholderType::Object,
    };
    let idx = attribute(e, b"idx")?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    Ok(Placeholder {
        kind,
        idx,
        orient: attribute(e, b"orient")?,
        size: attribute(e, b"sz")?,
    })
}

/// Relationship ids of a slide master's layouts, in layout-list order.
pub fn master_layout_rel_ids(master_xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(master_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                if let Some(rel_id) = relationship_id(e)? {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing slide master", e)),
            _ => {}
        }
    }

    Ok(ids)
}
