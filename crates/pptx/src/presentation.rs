//! Reading and extending the main `presentation.xml` part.

use crate::xml::{local_name, numeric_attribute, relationship_id, xml_error};
use lyric_core::{Error, Result, SlideSize};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Smallest id PowerPoint allows in `<p:sldId>`.
pub const MIN_SLIDE_ID: u32 = 256;

/// Lists that must precede `<p:sldIdLst>` inside `<p:presentation>`.
const LISTS_BEFORE_SLIDES: &[&[u8]] =
    &[b"sldMasterIdLst", b"notesMasterIdLst", b"handoutMasterIdLst"];

/// Facts read from `presentation.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Slide dimensions from `<p:sldSz>`.
    pub slide_size: Option<SlideSize>,

    /// Relationship ids of the slide masters, in order.
    pub master_rel_ids: Vec<String>,

    /// `(id, relationship id)` of each slide, in presentation order.
    pub slides: Vec<(u32, String)>,
}

impl PresentationInfo {
    /// Parse `presentation.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut info = Self {
            slide_size: None,
            master_rel_ids: Vec::new(),
            slides: Vec::new(),
        };

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match local_name(e.name().as_ref()) {
                        b"sldMasterId" => {
                            if let Some(rel_id) = relationship_id(e)? {
                                info.master_rel_ids.push(rel_id);
                            }
                        }
                        b"sldId" => {
                            let id = numeric_attribute::<u32>(e, b"id").unwrap_or(0);
                            if let Some(rel_id) = relationship_id(e)? {
                                info.slides.push((id, rel_id));
                            }
                        }
                        b"sldSz" => {
                            let cx = numeric_attribute::<i64>(e, b"cx");
                            let cy = numeric_attribute::<i64>(e, b"cy");
                            if let (Some(cx), Some(cy)) = (cx, cy) {
                                info.slide_size = Some(SlideSize::new(cx, cy));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("Error parsing presentation.xml", e)),
                _ => {}
            }
        }

        Ok(info)
    }

    /// Slide size, required for placing shapes.
    pub fn require_slide_size(&self) -> Result<SlideSize> {
        self.slide_size.ok_or_else(|| {
            Error::MalformedPackage("presentation.xml has no valid <p:sldSz>".to_string())
        })
    }

    /// Id for the next slide appended to the deck.
    pub fn next_slide_id(&self) -> u32 {
        self.slides
            .iter()
            .map(|(id, _)| id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID)
    }
}

/// Append `<p:sldId>` entries to `presentation.xml`.
///
/// The slide id list is created in its schema position when absent.
pub fn append_slide_ids(xml: &str, entries: &[(u32, String)]) -> Result<String> {
    if entries.is_empty() {
        return Ok(xml.to_string());
    }

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + entries.len() * 48));

    let mut prefix = String::new();
    let mut depth = 0usize;
    let mut inserted = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing presentation.xml", e))?;

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let name = e.name();
                if depth == 0 {
                    prefix = name
                        .as_ref()
                        .iter()
                        .position(|&b| b == b':')
                        .map(|pos| String::from_utf8_lossy(&name.as_ref()[..pos]).into_owned())
                        .unwrap_or_default();
                }

                let local = local_name(name.as_ref());
                if depth == 1 && !inserted {
                    match (local == b"sldIdLst", &event) {
                        // `<p:sldIdLst/>` is replaced by a populated list.
                        (true, Event::Empty(_)) => {
                            write_slide_id_list(&mut writer, &prefix, entries)?;
                            inserted = true;
                            continue;
                        }
                        // Entries go in before the existing list's end tag.
                        (true, _) => {}
                        (false, _) if !LISTS_BEFORE_SLIDES.contains(&local) => {
                            write_slide_id_list(&mut writer, &prefix, entries)?;
                            inserted = true;
                        }
                        _ => {}
                    }
                }

                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 && !inserted && local_name(e.name().as_ref()) == b"sldIdLst" {
                    write_slide_ids(&mut writer, &prefix, entries)?;
                    inserted = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        writer
            .write_event(&event)
            .map_err(|e| xml_error("Error writing presentation.xml", e))?;
    }

    if !inserted {
        return Err(Error::MalformedPackage(
            "presentation.xml has no place for a slide list".to_string(),
        ));
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("presentation.xml is not UTF-8: {}", e)))
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

fn write_slide_ids(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    entries: &[(u32, String)],
) -> Result<()> {
    let name = qualified(prefix, "sldId");
    for (id, rel_id) in entries {
        let mut element = BytesStart::new(name.as_str());
        element.push_attribute(("id", id.to_string().as_str()));
        element.push_attribute(("r:id", rel_id.as_str()));
        writer
            .write_event(Event::Empty(element))
            .map_err(|e| xml_error("Error writing presentation.xml", e))?;
    }
    Ok(())
}

fn write_slide_id_list(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    entries: &[(u32, String)],
) -> Result<()> {
    let name = qualified(prefix, "sldIdLst");
    writer
        .write_event(Event::Start(BytesStart::new(name.as_str())))
        .map_err(|e| xml_error("Error writing presentation.xml", e))?;
    write_slide_ids(writer, prefix, entries)?;
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(|e| xml_error("Error writing presentation.xml", e))?;
    Ok(())
}
