//! The `[Content_Types].xml` part.

use crate::xml::{attribute, local_name, xml_error};
use lyric_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Whether an `Override` exists for `part_name` (e.g. `/ppt/slides/slide1.xml`).
pub fn has_override(xml: &str, part_name: &str) -> Result<bool> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Override" =>
            {
                if attribute(e, b"PartName")?.as_deref() == Some(part_name) {
                    return Ok(true);
                }
            }
            Ok(Event::Eof) => return Ok(false),
            Err(e) => return Err(xml_error("Error parsing content types", e)),
            _ => {}
        }
    }
}

/// Add `Override` entries before the closing `</Types>` tag.
///
/// Parts that already have an override are left as they are.
pub fn add_overrides(xml: &str, overrides: &[(String, &str)]) -> Result<String> {
    let mut pending = Vec::with_capacity(overrides.len());
    for (part_name, content_type) in overrides {
        if !has_override(xml, part_name)? {
            pending.push((part_name.as_str(), *content_type));
        }
    }
    if pending.is_empty() {
        return Ok(xml.to_string());
    }

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + pending.len() * 128));
    let mut closed = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing content types", e))?;

        match &event {
            Event::End(e) if local_name(e.name().as_ref()) == b"Types" => {
                for (part_name, content_type) in &pending {
                    let mut element = BytesStart::new("Override");
                    element.push_attribute(("PartName", *part_name));
                    element.push_attribute(("ContentType", *content_type));
                    writer
                        .write_event(Event::Empty(element))
                        .map_err(|e| xml_error("Error writing content types", e))?;
                }
                closed = true;
            }
            Event::Eof => break,
            _ => {}
        }

        writer
            .write_event(&event)
            .map_err(|e| xml_error("Error writing content types", e))?;
    }

    if !closed {
        return Err(Error::MalformedPackage(
            "[Content_Types].xml has no closing </Types>".to_string(),
        ));
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("content types are not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/></Types>"#;

    #[test]
    fn test_has_override() {
        assert!(has_override(TYPES, "/ppt/slides/slide1.xml").unwrap());
        assert!(!has_override(TYPES, "/ppt/slides/slide2.xml").unwrap());
    }

    #[test]
    fn test_add_overrides() {
        let xml = add_overrides(
            TYPES,
            &[
                ("/ppt/slides/slide1.xml".to_string(), CT_SLIDE),
                ("/ppt/slides/slide2.xml".to_string(), CT_SLIDE),
            ],
        )
        .unwrap();

        assert!(has_override(&xml, "/ppt/slides/slide2.xml").unwrap());
        assert_eq!(xml.matches("/ppt/slides/slide1.xml").count(), 1);
        assert!(xml.ends_with("</Types>"));
    }

    #[test]
    fn test_add_overrides_requires_types_element() {
        let err = add_overrides("<Other/>", &[("/a.xml".to_string(), CT_SLIDE)]).unwrap_err();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }
}
