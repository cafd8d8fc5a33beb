//! Relationship (`.rels`) parts.

use crate::xml::escape_attr;
use lyric_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

pub const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const RT_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const RT_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const RT_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A single relationship from a source part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `External` for targets outside the package.
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Whether the target lives outside the package.
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }
}

/// All relationships of one source part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Self::new();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        target_mode: None,
                    };

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| {
                                Error::XmlError(format!("Bad relationship attribute: {}", e))
                            })?
                            .to_string();
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.target_mode = Some(value),
                            _ => {}
                        }
                    }

                    rels.items.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// All relationships of the given type, in document order.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.rel_type == rel_type)
    }

    /// One past the highest `rIdN` in use.
    pub fn next_id(&self) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        format!("rId{}", next)
    }

    /// Add an internal relationship and return its id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: None,
        });
        id
    }

    /// Serialize as a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.items.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        for rel in &self.items {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_attr(&rel.id),
                escape_attr(&rel.rel_type),
                escape_attr(&rel.target)
            ));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape_attr(mode)));
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse(MASTER_RELS).unwrap();
        assert!(rels.get("rId3").is_some());
        assert_eq!(
            rels.get("rId1").map(|r| r.target.as_str()),
            Some("../slideLayouts/slideLayout1.xml")
        );
        assert_eq!(rels.of_type(RT_SLIDE_LAYOUT).count(), 2);

        let link = rels.get("rId9").unwrap();
        assert!(link.is_external());
        assert_eq!(link.target, "https://example.com/?a=1&b=2");
    }

    #[test]
    fn test_next_id_skips_used_ids() {
        let rels = Relationships::parse(MASTER_RELS).unwrap();
        assert_eq!(rels.next_id(), "rId10");
        assert_eq!(Relationships::new().next_id(), "rId1");
    }

    #[test]
    fn test_add_and_serialize() {
        let mut rels = Relationships::new();
        let id = rels.add(RT_SLIDE_LAYOUT, "../slideLayouts/slideLayout6.xml");
        assert_eq!(id, "rId1");

        let reparsed = Relationships::parse(&rels.to_xml()).unwrap();
        assert_eq!(reparsed, rels);
    }

    #[test]
    fn test_external_target_is_escaped() {
        let rels = Relationships::parse(MASTER_RELS).unwrap();
        let xml = rels.to_xml();
        assert!(xml.contains("a=1&amp;b=2"));
        assert!(xml.contains(r#"TargetMode="External""#));
    }
}
