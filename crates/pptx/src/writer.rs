//! Serializing populated slides as PresentationML.

use crate::rels::{Relationships, RT_SLIDE_LAYOUT};
use crate::xml::escape_attr;
use lyric_core::{Paragraph, Shape, Slide, TextFrame};
use std::fmt::Write as FmtWrite;

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Soft line break inside a paragraph.
const LINE_BREAK: char = '\u{b}';

/// Generate the XML of a slide part.
pub fn slide_xml(slide: &Slide) -> String {
    let mut xml = String::with_capacity(1024 + slide.shapes.len() * 512);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(xml, "<p:sld {}>", SLIDE_NAMESPACES);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(concat!(
        "<p:grpSpPr><a:xfrm>",
        r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
        "</a:xfrm></p:grpSpPr>"
    ));

    for shape in &slide.shapes {
        write_shape(&mut xml, shape);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Generate the relationships part of a slide pointing at its layout.
pub fn slide_rels_xml(layout_target: &str) -> String {
    let mut rels = Relationships::new();
    rels.add(RT_SLIDE_LAYOUT, layout_target);
    rels.to_xml()
}

fn write_shape(xml: &mut String, shape: &Shape) {
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        shape.id,
        escape_attr(&shape.name)
    );

    match &shape.placeholder {
        Some(placeholder) => {
            xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
            if placeholder.kind != lyric_core::PlaceholderType::Object {
                let _ = write!(xml, r#" type="{}""#, placeholder.kind.as_ooxml());
            }
            if let Some(orient) = &placeholder.orient {
                let _ = write!(xml, r#" orient="{}""#, escape_attr(orient));
            }
            if let Some(size) = &placeholder.size {
                let _ = write!(xml, r#" sz="{}""#, escape_attr(size));
            }
            if placeholder.idx != 0 {
                let _ = write!(xml, r#" idx="{}""#, placeholder.idx);
            }
            xml.push_str("/></p:nvPr>");
        }
        None => xml.push_str("<p:cNvSpPr/><p:nvPr/>"),
    }
    xml.push_str("</p:nvSpPr>");

    match (&shape.geometry, &shape.placeholder) {
        (None, Some(_)) => xml.push_str("<p:spPr/>"),
        (geometry, placeholder) => {
            xml.push_str("<p:spPr>");
            if let Some(g) = geometry {
                let _ = write!(
                    xml,
                    r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
                    g.left, g.top, g.width, g.height
                );
            }
            if placeholder.is_none() {
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
            }
            xml.push_str("</p:spPr>");
        }
    }

    if let Some(frame) = &shape.text_frame {
        write_text_frame(xml, frame);
    }

    xml.push_str("</p:sp>");
}

fn write_text_frame(xml: &mut String, frame: &TextFrame) {
    xml.push_str("<p:txBody>");
    match frame.anchor {
        Some(anchor) => {
            let _ = write!(xml, r#"<a:bodyPr anchor="{}"/>"#, anchor.as_ooxml());
        }
        None => xml.push_str("<a:bodyPr/>"),
    }
    xml.push_str("<a:lstStyle/>");

    if frame.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in &frame.paragraphs {
        write_paragraph(xml, paragraph);
    }

    xml.push_str("</p:txBody>");
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    if paragraph.text.is_empty() && paragraph.alignment.is_none() {
        xml.push_str("<a:p/>");
        return;
    }

    xml.push_str("<a:p>");
    if let Some(alignment) = paragraph.alignment {
        let _ = write!(xml, r#"<a:pPr algn="{}"/>"#, alignment.as_ooxml());
    }

    for (i, segment) in paragraph.text.split(LINE_BREAK).enumerate() {
        if i > 0 {
            xml.push_str(r#"<a:br><a:rPr lang="en-US" dirty="0"/></a:br>"#);
        }
        if !segment.is_empty() {
            let _ = write!(
                xml,
                r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
                escape_text(segment)
            );
        }
    }

    xml.push_str("</a:p>");
}

/// Escape run text, encoding characters XML 1.0 cannot carry as `_xHHHH_`.
fn escape_text(text: &str) -> String {
    let encoded: String = text
        .chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                format!("_x{:04X}_", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect();
    escape_attr(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyric_core::{Alignment, Geometry, Placeholder, PlaceholderType, VerticalAnchor};

    fn title_slide(text: &str) -> Slide {
        let mut slide = Slide::new(1);
        let mut title = Shape::from_placeholder(2, Placeholder::new(PlaceholderType::Title, 0));
        title.set_text(text);
        title.text_frame_mut().align_first_paragraph(Alignment::Center);
        slide.shapes.push(title);
        slide
    }

    #[test]
    fn test_slide_xml_placeholder_without_geometry() {
        let xml = slide_xml(&title_slide("Amazing grace"));

        assert!(xml.starts_with(r#"<?xml version="1.0""#));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Title 1"/>"#));
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains("<p:spPr/>"));
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains("<a:t>Amazing grace</a:t>"));
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_slide_xml_geometry_and_anchor() {
        let mut slide = title_slide("A");
        let shape = &mut slide.shapes[0];
        shape.geometry = Some(Geometry {
            left: 457_200,
            top: 1_143_000,
            width: 8_229_600,
            height: 4_572_000,
        });
        shape.text_frame_mut().anchor = Some(VerticalAnchor::Middle);

        let xml = slide_xml(&slide);
        assert!(xml.contains(
            r#"<a:xfrm><a:off x="457200" y="1143000"/><a:ext cx="8229600" cy="4572000"/></a:xfrm>"#
        ));
        assert!(xml.contains(r#"<a:bodyPr anchor="ctr"/>"#));
        assert!(!xml.contains("prstGeom"));
    }

    #[test]
    fn test_object_placeholder_omits_type() {
        let mut slide = Slide::new(1);
        slide
            .shapes
            .push(Shape::from_placeholder(3, Placeholder::new(PlaceholderType::Object, 1)));

        let xml = slide_xml(&slide);
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:p/>"));
    }

    #[test]
    fn test_text_is_escaped_and_breaks_written() {
        let xml = slide_xml(&title_slide("Rock & <Roll>\u{b}again\nnext"));

        assert!(xml.contains("<a:t>Rock &amp; &lt;Roll&gt;</a:t>"));
        assert!(xml.contains("<a:br>"));
        assert!(xml.contains("<a:t>again</a:t>"));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }

    #[test]
    fn test_control_characters_are_encoded() {
        assert_eq!(escape_text("a\u{1}b"), "a_x0001_b");
        assert_eq!(escape_text("tab\there"), "tab\there");
    }

    #[test]
    fn test_slide_rels_point_at_layout() {
        let xml = slide_rels_xml("../slideLayouts/slideLayout6.xml");
        let rels = Relationships::parse(&xml).unwrap();
        let layout = rels.of_type(RT_SLIDE_LAYOUT).next().unwrap();
        assert_eq!(layout.id, "rId1");
        assert_eq!(layout.target, "../slideLayouts/slideLayout6.xml");
    }
}
