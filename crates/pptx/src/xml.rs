//! Small XML helpers shared by the part readers and writers.

use lyric_core::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::BytesStart;

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Escape text for use inside an attribute value or element content.
pub fn escape_attr(value: &str) -> String {
    escape(value).into_owned()
}

/// Value of the attribute whose qualified name is exactly `key`.
pub fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::XmlError(format!("Bad attribute value: {}", err)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Value of a namespaced `id` attribute such as `r:id`.
///
/// Plain `id` attributes on the same element are ignored.
pub fn relationship_id(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        if key.contains(&b':') && local_name(key) == b"id" {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::XmlError(format!("Bad attribute value: {}", err)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a numeric attribute, treating absent or invalid values as `None`.
pub fn numeric_attribute<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attribute(e, key).ok().flatten().and_then(|v| v.parse().ok())
}

/// Wrap a quick-xml error with context.
pub fn xml_error(context: &str, err: impl std::fmt::Display) -> Error {
    Error::XmlError(format!("{}: {}", context, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
    }

    #[test]
    fn test_relationship_id_ignores_plain_id() {
        let mut element = BytesStart::new("p:sldLayoutId");
        element.push_attribute(("id", "2147483649"));
        element.push_attribute(("r:id", "rId1"));

        assert_eq!(relationship_id(&element).unwrap(), Some("rId1".to_string()));
        assert_eq!(
            attribute(&element, b"id").unwrap(),
            Some("2147483649".to_string())
        );
        assert_eq!(numeric_attribute::<u32>(&element, b"id"), Some(2_147_483_649));
    }
}
