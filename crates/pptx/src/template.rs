//! The bundled bootstrap template.
//!
//! A plain 4:3 deck with one slide master, the eleven standard layouts and
//! an Office theme. Layout index 5 is "Title Only".

use crate::document::PptxDocument;
use crate::package::{Package, CONTENT_TYPES_PART};
use crate::rels::{Relationships, RT_SLIDE_MASTER};
use lyric_core::{Error, Result, SlideDeck, DEFAULT_LAYOUT_INDEX};
use std::fs;
use std::path::Path;

/// Title given to the single slide of a freshly created template.
pub const SAMPLE_TITLE: &str = "Sample Title";

/// Number of layouts in the bundled slide master.
const LAYOUT_COUNT: usize = 11;

const LAYOUTS: [&str; LAYOUT_COUNT] = [
    include_str!("../resources/slideLayouts/slideLayout1.xml"),
    include_str!("../resources/slideLayouts/slideLayout2.xml"),
    include_str!("../resources/slideLayouts/slideLayout3.xml"),
    include_str!("../resources/slideLayouts/slideLayout4.xml"),
    include_str!("../resources/slideLayouts/slideLayout5.xml"),
    include_str!("../resources/slideLayouts/slideLayout6.xml"),
    include_str!("../resources/slideLayouts/slideLayout7.xml"),
    include_str!("../resources/slideLayouts/slideLayout8.xml"),
    include_str!("../resources/slideLayouts/slideLayout9.xml"),
    include_str!("../resources/slideLayouts/slideLayout10.xml"),
    include_str!("../resources/slideLayouts/slideLayout11.xml"),
];

const FIXED_PARTS: &[(&str, &str)] = &[
    (
        CONTENT_TYPES_PART,
        include_str!("../resources/content_types.xml"),
    ),
    ("_rels/.rels", include_str!("../resources/rels/root.rels")),
    (
        "docProps/core.xml",
        include_str!("../resources/docProps/core.xml"),
    ),
    (
        "docProps/app.xml",
        include_str!("../resources/docProps/app.xml"),
    ),
    (
        "ppt/presentation.xml",
        include_str!("../resources/presentation.xml"),
    ),
    (
        "ppt/_rels/presentation.xml.rels",
        include_str!("../resources/rels/presentation.xml.rels"),
    ),
    ("ppt/presProps.xml", include_str!("../resources/presProps.xml")),
    ("ppt/viewProps.xml", include_str!("../resources/viewProps.xml")),
    (
        "ppt/tableStyles.xml",
        include_str!("../resources/tableStyles.xml"),
    ),
    (
        "ppt/slideMasters/slideMaster1.xml",
        include_str!("../resources/slideMasters/slideMaster1.xml"),
    ),
    (
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        include_str!("../resources/rels/slideMaster1.xml.rels"),
    ),
    (
        "ppt/theme/theme1.xml",
        include_str!("../resources/theme/theme1.xml"),
    ),
];

/// Build the bundled template package in memory.
pub fn bundled_package() -> Package {
    let mut package = Package::new();

    for (name, xml) in FIXED_PARTS {
        package.set_part(*name, *xml);
    }

    // Every layout points back at the single master.
    let mut layout_rels = Relationships::new();
    layout_rels.add(RT_SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
    let layout_rels = layout_rels.to_xml();

    for (i, xml) in LAYOUTS.iter().enumerate() {
        let number = i + 1;
        package.set_part(format!("ppt/slideLayouts/slideLayout{}.xml", number), *xml);
        package.set_part(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", number),
            layout_rels.as_str(),
        );
    }

    package
}

/// Write a new template at `path` holding one "Title Only" slide titled
/// [`SAMPLE_TITLE`].
///
/// Refuses to overwrite an existing file. Missing parent directories are
/// created.
pub fn create_template(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::DestinationExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut document = PptxDocument::from_package(bundled_package())?;
    let slide = document.add_slide(DEFAULT_LAYOUT_INDEX)?;
    let title = slide.title_index().ok_or(Error::MissingTitle {
        slide: slide.number,
    })?;
    slide.shapes[title].set_text(SAMPLE_TITLE);

    document.save(path)?;
    log::info!("Created template {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::DeckReader;
    use std::fs::File;

    #[test]
    fn test_bundled_package_parts() {
        let package = bundled_package();

        assert!(package.contains("ppt/presentation.xml"));
        assert!(package.contains("ppt/slideLayouts/slideLayout11.xml"));
        assert!(package.contains("ppt/slideLayouts/_rels/slideLayout6.xml.rels"));
        assert!(!package.part_names().any(|n| n.starts_with("ppt/slides/")));

        let rels = package
            .xml_part("ppt/slideLayouts/_rels/slideLayout1.xml.rels")
            .unwrap();
        let rels = Relationships::parse(&rels).unwrap();
        assert_eq!(
            rels.of_type(RT_SLIDE_MASTER).next().unwrap().target,
            "../slideMasters/slideMaster1.xml"
        );
    }

    #[test]
    fn test_create_template_writes_sample_slide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("template.pptx");

        create_template(&path).unwrap();

        let contents = DeckReader::new().read(File::open(&path).unwrap()).unwrap();
        assert_eq!(contents.slides.len(), 1);
        let slide = &contents.slides[0];
        assert_eq!(slide.layout_name.as_deref(), Some("Title Only"));
        assert_eq!(slide.title().unwrap().text(), SAMPLE_TITLE);
    }

    #[test]
    fn test_create_template_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.pptx");
        fs::write(&path, b"keep me").unwrap();

        let err = create_template(&path).unwrap_err();
        assert!(matches!(err, Error::DestinationExists(_)));
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
    }
}
