//! A template presentation opened for adding slides.

use crate::content_types::{add_overrides, CT_SLIDE};
use crate::layout::{master_layout_rel_ids, SlideLayout};
use crate::output::write_new;
use crate::package::{
    rels_part_for, relative_target, resolve_target, Package, CONTENT_TYPES_PART,
};
use crate::presentation::{append_slide_ids, PresentationInfo};
use crate::rels::{Relationships, RT_OFFICE_DOCUMENT, RT_SLIDE};
use crate::writer::{slide_rels_xml, slide_xml};
use lyric_core::{Error, Result, Slide, SlideDeck, SlideSize};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::LazyLock;

/// Matches slide part names and captures their number.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)slides/slide(\d+)\.xml$").unwrap());

/// Locate the main presentation part through the package relationships.
pub fn main_part_name(package: &Package) -> Result<String> {
    let rels = Relationships::parse(&package.xml_part("_rels/.rels")?)?;
    let main = rels.of_type(RT_OFFICE_DOCUMENT).next().ok_or_else(|| {
        Error::MalformedPackage("package has no officeDocument relationship".to_string())
    })?;
    Ok(resolve_target("", &main.target))
}

/// A slide added in memory, not yet written into the package.
#[derive(Debug, Clone)]
struct AddedSlide {
    layout_part: String,
    slide: Slide,
}

/// A presentation opened from a template, with slides appended in memory.
///
/// Nothing touches disk until [`PptxDocument::save`].
#[derive(Debug, Clone)]
pub struct PptxDocument {
    package: Package,
    presentation_part: String,
    info: PresentationInfo,
    slide_size: SlideSize,
    layouts: Vec<SlideLayout>,
    added: Vec<AddedSlide>,
}

impl PptxDocument {
    /// Open a template file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::TemplateMissing(path.to_path_buf()));
        }
        let file = File::open(path)?;
        log::debug!("Opening template {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    /// Open a template from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    /// Open a template from an in-memory package.
    pub fn from_package(package: Package) -> Result<Self> {
        let presentation_part = main_part_name(&package)?;
        let info = PresentationInfo::parse(&package.xml_part(&presentation_part)?)?;
        let slide_size = info.require_slide_size()?;
        let layouts = load_layouts(&package, &presentation_part, &info)?;

        log::debug!(
            "Template has {} existing slides and {} layouts",
            info.slides.len(),
            layouts.len()
        );

        Ok(Self {
            package,
            presentation_part,
            info,
            slide_size,
            layouts,
            added: Vec::new(),
        })
    }

    /// Slide layouts of the first slide master, in layout-list order.
    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Number of slides, including those already in the template.
    pub fn slide_count(&self) -> usize {
        self.info.slides.len() + self.added.len()
    }

    /// Slides added since the template was opened.
    pub fn added_slides(&self) -> impl Iterator<Item = &Slide> {
        self.added.iter().map(|a| &a.slide)
    }

    /// Serialize the presentation, including every added slide.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.added.is_empty() {
            return self.package.to_bytes();
        }

        let mut package = self.package.clone();
        let pres_rels_part = rels_part_for(&self.presentation_part);
        let mut pres_rels = Relationships::parse(&package.xml_part(&pres_rels_part)?)?;

        let slides_dir = match self.presentation_part.rsplit_once('/') {
            Some((dir, _)) => format!("{}/slides", dir),
            None => "slides".to_string(),
        };
        let mut part_number = next_slide_part_number(&package);
        let mut slide_id = self.info.next_slide_id();

        let mut entries = Vec::with_capacity(self.added.len());
        let mut overrides = Vec::with_capacity(self.added.len());

        for added in &self.added {
            let part = format!("{}/slide{}.xml", slides_dir, part_number);
            let layout_target = relative_target(&part, &added.layout_part);

            package.set_part(part.as_str(), slide_xml(&added.slide));
            package.set_part(rels_part_for(&part), slide_rels_xml(&layout_target));

            let rel_id = pres_rels.add(RT_SLIDE, &relative_target(&self.presentation_part, &part));
            entries.push((slide_id, rel_id));
            overrides.push((format!("/{}", part), CT_SLIDE));

            part_number += 1;
            slide_id += 1;
        }

        let presentation_xml = package.xml_part(&self.presentation_part)?;
        package.set_part(
            self.presentation_part.as_str(),
            append_slide_ids(&presentation_xml, &entries)?,
        );
        package.set_part(pres_rels_part, pres_rels.to_xml());

        let content_types = package.xml_part(CONTENT_TYPES_PART)?;
        package.set_part(CONTENT_TYPES_PART, add_overrides(&content_types, &overrides)?);

        package.to_bytes()
    }

    /// Write the presentation to a new file. Existing files are never replaced.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_new(path, &bytes)?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl SlideDeck for PptxDocument {
    fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide> {
        let layout = self.layouts.get(layout_index).ok_or(Error::LayoutNotFound {
            index: layout_index,
            available: self.layouts.len(),
        })?;

        let slide = layout.instantiate(self.slide_count() + 1);
        let layout_part = layout.part_name.clone();

        let index = self.added.len();
        self.added.push(AddedSlide { layout_part, slide });
        Ok(&mut self.added[index].slide)
    }
}

/// Load the layouts of the first slide master.
fn load_layouts(
    package: &Package,
    presentation_part: &str,
    info: &PresentationInfo,
) -> Result<Vec<SlideLayout>> {
    let pres_rels = Relationships::parse(&package.xml_part(&rels_part_for(presentation_part))?)?;

    let master_rel_id = info.master_rel_ids.first().ok_or_else(|| {
        Error::MalformedPackage("presentation has no slide master".to_string())
    })?;
    let master_rel = pres_rels.get(master_rel_id).ok_or_else(|| {
        Error::MalformedPackage(format!("slide master relationship {} not found", master_rel_id))
    })?;
    let master_part = resolve_target(presentation_part, &master_rel.target);

    let master_xml = package.xml_part(&master_part)?;
    let master_rels = Relationships::parse(&package.xml_part(&rels_part_for(&master_part))?)?;

    let mut layouts = Vec::new();
    for rel_id in master_layout_rel_ids(&master_xml)? {
        let rel = master_rels.get(&rel_id).ok_or_else(|| {
            Error::MalformedPackage(format!("slide layout relationship {} not found", rel_id))
        })?;
        let layout_part = resolve_target(&master_part, &rel.target);
        layouts.push(SlideLayout::parse(&layout_part, &package.xml_part(&layout_part)?)?);
    }

    Ok(layouts)
}

/// One past the highest slide part number in the package.
fn next_slide_part_number(package: &Package) -> u32 {
    package
        .part_names()
        .filter_map(|name| SLIDE_PART_REGEX.captures(name))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}
