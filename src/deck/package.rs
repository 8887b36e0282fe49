use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};

use super::AssemblyError;
use super::slide::SlidePart;
use super::theme::Palette;
use super::xml;

/// Writes the OPC package for a finished list of slides.
pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add_part(&mut self, path: &str, data: &[u8]) -> Result<(), AssemblyError> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Media is already compressed; store it as-is.
    fn add_media(&mut self, path: &str, data: &[u8]) -> Result<(), AssemblyError> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    pub(crate) fn write_deck(
        mut self,
        title: &str,
        palette: &Palette,
        slides: &[SlidePart],
    ) -> Result<Vec<u8>, AssemblyError> {
        let media: Vec<_> = slides
            .iter()
            .filter(|s| s.has_picture())
            .filter_map(|s| s.image.as_ref().map(|img| img.format))
            .collect();

        // [Content_Types].xml goes first so sniffers recognise the package.
        self.add_part("[Content_Types].xml", xml::content_types(slides.len(), &media).as_bytes())?;
        self.add_part("_rels/.rels", xml::root_rels().as_bytes())?;

        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        self.add_part("docProps/core.xml", xml::core_properties(title, &created).as_bytes())?;
        self.add_part("docProps/app.xml", xml::app_properties(slides.len()).as_bytes())?;

        self.add_part("ppt/presentation.xml", xml::presentation(slides.len()).as_bytes())?;
        self.add_part(
            "ppt/_rels/presentation.xml.rels",
            xml::presentation_rels(slides.len()).as_bytes(),
        )?;
        self.add_part("ppt/slideMasters/slideMaster1.xml", xml::slide_master().as_bytes())?;
        self.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            xml::slide_master_rels().as_bytes(),
        )?;
        self.add_part("ppt/slideLayouts/slideLayout1.xml", xml::slide_layout().as_bytes())?;
        self.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            xml::slide_layout_rels().as_bytes(),
        )?;
        self.add_part("ppt/theme/theme1.xml", xml::theme(palette).as_bytes())?;

        let mut image_counter = 0;
        for (i, slide) in slides.iter().enumerate() {
            let n = i + 1;
            let media_name = match (&slide.image, slide.has_picture()) {
                (Some(image), true) => {
                    image_counter += 1;
                    let name = format!("image{image_counter}.{}", image.format.extension());
                    self.add_media(&format!("ppt/media/{name}"), &image.data)?;
                    Some(name)
                }
                _ => None,
            };
            self.add_part(&format!("ppt/slides/slide{n}.xml"), slide.to_xml().as_bytes())?;
            self.add_part(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide.rels_xml(media_name.as_deref()).as_bytes(),
            )?;
        }

        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}
