//! PresentationML for individual slides.

use std::fmt::Write;

use super::image::ImageFormat;
use super::layout::Rect;
use super::xml::escape_xml;

/// Image bytes embedded on one slide.
#[derive(Debug, Clone)]
pub struct SlideImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub size_pt: u32,
    pub bold: bool,
    pub color: String,
    /// Bullet glyph color; `None` renders a plain paragraph.
    pub bullet: Option<String>,
    pub space_after_pt: u32,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Text {
        name: &'static str,
        rect: Rect,
        paragraphs: Vec<Paragraph>,
        align: Align,
        font: &'static str,
    },
    Bar {
        rect: Rect,
        color: String,
    },
    Picture {
        rect: Rect,
        description: String,
    },
}

/// One slide: a background fill, shapes in z-order, and at most one picture.
#[derive(Debug, Clone)]
pub struct SlidePart {
    pub background: String,
    pub shapes: Vec<Shape>,
    pub image: Option<SlideImage>,
}

/// Relationship id of the slide layout; the picture (if any) follows it.
pub const LAYOUT_REL_ID: &str = "rId1";
pub const IMAGE_REL_ID: &str = "rId2";

impl SlidePart {
    pub fn has_picture(&self) -> bool {
        self.image.is_some() && self.shapes.iter().any(|s| matches!(s, Shape::Picture { .. }))
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld>");
        let _ = write!(
            xml,
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            self.background
        );
        xml.push_str("<p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        // Shape ids start at 2; 1 is the group above.
        for (i, shape) in self.shapes.iter().enumerate() {
            let id = i as u32 + 2;
            match shape {
                Shape::Text {
                    name,
                    rect,
                    paragraphs,
                    align,
                    font,
                } => write_text_shape(&mut xml, id, name, rect, paragraphs, *align, font),
                Shape::Bar { rect, color } => write_bar(&mut xml, id, rect, color),
                Shape::Picture { rect, description } => {
                    if self.image.is_some() {
                        write_picture(&mut xml, id, rect, description);
                    }
                }
            }
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        xml
    }

    pub fn rels_xml(&self, media_name: Option<&str>) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        let _ = write!(
            xml,
            r#"<Relationship Id="{LAYOUT_REL_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#
        );
        if let Some(name) = media_name {
            let _ = write!(
                xml,
                r#"<Relationship Id="{IMAGE_REL_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{name}"/>"#
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn write_xfrm(xml: &mut String, rect: &Rect) {
    let _ = write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        rect.x, rect.y, rect.width, rect.height
    );
}

fn write_text_shape(
    xml: &mut String,
    id: u32,
    name: &str,
    rect: &Rect,
    paragraphs: &[Paragraph],
    align: Align,
    font: &str,
) {
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(xml, r#"<p:cNvPr id="{id}" name="{}"/>"#, escape_xml(name));
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
    write_xfrm(xml, rect);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);

    let algn = match align {
        Align::Left => "l",
        Align::Center => "ctr",
    };
    let font = escape_xml(font);
    for p in paragraphs {
        match &p.bullet {
            Some(bullet_color) => {
                let _ = write!(
                    xml,
                    r#"<a:p><a:pPr marL="342900" indent="-342900" algn="{algn}"><a:spcBef><a:spcPts val="{}"/></a:spcBef><a:spcAft><a:spcPts val="{}"/></a:spcAft><a:buClr><a:srgbClr val="{bullet_color}"/></a:buClr><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#,
                    p.space_after_pt * 50,
                    p.space_after_pt * 100,
                );
            }
            None => {
                let _ = write!(
                    xml,
                    r#"<a:p><a:pPr algn="{algn}"><a:spcAft><a:spcPts val="{}"/></a:spcAft><a:buNone/></a:pPr>"#,
                    p.space_after_pt * 100,
                );
            }
        }
        let _ = write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{font}"/><a:cs typeface="{font}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            p.size_pt * 100,
            if p.bold { 1 } else { 0 },
            p.color,
            escape_xml(&p.text),
        );
    }
    xml.push_str("</p:txBody></p:sp>");
}

fn write_bar(xml: &mut String, id: u32, rect: &Rect, color: &str) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Accent Bar {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#
    );
    write_xfrm(xml, rect);
    let _ = write!(
        xml,
        r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#
    );
}

fn write_picture(xml: &mut String, id: u32, rect: &Rect, description: &str) {
    let _ = write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}" descr="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
        escape_xml(description)
    );
    let _ = write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{IMAGE_REL_ID}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>"#
    );
    write_xfrm(xml, rect);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_slide() -> SlidePart {
        SlidePart {
            background: "FFFFFF".into(),
            shapes: vec![Shape::Text {
                name: "Title",
                rect: Rect::new(0, 0, 100, 100),
                paragraphs: vec![Paragraph {
                    text: "R&D <plans>".into(),
                    size_pt: 28,
                    bold: true,
                    color: "0A3278".into(),
                    bullet: None,
                    space_after_pt: 0,
                }],
                align: Align::Left,
                font: "Calibri",
            }],
            image: None,
        }
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = text_slide().to_xml();
        assert!(xml.contains("<a:t>R&amp;D &lt;plans&gt;</a:t>"));
        assert!(xml.contains(r#"sz="2800" b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }

    #[test]
    fn test_picture_needs_image_bytes() {
        let mut slide = text_slide();
        slide.shapes.push(Shape::Picture {
            rect: Rect::new(0, 0, 10, 10),
            description: "x".into(),
        });
        assert!(!slide.has_picture());
        assert!(!slide.to_xml().contains("<p:pic>"));
        assert!(!slide.rels_xml(None).contains(IMAGE_REL_ID));

        slide.image = Some(SlideImage {
            data: vec![0xFF, 0xD8, 0xFF],
            format: ImageFormat::Jpeg,
        });
        assert!(slide.has_picture());
        assert!(slide.to_xml().contains(r#"r:embed="rId2""#));
        assert!(slide.rels_xml(Some("image1.jpeg")).contains("../media/image1.jpeg"));
    }
}
