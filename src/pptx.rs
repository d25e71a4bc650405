//! Minimal PresentationML writer for a single-slide deck.
//!
//! Produces an OOXML package with one master, one blank layout, one theme
//! and one slide. Charts are written as chart parts with literal data
//! caches; raster placeholders go to `ppt/media`.

use crate::chart::{ChartDescriptor, ChartKind};
use crate::color::Color;
use crate::document::{Presentation, SlideItem, Stroke};
use crate::geometry::Rect;
use crate::snapshot::TextAlign;
use crate::Result;
use base64::Engine as _;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;
/// EMU per point, for line widths.
pub const EMU_PER_POINT: f64 = 12_700.0;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_C: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Escape text for XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

struct Media {
    name: String,
    bytes: Vec<u8>,
}

/// Parts referenced from the slide, collected while its XML is written.
#[derive(Default)]
struct SlideParts {
    rels: Vec<(String, &'static str, String)>,
    media: Vec<Media>,
    charts: Vec<String>,
}

impl SlideParts {
    fn add_rel(&mut self, kind: &'static str, target: String) -> String {
        // rId1 is the layout
        let id = format!("rId{}", self.rels.len() + 2);
        self.rels.push((id.clone(), kind, target));
        id
    }
}

/// Serialize `deck` into `.pptx` bytes.
pub fn write(deck: &Presentation) -> Result<Vec<u8>> {
    let mut parts = SlideParts::default();
    let slide_xml = slide_xml(deck, &mut parts);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |name: &str, data: &[u8]| -> Result<()> {
        zip.start_file(name, opts)?;
        zip.write_all(data)?;
        Ok(())
    };

    put("[Content_Types].xml", content_types(&parts).as_bytes())?;
    put("_rels/.rels", root_rels().as_bytes())?;
    put("ppt/presentation.xml", presentation_xml(deck).as_bytes())?;
    put("ppt/_rels/presentation.xml.rels", presentation_rels().as_bytes())?;
    put("ppt/slideMasters/slideMaster1.xml", MASTER_XML.as_bytes())?;
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;
    put("ppt/slideLayouts/slideLayout1.xml", LAYOUT_XML.as_bytes())?;
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
    )?;
    put("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;
    put("ppt/slides/slide1.xml", slide_xml.as_bytes())?;

    let mut slide_rels = vec![(
        "rId1".to_string(),
        "slideLayout",
        "../slideLayouts/slideLayout1.xml".to_string(),
    )];
    slide_rels.extend(parts.rels.iter().cloned());
    let slide_rels: Vec<(&str, &str, &str)> = slide_rels
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    put("ppt/slides/_rels/slide1.xml.rels", rels(&slide_rels).as_bytes())?;

    for (i, chart) in parts.charts.iter().enumerate() {
        put(&format!("ppt/charts/chart{}.xml", i + 1), chart.as_bytes())?;
    }
    for m in &parts.media {
        put(&format!("ppt/media/{}", m.name), &m.bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    log::debug!(
        "pptx: {} bytes, {} charts, {} images",
        bytes.len(),
        parts.charts.len(),
        parts.media.len()
    );
    Ok(bytes)
}

fn content_types(parts: &SlideParts) -> String {
    let mut s = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
    );
    for i in 1..=parts.charts.len() {
        let _ = write!(
            s,
            r#"<Override PartName="/ppt/charts/chart{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#
        );
    }
    s.push_str("</Types>");
    s
}

fn root_rels() -> String {
    rels(&[("rId1", "officeDocument", "ppt/presentation.xml")])
}

fn presentation_rels() -> String {
    rels(&[
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "slide", "slides/slide1.xml"),
        ("rId3", "theme", "theme/theme1.xml"),
    ])
}

/// `(id, relationship kind, target)` triples.
fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut s = format!(r#"{XML_DECL}<Relationships xmlns="{NS_REL}">"#);
    for (id, kind, target) in entries {
        let _ = write!(
            s,
            r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{}"/>"#,
            escape(target)
        );
    }
    s.push_str("</Relationships>");
    s
}

fn presentation_xml(deck: &Presentation) -> String {
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        emu(deck.size.width),
        emu(deck.size.height)
    )
}

fn slide_xml(deck: &Presentation, parts: &mut SlideParts) -> String {
    let mut body = String::new();
    for (i, item) in deck.slide.items.iter().enumerate() {
        // id 1 is the group root
        let id = i + 2;
        match item {
            SlideItem::Shape { rect, fill, line, radius, shadow } => {
                shape(&mut body, id, rect, *fill, *line, *radius, *shadow)
            }
            SlideItem::Text { rect, text, font_size, bold, color, align, fill } => {
                text_box(&mut body, id, rect, text, *font_size, *bold, *color, *align, *fill)
            }
            SlideItem::Chart { rect, chart } => {
                parts.charts.push(chart_xml(chart));
                let rid = parts.add_rel("chart", format!("../charts/chart{}.xml", parts.charts.len()));
                graphic_frame(&mut body, id, rect, &rid);
            }
            SlideItem::Image { rect, data_uri } => match decode_data_uri(data_uri) {
                Some((ext, bytes)) => {
                    let name = format!("image{}.{}", parts.media.len() + 1, ext);
                    let rid = parts.add_rel("image", format!("../media/{}", name));
                    parts.media.push(Media { name, bytes });
                    picture(&mut body, id, rect, &rid);
                }
                None => log::warn!("skipping image item {}: not a base64 data URI", i),
            },
        }
    }
    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{body}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn xfrm(out: &mut String, tag: &str, rect: &Rect) {
    let _ = write!(
        out,
        r#"<{tag}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
        emu(rect.x),
        emu(rect.y),
        emu(rect.width.max(0.0)),
        emu(rect.height.max(0.0))
    );
}

fn solid_fill(out: &mut String, color: Color) {
    match color.to_srgb_hex() {
        Some(hex) => {
            let _ = write!(out, r#"<a:solidFill><a:srgbClr val="{hex}"/></a:solidFill>"#);
        }
        None => out.push_str("<a:noFill/>"),
    }
}

fn shape(
    out: &mut String,
    id: usize,
    rect: &Rect,
    fill: Option<Color>,
    line: Option<Stroke>,
    radius: f64,
    shadow: bool,
) {
    let _ = write!(
        out,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#
    );
    xfrm(out, "a:xfrm", rect);
    let short = rect.width.min(rect.height);
    if radius > 0.0 && short > 0.0 {
        let adj = ((radius / short) * 100_000.0).round().min(50_000.0) as i64;
        let _ = write!(
            out,
            r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {adj}"/></a:avLst></a:prstGeom>"#
        );
    } else {
        out.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    }
    solid_fill(out, fill.unwrap_or(Color::Transparent));
    match line {
        Some(stroke) => {
            let _ = write!(out, r#"<a:ln w="{}">"#, (stroke.width * EMU_PER_POINT).round() as i64);
            solid_fill(out, stroke.color);
            out.push_str("</a:ln>");
        }
        None => out.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    if shadow {
        out.push_str(r#"<a:effectLst><a:outerShdw blurRad="38100" dist="12700" dir="5400000" algn="t" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="25000"/></a:srgbClr></a:outerShdw></a:effectLst>"#);
    }
    out.push_str("</p:spPr></p:sp>");
}

#[allow(clippy::too_many_arguments)]
fn text_box(
    out: &mut String,
    id: usize,
    rect: &Rect,
    text: &str,
    font_size: f64,
    bold: bool,
    color: Color,
    align: TextAlign,
    fill: Option<Color>,
) {
    let _ = write!(
        out,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#
    );
    xfrm(out, "a:xfrm", rect);
    out.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    solid_fill(out, fill.unwrap_or(Color::Transparent));
    let algn = match align {
        TextAlign::Left => "l",
        TextAlign::Center => "ctr",
        TextAlign::Right => "r",
        TextAlign::Justify => "just",
    };
    let sz = ((font_size * 100.0).round() as i64).clamp(100, 400_000);
    let _ = write!(
        out,
        r#"</p:spPr><p:txBody><a:bodyPr wrap="square" lIns="0" tIns="0" rIns="0" bIns="0" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p><a:pPr algn="{algn}"/><a:r><a:rPr lang="en-US" sz="{sz}" b="{}" dirty="0">"#,
        if bold { 1 } else { 0 }
    );
    solid_fill(out, if color.is_transparent() { Color::BLACK } else { color });
    let _ = write!(out, "</a:rPr><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>", escape(text));
}

fn graphic_frame(out: &mut String, id: usize, rect: &Rect, rid: &str) {
    let _ = write!(
        out,
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>"#
    );
    xfrm(out, "p:xfrm", rect);
    let _ = write!(
        out,
        r#"<a:graphic><a:graphicData uri="{NS_C}"><c:chart xmlns:c="{NS_C}" r:id="{rid}"/></a:graphicData></a:graphic></p:graphicFrame>"#
    );
}

fn picture(out: &mut String, id: usize, rect: &Rect, rid: &str) {
    let _ = write!(
        out,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>"#
    );
    xfrm(out, "a:xfrm", rect);
    out.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
}

/// `data:image/<png|jpeg>;base64,<payload>` into an extension and bytes.
fn decode_data_uri(uri: &str) -> Option<(&'static str, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let ext = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpeg",
        _ => return None,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
        .map(|bytes| (ext, bytes))
}

fn text_props(out: &mut String, color: Option<Color>) {
    let Some(color) = color else {
        return;
    };
    out.push_str("<c:txPr><a:bodyPr/><a:lstStyle/><a:p><a:pPr><a:defRPr>");
    solid_fill(out, color);
    out.push_str(r#"</a:defRPr></a:pPr><a:endParaRPr lang="en-US"/></a:p></c:txPr>"#);
}

fn chart_xml(chart: &ChartDescriptor) -> String {
    let mut ser = String::from(r#"<c:ser><c:idx val="0"/><c:order val="0"/><c:tx><c:v>Series 1</c:v></c:tx>"#);
    let per_point = matches!(chart.kind, ChartKind::Pie | ChartKind::Doughnut | ChartKind::Bar);
    if !per_point {
        if let Some(&first) = chart.colors.first() {
            ser.push_str("<c:spPr>");
            if chart.kind == ChartKind::Line {
                ser.push_str(r#"<a:ln w="28575">"#);
                solid_fill(&mut ser, first);
                ser.push_str("</a:ln>");
            } else {
                solid_fill(&mut ser, first);
            }
            ser.push_str("</c:spPr>");
        }
    }
    if chart.kind == ChartKind::Bar {
        ser.push_str(r#"<c:invertIfNegative val="0"/>"#);
    }
    if chart.kind == ChartKind::Line {
        ser.push_str(r#"<c:marker><c:symbol val="circle"/></c:marker>"#);
    }
    if per_point {
        for (i, &color) in chart.colors.iter().enumerate() {
            let _ = write!(ser, r#"<c:dPt><c:idx val="{i}"/>"#);
            if chart.kind == ChartKind::Bar {
                ser.push_str(r#"<c:invertIfNegative val="0"/>"#);
            }
            ser.push_str("<c:spPr>");
            solid_fill(&mut ser, color);
            ser.push_str("</c:spPr></c:dPt>");
        }
    }
    if chart.label_color.is_some() {
        ser.push_str("<c:dLbls>");
        text_props(&mut ser, chart.label_color);
        ser.push_str(r#"<c:showLegendKey val="0"/><c:showVal val="1"/><c:showCatName val="0"/><c:showSerName val="0"/><c:showPercent val="0"/><c:showBubbleSize val="0"/></c:dLbls>"#);
    }

    let n = chart.labels.len();
    let _ = write!(ser, r#"<c:cat><c:strLit><c:ptCount val="{n}"/>"#);
    for (i, label) in chart.labels.iter().enumerate() {
        let _ = write!(ser, r#"<c:pt idx="{i}"><c:v>{}</c:v></c:pt>"#, escape(label));
    }
    let _ = write!(ser, r#"</c:strLit></c:cat><c:val><c:numLit><c:formatCode>General</c:formatCode><c:ptCount val="{n}"/>"#);
    for (i, v) in chart.values.iter().enumerate() {
        let _ = write!(ser, r#"<c:pt idx="{i}"><c:v>{v}</c:v></c:pt>"#);
    }
    ser.push_str("</c:numLit></c:val>");
    if chart.kind == ChartKind::Line {
        ser.push_str(r#"<c:smooth val="0"/>"#);
    }
    ser.push_str("</c:ser>");

    const AXES_IDS: &str = r#"<c:axId val="500000001"/><c:axId val="500000002"/>"#;
    let plot = match chart.kind {
        ChartKind::Pie => format!(
            r#"<c:pieChart><c:varyColors val="1"/>{ser}<c:firstSliceAng val="0"/></c:pieChart>"#
        ),
        ChartKind::Doughnut => format!(
            r#"<c:doughnutChart><c:varyColors val="1"/>{ser}<c:firstSliceAng val="0"/><c:holeSize val="50"/></c:doughnutChart>"#
        ),
        ChartKind::Bar => format!(
            r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>{ser}<c:gapWidth val="150"/>{AXES_IDS}</c:barChart>"#
        ),
        ChartKind::Line => format!(
            r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>{ser}<c:marker val="1"/>{AXES_IDS}</c:lineChart>"#
        ),
        ChartKind::Area => format!(
            r#"<c:areaChart><c:grouping val="standard"/><c:varyColors val="0"/>{ser}{AXES_IDS}</c:areaChart>"#
        ),
    };
    let axes = if matches!(chart.kind, ChartKind::Pie | ChartKind::Doughnut) {
        String::new()
    } else {
        let mut a = String::from(r#"<c:catAx><c:axId val="500000001"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="b"/><c:majorTickMark val="none"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#);
        text_props(&mut a, chart.label_color);
        a.push_str(r#"<c:crossAx val="500000002"/><c:crosses val="autoZero"/></c:catAx><c:valAx><c:axId val="500000002"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="l"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="none"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#);
        text_props(&mut a, chart.label_color);
        a.push_str(r#"<c:crossAx val="500000001"/><c:crosses val="autoZero"/></c:valAx>"#);
        a
    };
    let mut legend = String::from(r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/>"#);
    text_props(&mut legend, chart.legend_color);
    legend.push_str("</c:legend>");

    format!(
        r#"{XML_DECL}<c:chartSpace xmlns:c="{NS_C}" xmlns:a="{NS_A}" xmlns:r="{NS_R}"><c:roundedCorners val="0"/><c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>{plot}{axes}</c:plotArea>{legend}<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart></c:chartSpace>"#
    )
}

const MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Dashdeck"><a:themeElements><a:clrScheme name="Dashdeck"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="2563EB"/></a:accent1><a:accent2><a:srgbClr val="16A34A"/></a:accent2><a:accent3><a:srgbClr val="F59E0B"/></a:accent3><a:accent4><a:srgbClr val="DC2626"/></a:accent4><a:accent5><a:srgbClr val="7C3AED"/></a:accent5><a:accent6><a:srgbClr val="0891B2"/></a:accent6><a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme><a:fontScheme name="Dashdeck"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Dashdeck"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Slide;
    use crate::SlideSize;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        s
    }

    fn deck(items: Vec<SlideItem>) -> Presentation {
        Presentation {
            title: "T".into(),
            size: SlideSize { width: 14.4, height: 14.58 },
            slide: Slide { items },
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
        assert_eq!(escape("x\u{1}y"), "xy");
    }

    #[test]
    fn package_has_slide_with_text_and_size() {
        let bytes = write(&deck(vec![SlideItem::Text {
            rect: Rect::new(1.0, 1.0, 2.0, 0.5),
            text: "Revenue & Costs".into(),
            font_size: 12.0,
            bold: true,
            color: Color::Rgb(0x1f, 0x29, 0x37),
            align: TextAlign::Center,
            fill: None,
        }]))
        .unwrap();

        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(pres.contains(r#"<p:sldSz cx="13167360" cy="13331952"/>"#));
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Revenue &amp; Costs</a:t>"));
        assert!(slide.contains(r#"sz="1200" b="1""#));
        assert!(slide.contains(r#"<a:srgbClr val="1F2937"/>"#));
        assert!(slide.contains(r#"algn="ctr""#));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("/ppt/slides/slide1.xml"));
    }

    #[test]
    fn charts_and_images_become_parts() {
        let chart = ChartDescriptor::parse(r#"{"chartType":"pie","labels":["A","B"],"values":[1,2]}"#).unwrap();
        let bytes = write(&deck(vec![
            SlideItem::Chart { rect: Rect::new(0.0, 0.0, 3.0, 3.0), chart },
            SlideItem::Image {
                rect: Rect::new(3.0, 0.0, 3.0, 3.0),
                data_uri: crate::snapshotter::BLANK_PNG.to_string(),
            },
            SlideItem::Image { rect: Rect::new(6.0, 0.0, 1.0, 1.0), data_uri: "not a uri".into() },
        ]))
        .unwrap();

        let chart = read_part(&bytes, "ppt/charts/chart1.xml");
        assert!(chart.contains("<c:pieChart>"));
        assert!(chart.contains(r#"<c:ptCount val="2"/>"#));
        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Target="../charts/chart1.xml""#));
        assert!(rels.contains(r#"Target="../media/image1.png""#));
        let png = read_part_bytes(&bytes, "ppt/media/image1.png");
        assert_eq!(&png[1..4], b"PNG");
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert_eq!(slide.matches("<p:pic>").count(), 1);
    }

    #[test]
    fn rounded_shape_with_stroke() {
        let mut out = String::new();
        shape(
            &mut out,
            2,
            &Rect::new(0.0, 0.0, 4.0, 2.0),
            Some(Color::WHITE),
            Some(Stroke { width: 1.0, color: Color::BLACK }),
            0.2,
            true,
        );
        assert!(out.contains(r#"prst="roundRect""#));
        assert!(out.contains(r#"fmla="val 10000""#));
        assert!(out.contains(r#"<a:ln w="12700">"#));
        assert!(out.contains("<a:outerShdw"));
    }

    fn read_part_bytes(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut v = Vec::new();
        file.read_to_end(&mut v).unwrap();
        v
    }
}
