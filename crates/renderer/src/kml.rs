//! KML output for contour sets.
//!
//! Document layout:
//!
//! ```text
//! <kml>
//!   <Document>
//!     <Style id="LEVEL">...</Style>          one per level, ascending
//!     <Placemark>...</Placemark>             one per polyline, ascending level
//!   </Document>
//! </kml>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::contour::{Contour, ContourSet};
use crate::error::{RenderError, Result};
use crate::gradient::{Color, LinearGradient};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const GX_NAMESPACE: &str = "http://www.google.com/kml/ext/2.2";

/// Stroke width used for every level.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Format a number without trailing zeros, at most 6 decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Style identifier of a level, also used as the placemark name.
pub fn level_id(level: f64) -> String {
    format_number(level)
}

/// Presentation attributes of one contour level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyle {
    pub level: f64,
    pub id: String,
    pub color: Color,
    pub width: f64,
}

/// Serializes contour sets into KML documents.
#[derive(Debug, Clone)]
pub struct KmlWriter {
    pub line_width: f64,
    pub label_visibility: bool,
    pub document_name: Option<String>,
}

impl Default for KmlWriter {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            label_visibility: true,
            document_name: None,
        }
    }
}

impl KmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the `<Document>` element.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = Some(name.into());
        self
    }

    /// One style per level, colored by the level's position between the
    /// lowest and highest level of the set.
    pub fn styles(&self, set: &ContourSet, gradient: &LinearGradient) -> Vec<LevelStyle> {
        let (min_level, max_level) = match (set.min_level(), set.max_level()) {
            (Some(min), Some(max)) => (min, max),
            _ => return vec![],
        };

        set.levels
            .iter()
            .map(|level| LevelStyle {
                level: level.value,
                id: level_id(level.value),
                color: gradient.color_for(level.value, min_level, max_level),
                width: self.line_width,
            })
            .collect()
    }

    /// Serialize `set` with one style per level, in the same order.
    pub fn write(&self, set: &ContourSet, styles: &[LevelStyle]) -> Result<Vec<u8>> {
        if styles.len() != set.len() {
            return Err(RenderError::StyleMismatch {
                levels: set.len(),
                styles: styles.len(),
            });
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("kml");
        root.push_attribute(("xmlns", KML_NAMESPACE));
        root.push_attribute(("xmlns:gx", GX_NAMESPACE));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("Document")))?;

        if let Some(name) = &self.document_name {
            write_text_element(&mut writer, "name", name)?;
        }

        for style in styles {
            self.write_style(&mut writer, style)?;
        }

        for (level, style) in set.levels.iter().zip(styles) {
            for polyline in &level.polylines {
                write_placemark(&mut writer, polyline, &style.id)?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("Document")))?;
        writer.write_event(Event::End(BytesEnd::new("kml")))?;

        debug!(
            levels = set.len(),
            placemarks = set.polyline_count(),
            "Serialized KML document"
        );
        Ok(writer.into_inner())
    }

    fn write_style(&self, writer: &mut Writer<Vec<u8>>, style: &LevelStyle) -> Result<()> {
        let mut start = BytesStart::new("Style");
        start.push_attribute(("id", style.id.as_str()));
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Start(BytesStart::new("LineStyle")))?;

        write_text_element(writer, "width", &format_number(style.width))?;
        if self.label_visibility {
            write_text_element(writer, "gx:labelVisibility", "1")?;
        }
        write_text_element(writer, "color", &style.color.to_kml_hex())?;

        writer.write_event(Event::End(BytesEnd::new("LineStyle")))?;
        writer.write_event(Event::End(BytesEnd::new("Style")))?;
        Ok(())
    }
}

fn write_placemark(writer: &mut Writer<Vec<u8>>, polyline: &Contour, style_id: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    write_text_element(writer, "name", style_id)?;
    write_text_element(writer, "styleUrl", &format!("#{}", style_id))?;

    writer.write_event(Event::Start(BytesStart::new("LineString")))?;
    write_text_element(writer, "coordinates", &format_coordinates(polyline))?;
    writer.write_event(Event::End(BytesEnd::new("LineString")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Space-separated `lon,lat` pairs at 6 decimals.
pub fn format_coordinates(polyline: &Contour) -> String {
    polyline
        .points
        .iter()
        .map(|p| format!("{:.6},{:.6}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
