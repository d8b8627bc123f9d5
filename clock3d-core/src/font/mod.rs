/// Typeface fonts: decoding, sources and the shared resource cache
///
/// Fonts use the JSON typeface layout common to web 3D text tools: a glyph
/// table keyed by character, each glyph carrying its advance width and an
/// outline command string in font units.
use std::collections::HashMap;

use serde::Deserialize;

use crate::error::FontLoadError;
use outline::PathCommand;

pub mod cache;
pub mod outline;
pub mod source;

pub use cache::FontCache;
pub use source::{FontSource, StdFontSource, BUILTIN_FONT};

/// A single decoded glyph, in font units.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub advance: f32,
    pub x_min: f32,
    pub x_max: f32,
    pub commands: Vec<PathCommand>,
}

/// A decoded typeface, shared read-only between label builds.
#[derive(Debug, Clone)]
pub struct Font {
    pub family: String,
    /// Font units per em
    pub resolution: f32,
    /// Baseline-to-baseline distance in font units
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Deserialize)]
struct TypefaceDocument {
    glyphs: HashMap<String, TypefaceGlyph>,
    #[serde(rename = "familyName", default)]
    family_name: String,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounding_box: TypefaceBounds,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
}

#[derive(Deserialize)]
struct TypefaceBounds {
    #[serde(rename = "yMin")]
    y_min: f32,
    #[serde(rename = "yMax")]
    y_max: f32,
}

#[derive(Deserialize)]
struct TypefaceGlyph {
    ha: f32,
    #[serde(default)]
    x_min: f32,
    #[serde(default)]
    x_max: f32,
    #[serde(default)]
    o: String,
}

impl Font {
    /// Decode a typeface JSON document. `id` only labels errors.
    pub fn from_typeface_json(id: &str, data: &[u8]) -> Result<Self, FontLoadError> {
        let document: TypefaceDocument =
            serde_json::from_slice(data).map_err(|e| FontLoadError::Json {
                id: id.to_string(),
                message: e.to_string(),
            })?;

        if document.resolution <= 0.0 {
            return Err(FontLoadError::Json {
                id: id.to_string(),
                message: format!("invalid resolution {}", document.resolution),
            });
        }

        let mut glyphs = HashMap::with_capacity(document.glyphs.len());
        for (key, raw) in document.glyphs {
            let mut chars = key.chars();
            let (Some(character), None) = (chars.next(), chars.next()) else {
                log::warn!("font {id}: skipping glyph key {key:?}, expected one character");
                continue;
            };
            let commands = outline::parse_outline(&raw.o).map_err(|message| {
                FontLoadError::Outline {
                    glyph: key.clone(),
                    message,
                }
            })?;
            glyphs.insert(
                character,
                Glyph {
                    advance: raw.ha,
                    x_min: raw.x_min,
                    x_max: raw.x_max,
                    commands,
                },
            );
        }

        let bounds = &document.bounding_box;
        Ok(Self {
            family: document.family_name,
            resolution: document.resolution,
            line_height: bounds.y_max - bounds.y_min + document.underline_thickness,
            glyphs,
        })
    }

    pub fn glyph(&self, character: char) -> Option<&Glyph> {
        self.glyphs.get(&character)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// World units per font unit for text of height `size`
    pub fn scale(&self, size: f32) -> f32 {
        size / self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "glyphs": {
            "1": { "ha": 600, "x_min": 150, "x_max": 350, "o": "m 250 0 l 350 0 l 350 700 l 250 700 z" },
            " ": { "ha": 300, "x_min": 0, "x_max": 0 }
        },
        "familyName": "Sample",
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "xMin": 0, "yMax": 900, "xMax": 600 },
        "underlineThickness": 50
    }"#;

    #[test]
    fn test_decode_typeface() {
        let font = Font::from_typeface_json("sample", SAMPLE.as_bytes()).unwrap();
        assert_eq!(font.family, "Sample");
        assert_eq!(font.glyph_count(), 2);
        assert!((font.line_height - 1150.0).abs() < 1e-3);
        assert!((font.scale(0.5) - 0.0005).abs() < 1e-9);

        let one = font.glyph('1').unwrap();
        assert_eq!(one.advance, 600.0);
        assert_eq!(one.commands.len(), 5);
        assert!(font.glyph(' ').unwrap().commands.is_empty());
        assert!(font.glyph('2').is_none());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = Font::from_typeface_json("broken", b"{ not json").unwrap_err();
        assert!(matches!(err, FontLoadError::Json { ref id, .. } if id == "broken"));
    }

    #[test]
    fn test_bad_outline_is_reported() {
        let doc = SAMPLE.replace("l 350 0", "w 350 0");
        let err = Font::from_typeface_json("sample", doc.as_bytes()).unwrap_err();
        assert!(matches!(err, FontLoadError::Outline { ref glyph, .. } if glyph == "1"));
    }
}
