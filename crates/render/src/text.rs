use crate::asset::{self, AssetError};
use glam::{IVec2, UVec2, Vec2};
use std::collections::BTreeMap;
use std::path::Path;

/// Characters rasterized into every table.
pub const GLYPH_RANGE: std::ops::Range<u8> = 0..128;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("can't parse font: {0}")]
    Parse(String),
}

/// One rasterized character.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Bitmap width and height in pixels.
    pub size: UVec2,
    /// Offset from the pen to the bitmap's left edge and top row.
    pub bearing: IVec2,
    /// Horizontal pen advance in pixels.
    pub advance: f32,
    /// Row-major coverage, top row first, one byte per pixel.
    pub bitmap: Vec<u8>,
}

impl Glyph {
    pub fn is_blank(&self) -> bool {
        self.size.x == 0 || self.size.y == 0
    }
}

/// Six `(x, y, u, v)` vertices for one glyph quad, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    pub vertices: [[f32; 4]; 6],
}

/// Glyphs of one font at one pixel size. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    pixel_size: f32,
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphTable {
    /// Rasterize the ASCII range from an outline font.
    pub fn rasterize(font_bytes: &[u8], pixel_size: f32) -> Result<Self, FontError> {
        let settings = fontdue::FontSettings {
            scale: pixel_size,
            ..Default::default()
        };
        let font = fontdue::Font::from_bytes(font_bytes, settings)
            .map_err(|e| FontError::Parse(e.to_string()))?;

        let glyphs = GLYPH_RANGE
            .map(char::from)
            .map(|ch| {
                let (metrics, bitmap) = font.rasterize(ch, pixel_size);
                let glyph = Glyph {
                    size: UVec2::new(metrics.width as u32, metrics.height as u32),
                    bearing: IVec2::new(metrics.xmin, metrics.ymin + metrics.height as i32),
                    advance: metrics.advance_width,
                    bitmap,
                };
                (ch, glyph)
            })
            .collect();
        tracing::debug!(pixel_size, "glyph table rasterized");
        Ok(Self { pixel_size, glyphs })
    }

    /// Read a font file and rasterize it. A missing font is fatal to callers.
    pub fn load(path: impl AsRef<Path>, pixel_size: f32) -> Result<Self, FontError> {
        let bytes = asset::read_bytes(path)?;
        Self::rasterize(&bytes, pixel_size)
    }

    pub fn from_glyphs(pixel_size: f32, glyphs: impl IntoIterator<Item = (char, Glyph)>) -> Self {
        Self {
            pixel_size,
            glyphs: glyphs.into_iter().collect(),
        }
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> {
        self.glyphs.iter().map(|(c, g)| (*c, g))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Lay out `text` on a baseline starting at `origin` (bottom-left origin,
    /// y up). Blank glyphs advance the pen without a quad; characters missing
    /// from the table are skipped.
    pub fn layout(&self, text: &str, origin: Vec2, scale: f32) -> Vec<GlyphQuad> {
        let mut pen = origin;
        let mut quads = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let Some(glyph) = self.glyphs.get(&ch) else {
                continue;
            };
            if !glyph.is_blank() {
                let size = glyph.size.as_vec2() * scale;
                let x = pen.x + glyph.bearing.x as f32 * scale;
                let y = pen.y - (glyph.size.y as f32 - glyph.bearing.y as f32) * scale;
                let (w, h) = (size.x, size.y);
                quads.push(GlyphQuad {
                    ch,
                    vertices: [
                        [x, y + h, 0.0, 0.0],
                        [x, y, 0.0, 1.0],
                        [x + w, y, 1.0, 1.0],
                        [x, y + h, 0.0, 0.0],
                        [x + w, y, 1.0, 1.0],
                        [x + w, y + h, 1.0, 0.0],
                    ],
                });
            }
            pen.x += glyph.advance * scale;
        }
        quads
    }

    /// Pen advance of `text` in pixels.
    pub fn width(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|ch| self.glyphs.get(&ch))
            .map(|g| g.advance * scale)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(w: u32, h: u32, bearing: (i32, i32), advance: f32) -> Glyph {
        Glyph {
            size: UVec2::new(w, h),
            bearing: IVec2::new(bearing.0, bearing.1),
            advance,
            bitmap: vec![255; (w * h) as usize],
        }
    }

    fn table() -> GlyphTable {
        GlyphTable::from_glyphs(
            64.0,
            [
                ('A', glyph(10, 20, (1, 20), 12.0)),
                ('g', glyph(8, 16, (0, 10), 9.0)),
                (' ', glyph(0, 0, (0, 0), 6.0)),
            ],
        )
    }

    #[test]
    fn quad_sits_on_baseline() {
        let quads = table().layout("A", Vec2::new(100.0, 50.0), 1.0);
        assert_eq!(quads.len(), 1);
        let v = quads[0].vertices;
        assert_eq!(v[1], [101.0, 50.0, 0.0, 1.0]);
        assert_eq!(v[5], [111.0, 70.0, 1.0, 0.0]);
    }

    #[test]
    fn descender_drops_below_baseline() {
        let quads = table().layout("g", Vec2::ZERO, 1.0);
        let bottom = quads[0].vertices[1][1];
        assert_eq!(bottom, -6.0);
    }

    #[test]
    fn space_advances_without_quad() {
        let quads = table().layout("A A", Vec2::ZERO, 1.0);
        assert_eq!(quads.len(), 2);
        let second_x = quads[1].vertices[1][0];
        assert_eq!(second_x, 12.0 + 6.0 + 1.0);
    }

    #[test]
    fn unknown_chars_skipped() {
        let t = table();
        assert_eq!(t.layout("Aé", Vec2::ZERO, 1.0).len(), 1);
        assert_eq!(t.width("Aé", 1.0), 12.0);
    }

    #[test]
    fn scale_applies_to_size_and_advance() {
        let quads = table().layout("AA", Vec2::ZERO, 0.5);
        let first = quads[0].vertices;
        assert_eq!(first[2][0] - first[1][0], 5.0);
        assert_eq!(quads[1].vertices[1][0], 6.0 + 0.5);
    }

    #[test]
    fn garbage_font_is_parse_error() {
        let err = GlyphTable::rasterize(b"definitely not a font", 64.0).unwrap_err();
        assert!(matches!(err, FontError::Parse(_)));
    }

    #[test]
    fn missing_font_is_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlyphTable::load(dir.path().join("missing.ttf"), 64.0).unwrap_err();
        assert!(matches!(err, FontError::Asset(_)));
    }
}
