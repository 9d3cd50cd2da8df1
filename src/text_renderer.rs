use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;
use image::Rgba;
use std::path::Path;
use tiny_skia::Mask;

use crate::canvas::RasterSurface;
use crate::error::DrawingError;

/// Size of text placed by the text tool, in surface pixels per em.
pub const TEXT_SIZE: f32 = 20.0;

static DEFAULT_FONT: &[u8] = include_bytes!("../data/fonts/DejaVuSans.ttf");

/// Rasterizes single-line labels straight into a surface.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    font: FontArc,
}

impl TextRenderer {
    /// The sans-serif face bundled with the crate.
    pub fn bundled() -> Result<Self, DrawingError> {
        let font = FontArc::try_from_slice(DEFAULT_FONT).map_err(|_| DrawingError::InvalidFont)?;
        Ok(Self { font })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DrawingError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| DrawingError::InvalidFont)?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        Self::from_bytes(bytes).with_context(|| format!("Failed to parse font {}", path.display()))
    }

    /// Draws `text` with its baseline starting at `origin`, `px` pixels
    /// per em.
    pub fn draw(&self, surface: &mut RasterSurface, text: &str, origin: [f32; 2], px: f32, color: Rgba<u8>) {
        let (width, height) = surface.dimensions();
        let Some(mut mask) = Mask::new(width, height) else {
            return;
        };
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);

        let coverage_mask = mask.data_mut();
        let mut caret = point(origin[0], origin[1]);
        let mut previous = None;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return;
                }
                let slot = &mut coverage_mask[(y as usize) * (width as usize) + x as usize];
                let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                *slot = (*slot).max(value);
            });
        }

        surface.fill_mask(&mask, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Rows with any painted pixel, top to bottom.
    fn painted_rows(surface: &RasterSurface) -> Vec<u32> {
        let img = surface.to_image();
        (0..img.height())
            .filter(|&y| (0..img.width()).any(|x| img.get_pixel(x, y)[3] > 0))
            .collect()
    }

    #[test]
    fn bundled_font_parses() {
        assert!(TextRenderer::bundled().is_ok());
    }

    #[test]
    fn capital_sits_on_the_baseline_at_pixel_size() {
        let renderer = TextRenderer::bundled().unwrap();
        let mut surface = RasterSurface::new(100, 60).unwrap();
        renderer.draw(&mut surface, "H", [20.0, 40.0], TEXT_SIZE, BLACK);

        // Cap height is about 0.73 em, so 20px text gives a glyph close to
        // 15 rows tall ending on the baseline.
        let rows = painted_rows(&surface);
        assert!((14..=16).contains(&rows.len()), "rows painted: {}", rows.len());
        assert_eq!(rows.last(), Some(&39));

        let img = surface.to_image();
        let columns: Vec<u32> = (0..img.width())
            .filter(|&x| (0..img.height()).any(|y| img.get_pixel(x, y)[3] > 0))
            .collect();
        assert!(columns[0] >= 20 && columns[0] <= 24);
    }

    #[test]
    fn text_outside_the_surface_is_clipped() {
        let renderer = TextRenderer::bundled().unwrap();
        let mut surface = RasterSurface::new(20, 20).unwrap();
        renderer.draw(&mut surface, "Hello", [-5.0, 10.0], TEXT_SIZE, BLACK);
        assert!(!painted_rows(&surface).is_empty());
    }

    #[test]
    fn rejects_non_font_bytes() {
        assert!(matches!(
            TextRenderer::from_bytes(b"definitely not a font".to_vec()),
            Err(DrawingError::InvalidFont)
        ));
    }

    #[test]
    fn load_reports_missing_files() {
        let err = TextRenderer::load(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read font"));
    }
}
