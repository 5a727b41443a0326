use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle as LayoutStyle};
use fontdue::{Font, FontSettings};
use std::path::{Path, PathBuf};

use crate::error::{ChartError, Result};

/// Lays out and rasterizes label text with a single loaded font.
pub struct TextRenderer {
    font: Option<Font>,
    layout: Layout,
}

impl Clone for TextRenderer {
    fn clone(&self) -> Self {
        Self {
            font: self.font.clone(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// A renderer with no font loaded yet.
    pub fn new() -> Self {
        Self {
            font: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    /// Try the usual system font locations, logging instead of failing.
    pub fn with_system_font() -> Self {
        let mut renderer = Self::new();
        if let Err(e) = renderer.load_system_font() {
            tracing::warn!("{e}; labels will not be drawn");
        }
        renderer
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn load_font_from_path(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| ChartError::Font(format!("{}: {e}", path.display())))?;
        self.font = Some(font);
        tracing::info!("Loaded label font from {}", path.display());
        Ok(())
    }

    pub fn load_system_font(&mut self) -> Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from(
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));

        for path in candidates {
            if self.load_font_from_path(&path).is_ok() {
                return Ok(());
            }
        }

        Err(ChartError::Font(
            "unable to load a system font from known locations".into(),
        ))
    }

    /// Width and height of the laid-out text, or `None` without a font.
    pub fn measure(&mut self, text: &str, size: f32) -> Option<(f32, f32)> {
        let font = self.font.as_ref()?;
        lay_out(&mut self.layout, font, text, size);
        Some(layout_extent(&self.layout))
    }

    /// Rasterize `text` into one coverage mask the size of its layout box.
    pub fn rasterize(&mut self, text: &str, size: f32) -> Option<TextMask> {
        let font = self.font.as_ref()?;
        lay_out(&mut self.layout, font, text, size);
        let (width, height) = layout_extent(&self.layout);

        let width = width.ceil().max(0.0) as usize;
        let height = height.ceil().max(0.0) as usize;
        let mut mask = TextMask {
            width,
            height,
            coverage: vec![0; width * height],
        };

        for glyph in self.layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, bitmap) = font.rasterize_config(glyph.key);
            let gx = glyph.x.round() as i64;
            let gy = glyph.y.round() as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let x = gx + col as i64;
                    let y = gy + row as i64;
                    if x < 0 || y < 0 || x >= mask.width as i64 || y >= mask.height as i64 {
                        continue;
                    }
                    let idx = y as usize * mask.width + x as usize;
                    let value = bitmap[row * metrics.width + col];
                    mask.coverage[idx] = mask.coverage[idx].max(value);
                }
            }
        }

        if mask.coverage.is_empty() {
            return None;
        }
        Some(mask)
    }
}

fn lay_out(layout: &mut Layout, font: &Font, text: &str, size: f32) {
    layout.reset(&LayoutSettings::default());
    layout.append(&[font], &LayoutStyle::new(text, size, 0));
}

fn layout_extent(layout: &Layout) -> (f32, f32) {
    let width = layout
        .glyphs()
        .iter()
        .map(|g| g.x + g.width as f32)
        .fold(0.0_f32, f32::max);
    (width, layout.height())
}

/// Grayscale glyph coverage for a whole string.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

impl TextMask {
    pub fn at(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_font_means_no_raster() {
        let mut text = TextRenderer::new();
        assert!(!text.has_font());
        assert!(text.measure("1", 12.0).is_none());
        assert!(text.rasterize("1", 12.0).is_none());
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let mut text = TextRenderer::new();
        let err = text
            .load_font_from_path(Path::new("/nonexistent/font.ttf"))
            .unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }

    #[test]
    fn mask_lookup_is_bounds_checked() {
        let mask = TextMask {
            width: 2,
            height: 1,
            coverage: vec![10, 20],
        };
        assert_eq!(mask.at(1, 0), 20);
        assert_eq!(mask.at(2, 0), 0);
        assert_eq!(mask.at(0, 1), 0);
    }
}
