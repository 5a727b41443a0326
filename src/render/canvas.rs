use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Encoder};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::layout::Region;
use crate::render::colors::Rgba;
use crate::render::surface::{Surface, TextStyle, Transform};
use crate::render::text::TextRenderer;

/// CPU raster target: an opaque white RGBA8 buffer.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    transforms: Vec<Transform>,
    text: TextRenderer,
}

impl Canvas {
    pub fn new(width: u32, height: u32, text: TextRenderer) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::WHITE; width as usize * height as usize],
            transforms: Vec::new(),
            text,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf, self.width, self.height);
            enc.set_color(ColorType::Rgba);
            enc.set_depth(BitDepth::Eight);
            let mut writer = enc.write_header()?;
            writer.write_image_data(self.as_bytes())?;
            writer.finish()?;
        }
        Ok(buf)
    }

    /// Encode, write a temporary file beside `path` and rename it into
    /// place. On any failure `path` is left as it was.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let bytes = self.encode_png()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        tracing::info!(
            "Wrote {}x{} chart to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }

    fn current(&self) -> Transform {
        self.transforms.last().copied().unwrap_or(Transform::IDENTITY)
    }

    /// Device pixel box of a local rectangle as half-open `x0..x1`, `y0..y1`,
    /// not yet clipped to the buffer.
    fn device_box(&self, x: f32, y: f32, w: f32, h: f32) -> (i64, i64, i64, i64) {
        let (x0, y0, x1, y1) = self.current().bounds(x, y, w, h);
        (
            x0.round() as i64,
            y0.round() as i64,
            x1.round() as i64,
            y1.round() as i64,
        )
    }

    fn blend_box(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
        let x0 = x0.clamp(0, self.width as i64) as u32;
        let x1 = x1.clamp(0, self.width as i64) as u32;
        let y0 = y0.clamp(0, self.height as i64) as u32;
        let y1 = y1.clamp(0, self.height as i64) as u32;
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                let idx = row + x as usize;
                self.pixels[idx] = self.pixels[idx].blend(color, 255);
            }
        }
    }
}

impl Surface for Canvas {
    fn stroke_rect(&mut self, rect: Region, color: Rgba) {
        if rect.w < 0 || rect.h < 0 {
            return;
        }
        // The outline covers both far edges, so the pixel box is one wider
        // and taller than the rectangle itself.
        let (x0, y0, x1, y1) = self.device_box(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32 + 1.0,
            rect.h as f32 + 1.0,
        );
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        self.blend_box(x0, y0, x1, y0 + 1, color);
        if y1 - 1 > y0 {
            self.blend_box(x0, y1 - 1, x1, y1, color);
        }
        self.blend_box(x0, y0 + 1, x0 + 1, y1 - 1, color);
        if x1 - 1 > x0 {
            self.blend_box(x1 - 1, y0 + 1, x1, y1 - 1, color);
        }
    }

    fn fill_rect(&mut self, rect: Region, color: Rgba) {
        if rect.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) =
            self.device_box(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32);
        self.blend_box(x0, y0, x1, y1, color);
    }

    fn measure_text(&mut self, text: &str, size: f32) -> (f32, f32) {
        self.text
            .measure(text, size)
            .unwrap_or_else(|| approximate_text_extent(text, size))
    }

    fn draw_text(&mut self, text: &str, origin: (f32, f32), style: &TextStyle) {
        let Some(mask) = self.text.rasterize(text, style.size) else {
            return;
        };
        let transform = self.current();
        let Some(inverse) = transform.invert() else {
            return;
        };
        let (x0, y0, x1, y1) =
            self.device_box(origin.0, origin.1, mask.width as f32, mask.height as f32);
        let x0 = x0.clamp(0, self.width as i64) as u32;
        let x1 = x1.clamp(0, self.width as i64) as u32;
        let y0 = y0.clamp(0, self.height as i64) as u32;
        let y1 = y1.clamp(0, self.height as i64) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                // Sample the mask at the device pixel's center.
                let (lx, ly) = inverse.apply(x as f32 + 0.5, y as f32 + 0.5);
                let mx = (lx - origin.0).floor();
                let my = (ly - origin.1).floor();
                if mx < 0.0 || my < 0.0 {
                    continue;
                }
                let coverage = mask.at(mx as usize, my as usize);
                if coverage == 0 {
                    continue;
                }
                let idx = (y * self.width + x) as usize;
                self.pixels[idx] = self.pixels[idx].blend(style.color, coverage);
            }
        }
    }

    fn push_transform(&mut self, transform: Transform) {
        let combined = self.current().then_apply(&transform);
        self.transforms.push(combined);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}

/// Rough extent used when no font is available.
pub fn approximate_text_extent(text: &str, size: f32) -> (f32, f32) {
    (text.chars().count() as f32 * size * 0.6, size)
}
