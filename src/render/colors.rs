use bytemuck::{Pod, Zeroable};

/// 8-bit straight-alpha RGBA, laid out exactly as PNG expects.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Drop shadow behind bucket labels.
    pub const SHADOW: Rgba = Rgba::opaque(40, 40, 40);

    /// Plaintiff series.
    pub const PLAINTIFF: Rgba = Rgba::opaque(0, 0, 255);
    /// Defendant series.
    pub const DEFENDANT: Rgba = Rgba::opaque(255, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Source-over compositing of `src` onto `self`, with `coverage`
    /// (0..=255) scaling the source alpha.
    pub fn blend(self, src: Rgba, coverage: u8) -> Rgba {
        let sa = src.a as f32 / 255.0 * coverage as f32 / 255.0;
        if sa <= 0.0 {
            return self;
        }
        let da = self.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: mix(src.r, self.r),
            g: mix(src.g, self.g),
            b: mix(src.b, self.b),
            a: (out_a * 255.0).round() as u8,
        }
    }
}

/// Alpha for bucket `index` of `count`, stepping linearly from `low` for the
/// first bucket to `high` for the last. A single bucket gets `low`.
pub fn bucket_alpha(index: usize, count: usize, low: u8, high: u8) -> u8 {
    if count <= 1 {
        return low;
    }
    let step = (high as f32 - low as f32) / (count - 1) as f32;
    (low as f32 + index as f32 * step).round().clamp(0.0, 255.0) as u8
}
