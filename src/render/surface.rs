use crate::layout::Region;
use crate::render::colors::Rgba;

/// 2D affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation in a y-down coordinate system. Quarter turns are
    /// exact so rotated glyphs map pixel-for-pixel.
    pub fn rotate(degrees: f32) -> Self {
        let turns = degrees.rem_euclid(360.0);
        let (sin, cos) = if turns == 0.0 {
            (0.0, 1.0)
        } else if turns == 90.0 {
            (1.0, 0.0)
        } else if turns == 180.0 {
            (0.0, -1.0)
        } else if turns == 270.0 {
            (-1.0, 0.0)
        } else {
            turns.to_radians().sin_cos()
        };
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn then_apply(&self, inner: &Transform) -> Transform {
        Transform {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Device-space bounding box of a local rectangle.
    pub fn bounds(&self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
        let corners = [
            self.apply(x, y),
            self.apply(x + w, y),
            self.apply(x, y + h),
            self.apply(x + w, y + h),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for &(cx, cy) in &corners[1..] {
            min = (min.0.min(cx), min.1.min(cy));
            max = (max.0.max(cx), max.1.max(cy));
        }
        (min.0, min.1, max.0, max.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Point size in pixels.
    pub size: f32,
    pub color: Rgba,
}

/// Drawing capability the chart code renders into.
///
/// Rectangles and text are given in local coordinates and pass through the
/// current transform. Transforms only change through [`with_transform`],
/// which restores the previous one when the closure returns.
pub trait Surface {
    /// Stroke a 1-pixel outline covering `x..=x+w` and `y..=y+h`.
    fn stroke_rect(&mut self, rect: Region, color: Rgba);

    /// Fill `x..x+w`, `y..y+h`, blending `color` over what is there.
    fn fill_rect(&mut self, rect: Region, color: Rgba);

    /// Width and height of `text` laid out at `size`.
    fn measure_text(&mut self, text: &str, size: f32) -> (f32, f32);

    /// Draw `text` with its layout box's top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: (f32, f32), style: &TextStyle);

    fn push_transform(&mut self, transform: Transform);

    fn pop_transform(&mut self);
}

/// Run `f` with `transform` composed onto the surface's current transform.
pub fn with_transform<S, R>(surface: &mut S, transform: Transform, f: impl FnOnce(&mut S) -> R) -> R
where
    S: Surface + ?Sized,
{
    surface.push_transform(transform);
    let out = f(surface);
    surface.pop_transform();
    out
}

/// Draw `text` centered on `center`, rotated clockwise by `angle_degrees`,
/// and return the rotated text's bounding box.
pub fn draw_label<S>(
    surface: &mut S,
    center: (f32, f32),
    angle_degrees: f32,
    text: &str,
    style: &TextStyle,
) -> Region
where
    S: Surface + ?Sized,
{
    let (w, h) = surface.measure_text(text, style.size);
    let bounds = rotated_bounds(center, angle_degrees, w, h);

    let placement =
        Transform::translate(center.0, center.1).then_apply(&Transform::rotate(angle_degrees));
    with_transform(surface, placement, |s| {
        s.draw_text(text, (-w / 2.0, -h / 2.0), style)
    });

    bounds
}

/// Bounding box of a `w`×`h` box rotated about `center`.
pub fn rotated_bounds(center: (f32, f32), angle_degrees: f32, w: f32, h: f32) -> Region {
    let r = Transform::rotate(angle_degrees);
    let bw = (w * r.a).abs() + (h * r.c).abs();
    let bh = (w * r.b).abs() + (h * r.d).abs();
    let x = (center.0 - bw / 2.0).round() as i32;
    let y = (center.1 - bh / 2.0).round() as i32;
    Region::new(x, y, bw.round() as i32, bh.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_is_exact() {
        let r = Transform::rotate(270.0);
        assert_eq!(r.apply(10.0, 0.0), (0.0, -10.0));
        assert_eq!(r.apply(0.0, 4.0), (4.0, 0.0));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::translate(30.0, 12.0).then_apply(&Transform::rotate(90.0));
        let inv = t.invert().unwrap();
        let (x, y) = t.apply(3.0, 5.0);
        let (bx, by) = inv.apply(x, y);
        assert!((bx - 3.0).abs() < 1e-4 && (by - 5.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_bounds_swap_axes() {
        let b = rotated_bounds((50.0, 50.0), 270.0, 40.0, 10.0);
        assert_eq!(b, Region::new(45, 30, 10, 40));
        let flat = rotated_bounds((50.0, 50.0), 0.0, 40.0, 10.0);
        assert_eq!(flat, Region::new(30, 45, 40, 10));
    }
}
