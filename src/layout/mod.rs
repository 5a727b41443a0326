pub mod compose;
pub mod partition;

pub use compose::{
    add_left_headers, add_left_headers_with_further_subdivision, add_top_headers,
    reserve_header_strip, HeaderLevel,
};
pub use partition::{allocate_pixels, partition, partition_spans, Span};

/// Direction along which a region is subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Split the width: slots sit side by side.
    Horizontal,
    /// Split the height: slots are stacked.
    Vertical,
}

impl Axis {
    pub fn orthogonal(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// An axis-aligned rectangle in device pixels.
///
/// Width and height may come out zero or negative when headers are composed
/// on a region too small for them; renderers treat such regions as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Length along `axis`.
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Leading coordinate along `axis`.
    pub fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Trailing (exclusive) coordinate along `axis`.
    pub fn end(&self, axis: Axis) -> i32 {
        self.start(axis) + self.extent(axis)
    }

    /// Same region with its span along `axis` replaced; the orthogonal
    /// extent is kept.
    pub fn with_span(&self, axis: Axis, start: i32, len: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(start, self.y, len, self.h),
            Axis::Vertical => Self::new(self.x, start, self.w, len),
        }
    }

    /// Drop `amount` pixels from the leading edge along `axis`.
    pub fn skip_leading(&self, axis: Axis, amount: i32) -> Self {
        self.with_span(axis, self.start(axis) + amount, self.extent(axis) - amount)
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: i32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.w - 2 * amount,
            self.h - 2 * amount,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    /// Smallest rectangle containing both regions.
    pub fn union(&self, other: &Region) -> Region {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.w).max(other.x + other.w);
        let y1 = (self.y + self.h).max(other.y + other.h);
        Region::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Smallest rectangle containing every region, or `None` for no input.
    pub fn bounding<'a, I>(regions: I) -> Option<Region>
    where
        I: IntoIterator<Item = &'a Region>,
    {
        regions
            .into_iter()
            .fold(None, |acc: Option<Region>, r| match acc {
                Some(b) => Some(b.union(r)),
                None => Some(*r),
            })
    }
}
