use super::{partition, Axis, Region};
use crate::error::Result;
use crate::render::surface::{draw_label, Surface, TextStyle};

/// Left-hand labels read bottom to top.
const LEFT_LABEL_ANGLE: f32 = 270.0;

/// Split a leading strip `thickness` pixels deep off `region` along `axis`.
/// Returns `(strip, remaining)`.
///
/// The remaining region shares its first pixel with the strip, like any
/// pair of neighbouring partition slots.
pub fn reserve_header_strip(region: Region, axis: Axis, thickness: i32) -> Result<(Region, Region)> {
    let extent = region.extent(axis);
    if extent <= 0 {
        return Ok((region.with_span(axis, region.start(axis), 0), region));
    }
    let share = thickness as f64 / extent as f64;
    let parts = partition(region, axis, 2, 0, Some(&[share, 1.0 - share]))?;
    Ok((parts[0], parts[1]))
}

/// One level of header labels: the text, how deep a strip they get and the
/// gap between neighbouring labels.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLevel<'a> {
    pub labels: &'a [&'a str],
    pub thickness: i32,
    pub margin: i32,
}

/// Reserve a strip down the left side of `region`, split it evenly between
/// `level.labels` from top to bottom and draw each label rotated to read
/// upwards. Returns the region right of the strip.
pub fn add_left_headers<S>(
    surface: &mut S,
    region: Region,
    level: HeaderLevel<'_>,
    style: &TextStyle,
) -> Result<Region>
where
    S: Surface + ?Sized,
{
    let (strip, remaining) = reserve_header_strip(region, Axis::Horizontal, level.thickness)?;
    draw_labels_along(surface, strip, Axis::Vertical, level, LEFT_LABEL_ANGLE, style)?;
    Ok(remaining)
}

/// Reserve a strip across the top of `region` and draw `level.labels`
/// evenly along it. The first `leading_skip` pixels of the strip are left
/// blank so headers clear a column of left-hand labels. Returns the region
/// below the strip, at full width.
pub fn add_top_headers<S>(
    surface: &mut S,
    region: Region,
    level: HeaderLevel<'_>,
    leading_skip: i32,
    style: &TextStyle,
) -> Result<Region>
where
    S: Surface + ?Sized,
{
    let (strip, remaining) = reserve_header_strip(region, Axis::Vertical, level.thickness)?;
    let strip = strip.skip_leading(Axis::Horizontal, leading_skip);
    draw_labels_along(surface, strip, Axis::Horizontal, level, 0.0, style)?;
    Ok(remaining)
}

/// Two levels of left-hand labels.
///
/// `outer` labels get the outermost strip and split the rest of `region`
/// vertically between them; every part then gets its own strip of `inner`
/// labels. Returns the bounding box of what is left of all parts.
pub fn add_left_headers_with_further_subdivision<S>(
    surface: &mut S,
    region: Region,
    outer: HeaderLevel<'_>,
    inner: HeaderLevel<'_>,
    style: &TextStyle,
) -> Result<Region>
where
    S: Surface + ?Sized,
{
    let (strip, rest) = reserve_header_strip(region, Axis::Horizontal, outer.thickness)?;
    draw_labels_along(surface, strip, Axis::Vertical, outer, LEFT_LABEL_ANGLE, style)?;

    let parts = partition(rest, Axis::Vertical, outer.labels.len(), outer.margin, None)?;
    let mut remaining = Vec::with_capacity(parts.len());
    for part in parts {
        remaining.push(add_left_headers(surface, part, inner, style)?);
    }

    Ok(Region::bounding(&remaining).unwrap_or(rest))
}

fn draw_labels_along<S>(
    surface: &mut S,
    strip: Region,
    axis: Axis,
    level: HeaderLevel<'_>,
    angle: f32,
    style: &TextStyle,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    if level.labels.is_empty() {
        return Ok(());
    }
    let cells = partition(strip, axis, level.labels.len(), level.margin, None)?;
    for (cell, label) in cells.iter().zip(level.labels) {
        if cell.is_empty() {
            continue;
        }
        draw_label(surface, cell.center(), angle, label, style);
    }
    Ok(())
}
