use super::{Axis, Region};
use crate::error::{ChartError, Result};

/// Raw allocation for one slot, relative to the start of the partitioned
/// extent, before adjacent slots share their borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i32,
    pub len: i32,
}

/// Split `available` pixels by `proportions`, flooring each share and then
/// handing the rounding drift out one pixel at a time.
///
/// Slots are visited round-robin from index 0 and only slots that currently
/// hold pixels are adjusted, so a zero-length slot never gains or loses a
/// pixel. If every slot is empty the drift goes to the first slot with the
/// largest proportion; otherwise the walk could never finish.
pub fn allocate_pixels(available: i32, proportions: &[f64]) -> Vec<i32> {
    let mut pixels: Vec<i32> = proportions
        .iter()
        .map(|&p| (p * available as f64).floor() as i32)
        .collect();
    if pixels.is_empty() {
        return pixels;
    }

    let mut drift = pixels.iter().sum::<i32>() - available;
    if drift != 0 {
        tracing::debug!(available, drift, "correcting partition drift");
    }

    let mut index = 0;
    while drift != 0 {
        if pixels.iter().all(|&p| p == 0) {
            let target = largest_share(proportions);
            pixels[target] -= drift;
            break;
        }
        if pixels[index] != 0 {
            if drift > 0 {
                pixels[index] -= 1;
                drift -= 1;
            } else {
                pixels[index] += 1;
                drift += 1;
            }
        }
        index = (index + 1) % pixels.len();
    }

    pixels
}

fn largest_share(proportions: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in proportions.iter().enumerate() {
        if p > proportions[best] {
            best = i;
        }
    }
    best
}

/// Raw spans for `count` slots over `extent` pixels with `margin` pixels
/// between neighbours. Proportions default to an even split.
pub fn partition_spans(
    extent: i32,
    count: usize,
    margin: i32,
    proportions: Option<&[f64]>,
) -> Result<Vec<Span>> {
    if count == 0 {
        return Err(ChartError::proportions("cannot partition into zero slots"));
    }

    let even;
    let proportions = match proportions {
        Some(p) => p,
        None => {
            even = vec![1.0 / count as f64; count];
            &even[..]
        }
    };
    if proportions.len() != count {
        return Err(ChartError::proportions(format!(
            "expected {count} proportions, got {}",
            proportions.len()
        )));
    }
    let total: f64 = proportions.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(ChartError::proportions(format!(
            "proportions sum to {total}, nothing to allocate"
        )));
    }

    let available = extent - (count as i32 - 1) * margin;
    let pixels = allocate_pixels(available, proportions);

    let mut spans = Vec::with_capacity(count);
    let mut offset = 0;
    for len in pixels {
        spans.push(Span { start: offset, len });
        offset += len + margin;
    }
    Ok(spans)
}

/// Divide `region` into `count` regions along `axis`.
///
/// Every slot after the first starts one pixel early and is one pixel
/// longer, so neighbouring outlines land on the same pixel column instead
/// of doubling up. A negative margin overlaps slots by that many pixels.
/// The orthogonal extent is unchanged and the last slot always ends on the
/// region's trailing edge.
pub fn partition(
    region: Region,
    axis: Axis,
    count: usize,
    margin: i32,
    proportions: Option<&[f64]>,
) -> Result<Vec<Region>> {
    let spans = partition_spans(region.extent(axis), count, margin, proportions)?;
    let origin = region.start(axis);

    Ok(spans
        .iter()
        .enumerate()
        .map(|(i, span)| {
            let shared = if i > 0 { 1 } else { 0 };
            region.with_span(axis, origin + span.start - shared, span.len + shared)
        })
        .collect())
}
