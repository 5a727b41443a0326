use crate::error::Result;
use crate::layout::{partition, Axis, Region};
use crate::render::colors::{bucket_alpha, Rgba};
use crate::render::surface::{draw_label, Surface, TextStyle};
use crate::table::Distribution;

/// How one series of bars is drawn.
#[derive(Debug, Clone, Copy)]
pub struct BarStyle {
    pub color: Rgba,
    pub outline: Rgba,
    /// Alpha of the first bucket's fill.
    pub alpha_low: u8,
    /// Alpha of the last bucket's fill.
    pub alpha_high: u8,
    /// Gap between bars of one set.
    pub set_margin: i32,
    pub draw_labels: bool,
    pub label: TextStyle,
    pub shadow: Rgba,
    /// Down-right shift of the label's shadow, in pixels.
    pub shadow_offset: f32,
}

impl BarStyle {
    pub fn new(color: Rgba, scale: u32) -> Self {
        Self {
            color,
            outline: Rgba::BLACK,
            alpha_low: 100,
            alpha_high: 200,
            set_margin: 2 * scale as i32,
            draw_labels: true,
            label: TextStyle {
                size: 8.0 * scale as f32,
                color: Rgba::WHITE,
            },
            shadow: Rgba::SHADOW,
            shadow_offset: scale as f32,
        }
    }
}

/// Draw a set of distributions, one bar per distribution.
///
/// Bars are stacked across `axis` and each bar is subdivided along `axis`.
pub fn render_set<S>(
    surface: &mut S,
    region: Region,
    axis: Axis,
    set: &[Distribution],
    style: &BarStyle,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    if set.is_empty() {
        return Ok(());
    }
    let slots = partition(region, axis.orthogonal(), set.len(), style.set_margin, None)?;
    for (slot, distribution) in slots.into_iter().zip(set) {
        render_distribution(surface, slot, axis, distribution, style)?;
    }
    Ok(())
}

/// Draw one distribution as a bar subdivided along `axis` by its values.
/// Absent distributions and empty buckets draw nothing.
pub fn render_distribution<S>(
    surface: &mut S,
    region: Region,
    axis: Axis,
    distribution: &Distribution,
    style: &BarStyle,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let Some(values) = distribution.values() else {
        return Ok(());
    };
    if values.is_empty() {
        return Ok(());
    }

    let rects = partition(region, axis, values.len(), 0, Some(values))?;
    for (index, (rect, &value)) in rects.into_iter().zip(values).enumerate() {
        if value > 0.0 {
            draw_bucket(surface, rect, axis, index, values.len(), style);
        }
    }
    Ok(())
}

fn draw_bucket<S>(
    surface: &mut S,
    rect: Region,
    axis: Axis,
    index: usize,
    count: usize,
    style: &BarStyle,
) where
    S: Surface + ?Sized,
{
    if rect.extent(axis) <= 0 {
        return;
    }

    let outline = Region::new(rect.x, rect.y, rect.w - 1, rect.h - 1);
    surface.stroke_rect(outline, style.outline);

    let alpha = bucket_alpha(index, count, style.alpha_low, style.alpha_high);
    surface.fill_rect(rect.inset(1), style.color.with_alpha(alpha));

    if style.draw_labels && rect.extent(axis) as f32 > 2.0 * style.label.size {
        let text = (index + 1).to_string();
        let (cx, cy) = rect.center();
        let shadow = TextStyle {
            color: style.shadow,
            ..style.label
        };
        let offset = style.shadow_offset;
        draw_label(surface, (cx + offset, cy + offset), 0.0, &text, &shadow);
        draw_label(surface, (cx, cy), 0.0, &text, &style.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawCommand, RecordingSurface};

    fn style() -> BarStyle {
        BarStyle::new(Rgba::PLAINTIFF, 1)
    }

    #[test]
    fn absent_distribution_draws_nothing() {
        let mut s = RecordingSurface::new();
        render_distribution(
            &mut s,
            Region::new(0, 0, 100, 20),
            Axis::Horizontal,
            &Distribution::Absent,
            &style(),
        )
        .unwrap();
        assert!(s.commands.is_empty());
    }

    #[test]
    fn one_outline_and_fill_per_positive_bucket() {
        let mut s = RecordingSurface::new();
        let mut st = style();
        st.draw_labels = false;
        let d = Distribution::Observed(vec![0.5, 0.0, 0.25, 0.25]);
        render_distribution(&mut s, Region::new(0, 0, 100, 20), Axis::Horizontal, &d, &st).unwrap();

        let strokes: Vec<&Region> = s.strokes().collect();
        assert_eq!(
            strokes,
            vec![
                &Region::new(0, 0, 49, 19),
                &Region::new(49, 0, 25, 19),
                &Region::new(74, 0, 25, 19),
            ]
        );
        let alphas: Vec<u8> = s.fills().map(|(_, c)| c.a).collect();
        assert_eq!(alphas, vec![100, 167, 200]);
        let (first_fill, _) = s.fills().next().unwrap();
        assert_eq!(*first_fill, Region::new(1, 1, 48, 18));
    }

    #[test]
    fn zero_width_bucket_is_skipped() {
        let mut s = RecordingSurface::new();
        let mut st = style();
        st.draw_labels = false;
        // 0.001 of 10 pixels floors to nothing.
        let d = Distribution::Observed(vec![0.001, 0.999]);
        render_distribution(&mut s, Region::new(0, 0, 10, 10), Axis::Horizontal, &d, &st).unwrap();
        assert_eq!(s.strokes().count(), 1);
    }

    #[test]
    fn labels_only_on_wide_enough_buckets() {
        let mut s = RecordingSurface::new();
        let d = Distribution::Observed(vec![0.9, 0.1]);
        render_distribution(&mut s, Region::new(0, 0, 100, 20), Axis::Horizontal, &d, &style())
            .unwrap();
        // Bucket 1 is 90px wide, bucket 2 is 10px: only "1" is labelled,
        // once as shadow and once in the foreground.
        let texts: Vec<&str> = s.texts().collect();
        assert_eq!(texts, vec!["1", "1"]);
        let colors: Vec<Rgba> = s
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { style, .. } => Some(style.color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Rgba::SHADOW, Rgba::WHITE]);
        assert_eq!(s.transform_depth(), 0);
    }

    #[test]
    fn set_stacks_bars_across_the_axis() {
        let mut s = RecordingSurface::new();
        let mut st = style();
        st.draw_labels = false;
        let set = vec![
            Distribution::Observed(vec![1.0]),
            Distribution::Absent,
            Distribution::Observed(vec![1.0]),
        ];
        render_set(&mut s, Region::new(0, 0, 50, 34), Axis::Horizontal, &set, &st).unwrap();
        let strokes: Vec<&Region> = s.strokes().collect();
        // 34 - 2*2 = 30 pixels, 10 per bar; the third bar starts at 24 - 1.
        assert_eq!(strokes, vec![&Region::new(0, 0, 49, 9), &Region::new(0, 23, 49, 10)]);
    }
}
