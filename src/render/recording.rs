use crate::layout::Region;
use crate::render::canvas::approximate_text_extent;
use crate::render::colors::Rgba;
use crate::render::surface::{Surface, TextStyle, Transform};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke {
        rect: Region,
        color: Rgba,
    },
    Fill {
        rect: Region,
        color: Rgba,
    },
    Text {
        text: String,
        origin: (f32, f32),
        style: TextStyle,
        /// Transform in effect when the text was drawn.
        transform: Transform,
    },
}

/// Surface that draws nothing and remembers every command, in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    transforms: Vec<Transform>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Region, &Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Region> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Stroke { rect, .. } => Some(rect),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Depth of the transform stack; zero whenever no scope is open.
    pub fn transform_depth(&self) -> usize {
        self.transforms.len()
    }
}

impl Surface for RecordingSurface {
    fn stroke_rect(&mut self, rect: Region, color: Rgba) {
        self.commands.push(DrawCommand::Stroke { rect, color });
    }

    fn fill_rect(&mut self, rect: Region, color: Rgba) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn measure_text(&mut self, text: &str, size: f32) -> (f32, f32) {
        approximate_text_extent(text, size)
    }

    fn draw_text(&mut self, text: &str, origin: (f32, f32), style: &TextStyle) {
        let transform = self.transforms.last().copied().unwrap_or(Transform::IDENTITY);
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            style: *style,
            transform,
        });
    }

    fn push_transform(&mut self, transform: Transform) {
        let current = self.transforms.last().copied().unwrap_or(Transform::IDENTITY);
        self.transforms.push(current.then_apply(&transform));
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::draw_label;

    #[test]
    fn label_transform_does_not_leak() {
        let mut s = RecordingSurface::new();
        let style = TextStyle {
            size: 10.0,
            color: Rgba::BLACK,
        };
        let bounds = draw_label(&mut s, (50.0, 40.0), 270.0, "P Signal", &style);
        assert_eq!(s.transform_depth(), 0);
        // 8 chars * 6px wide, 10px tall, turned on its side.
        assert_eq!(bounds, Region::new(45, 16, 10, 48));

        match &s.commands[0] {
            DrawCommand::Text {
                origin, transform, ..
            } => {
                assert_eq!(*origin, (-24.0, -5.0));
                assert_eq!(transform.apply(0.0, 0.0), (50.0, 40.0));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
