pub mod bars;
pub mod canvas;
pub mod colors;
pub mod recording;
pub mod surface;
pub mod text;

pub use bars::{render_distribution, render_set, BarStyle};
pub use canvas::Canvas;
pub use colors::Rgba;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{draw_label, with_transform, Surface, TextStyle, Transform};
pub use text::TextRenderer;
