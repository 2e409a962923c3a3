pub mod render;
pub mod text;
pub mod widgets;

pub use render::{FrameStats, Scene, SkiaRenderer};
pub use text::load_font;
pub use widgets::{Button, ButtonAction, buttons_for, hit_test};
