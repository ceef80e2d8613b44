pub mod terminal;

pub use terminal::{render_error, render_header, render_questions, supports_color, RenderOptions};
