pub mod image_file;

pub use image_file::{mime_type_for, ImageFile};
