pub mod prepare;
pub mod source;

pub use source::open_image;
