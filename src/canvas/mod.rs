mod canvas_transform;
pub mod image_codec;
mod surface;

pub use canvas_transform::CanvasTransform;
pub use surface::RasterSurface;
