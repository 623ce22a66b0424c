//! Turns player models and skin textures into raster images.
//!
//! Two families of output exist: the posed 3D body drawn by a
//! [`RasterBackend`], and flat modes that blit texture rectangles directly.

mod camera;
mod encode;
mod flat;
mod pool;
mod pose;
mod raster;

#[cfg(test)]
mod tests;

pub use camera::*;
pub use encode::*;
pub use flat::*;
pub use pool::*;
pub use pose::*;
pub use raster::*;
