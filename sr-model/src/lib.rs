//! Player skin model: texture layout, analysis and geometry.
//!
//! Key constraints:
//! - The part -> texture rectangle layout is hardcoded Rust static data.
//! - Geometry is built per texel: every non-transparent texel becomes one
//!   flat-colored quad on its box face, fully transparent texels become holes.
//! - Nothing here touches the network or a rendering surface.

mod builder;
mod cape;
mod colorer;
mod layout;
mod mesh;
mod texture;
mod types;

#[cfg(test)]
mod tests;

pub use builder::*;
pub use cape::*;
pub use colorer::*;
pub use layout::*;
pub use mesh::*;
pub use texture::*;
pub use types::*;

// Small DSL macro for the layout tables.
#[macro_export]
macro_rules! part_layout {
    (
        part: $part:expr,
        size: ($w:expr, $h:expr, $d:expr),
        base: $base:expr,
        overlay: $overlay:expr,
        inflate: $inflate:expr $(,)?
    ) => {
        $crate::PartLayout {
            part: $part,
            size: [$w as u32, $h as u32, $d as u32],
            base: $base,
            overlay: $overlay,
            overlay_inflate: $inflate as f32,
        }
    };
}
