//! Foundational primitives for the depixelize workspace.
//!
//! ## Pixel Lattice
//! Images are row-major with the origin at the top-left; `y` grows downward.
//! Lattice helpers flatten `(x, y)` coordinates into `y * width + x` indices,
//! classify the orientation of 8-neighbor edges, and derive the diagonal that
//! crosses a given diagonal inside its 2x2 block.
//!
//! ## Color
//! Pixel similarity is judged in YCbCr space. Conversions round to the
//! nearest 8-bit value and clamp to `[0, 255]`; the inverse conversion
//! round-trips within one step per channel.

mod color;
mod error;
mod image;
mod lattice;

pub use color::{Rgb, Ycbcr, rgb_to_ycbcr, ycbcr_to_rgb};
pub use error::Error;
pub use image::Image;
pub use lattice::{Orientation, classify_edge, crossing_edge, expand_index, flatten_point};
