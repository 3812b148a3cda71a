//! Data model and rasterizer for QR symbols.
//!
//! A QR symbol enters this crate as a [ModuleMatrix] computed by some external encoder and leaves
//! it as a [PixelBuffer] through [rasterize].

mod matrix;
mod meta;
mod raster;

pub use matrix::{MatrixError, Module, ModuleMatrix};
pub use meta::{Ecl, Mode, ParseError, Version};
pub use raster::{rasterize, PixelBuffer, RasterError, Zoom, BLACK, MAX_BUFFER_BYTES, WHITE};
