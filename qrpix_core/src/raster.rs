use std::num::NonZeroU32;

use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;
use tracing::debug;

use crate::ModuleMatrix;

/// Pixel buffer produced by [rasterize].
pub type PixelBuffer = RgbImage;

/// Color of the pixels covering a dark module.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Color of the pixels covering a light module.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Largest pixel buffer [rasterize] allocates, in bytes. Same as the default allocation limit of
/// the `image` decoders.
pub const MAX_BUFFER_BYTES: usize = 512 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("zoom factor must be at least 1")]
    ZeroZoom,
    #[error("a {side}x{side} matrix at zoom {zoom} exceeds the maximum image size")]
    TooLarge { side: usize, zoom: u32 },
}

/// Number of pixels per axis used to render one module. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zoom(NonZeroU32);

impl Zoom {
    /// Construct a new zoom factor, or `None` if `factor` is 0.
    /// # Example
    /// ```
    /// use qrpix_core::Zoom;
    /// assert_eq!(Zoom::new(3).map(Zoom::get), Some(3));
    /// assert!(Zoom::new(0).is_none());
    /// ```
    pub const fn new(factor: u32) -> Option<Self> {
        match NonZeroU32::new(factor) {
            Some(factor) => Some(Self(factor)),
            None => None,
        }
    }

    /// Get the zoom factor.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(NonZeroU32::MIN)
    }
}

impl From<NonZeroU32> for Zoom {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl TryFrom<u32> for Zoom {
    type Error = RasterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(RasterError::ZeroZoom)
    }
}

impl std::fmt::Display for Zoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.get())
    }
}

/// Rasterize `matrix` into a monochrome image where each module becomes a `zoom`x`zoom` block of
/// black (dark module) or white (light module) pixels.
///
/// The image is exactly `side * zoom` pixels per axis, with no quiet zone. Pixel `(px, py)` takes
/// the color of module `(px / zoom, py / zoom)`, `x` being the column. Fails with
/// [RasterError::TooLarge] when the image would need more than [MAX_BUFFER_BYTES].
///
/// # Example
/// ```
/// use qrpix_core::{rasterize, ModuleMatrix, Zoom, BLACK};
/// let matrix = ModuleMatrix::from_fn(1, |_, _| true).unwrap();
/// let image = rasterize(&matrix, Zoom::new(3).unwrap()).unwrap();
/// assert_eq!(image.dimensions(), (3, 3));
/// assert!(image.pixels().all(|p| *p == BLACK));
/// ```
pub fn rasterize(matrix: &ModuleMatrix, zoom: Zoom) -> Result<PixelBuffer, RasterError> {
    let too_large = || RasterError::TooLarge {
        side: matrix.side(),
        zoom: zoom.get(),
    };
    let side = u32::try_from(matrix.side()).map_err(|_| too_large())?;
    let dimension = side.checked_mul(zoom.get()).ok_or_else(too_large)?;
    let buffer_bytes = (dimension as usize)
        .checked_mul(dimension as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .filter(|&bytes| bytes <= MAX_BUFFER_BYTES);
    if buffer_bytes.is_none() {
        return Err(too_large());
    }
    debug!(side, zoom = zoom.get(), dimension, "rasterizing module matrix");

    let z = zoom.get() as usize;
    let image = ImageBuffer::from_fn(dimension, dimension, |px, py| {
        match matrix.is_dark(px as usize / z, py as usize / z) {
            Some(true) => BLACK,
            _ => WHITE,
        }
    });
    Ok(image)
}

#[cfg(test)]
mod test {
    use super::*;

    fn zoom(factor: u32) -> Zoom {
        Zoom::new(factor).unwrap()
    }

    /// Check that every pixel of every block has the color of its module.
    fn assert_blocks_match(matrix: &ModuleMatrix, image: &PixelBuffer, zoom: u32) {
        let side = matrix.side() as u32;
        assert_eq!(image.dimensions(), (side * zoom, side * zoom));
        for (px, py, pixel) in image.enumerate_pixels() {
            let dark = matrix
                .is_dark((px / zoom) as usize, (py / zoom) as usize)
                .unwrap();
            let expected = if dark { BLACK } else { WHITE };
            assert_eq!(*pixel, expected, "pixel ({}, {})", px, py);
        }
    }

    #[test]
    fn test_single_dark_module() {
        let matrix = ModuleMatrix::try_from(vec![vec![true]]).unwrap();
        let image = rasterize(&matrix, zoom(3)).unwrap();
        assert_eq!(image.dimensions(), (3, 3));
        assert!(image.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_diagonal_quadrants() {
        let matrix = ModuleMatrix::try_from(vec![vec![true, false], vec![false, true]]).unwrap();
        let image = rasterize(&matrix, zoom(2)).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
        #[rustfmt::skip]
        let expected = [
            [BLACK, BLACK, WHITE, WHITE],
            [BLACK, BLACK, WHITE, WHITE],
            [WHITE, WHITE, BLACK, BLACK],
            [WHITE, WHITE, BLACK, BLACK],
        ];
        for (py, row) in expected.iter().enumerate() {
            for (px, color) in row.iter().enumerate() {
                assert_eq!(image.get_pixel(px as u32, py as u32), color);
            }
        }
    }

    #[test]
    fn test_outer_index_is_column() {
        // Column 1 is dark, column 0 is light: the right half of the image must be black.
        let matrix = ModuleMatrix::try_from(vec![vec![false, false], vec![true, true]]).unwrap();
        let image = rasterize(&matrix, zoom(2)).unwrap();
        for (px, _, pixel) in image.enumerate_pixels() {
            let expected = if px >= 2 { BLACK } else { WHITE };
            assert_eq!(*pixel, expected);
        }
    }

    #[test]
    fn test_blocks_follow_modules() {
        let matrix = ModuleMatrix::from_fn(7, |x, y| (x * 3 + y * 5) % 4 == 1).unwrap();
        for z in [1, 2, 5] {
            let image = rasterize(&matrix, zoom(z)).unwrap();
            assert_blocks_match(&matrix, &image, z);
        }
    }

    #[test]
    fn test_zoom_one_is_one_pixel_per_module() {
        let matrix = ModuleMatrix::from_fn(21, |x, y| x % 2 == y % 3 % 2).unwrap();
        let image = rasterize(&matrix, Zoom::default()).unwrap();
        assert_eq!(image.dimensions(), (21, 21));
        assert_blocks_match(&matrix, &image, 1);
    }

    #[test]
    fn test_deterministic() {
        let matrix = ModuleMatrix::from_fn(9, |x, y| x ^ y > 3).unwrap();
        let first = rasterize(&matrix, zoom(4)).unwrap();
        let second = rasterize(&matrix, zoom(4)).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_zero_zoom_rejected() {
        assert!(Zoom::new(0).is_none());
        assert_eq!(Zoom::try_from(0u32), Err(RasterError::ZeroZoom));
    }

    #[test]
    fn test_oversized_image_rejected() {
        let matrix = ModuleMatrix::from_fn(177, |_, _| false).unwrap();
        let result = rasterize(&matrix, zoom(u32::MAX / 100));
        assert!(matches!(
            result,
            Err(RasterError::TooLarge { side: 177, .. })
        ));
    }

    #[test]
    fn test_buffer_size_limit() {
        let matrix = ModuleMatrix::from_fn(177, |_, _| false).unwrap();
        // 177 * 24_000_000 still fits in a u32, the pixel buffer does not fit in memory.
        for z in [24_000_000, 1_000] {
            assert!(matches!(
                rasterize(&matrix, zoom(z)),
                Err(RasterError::TooLarge { side: 177, .. })
            ));
        }
        let image = rasterize(&matrix, zoom(10)).unwrap();
        assert_eq!(image.dimensions(), (1770, 1770));
    }
}
