//! QR code images from text or bytes.
//!
//! ```
//! use qrpix::{Request, Zoom};
//!
//! let image = Request::new("qrpix").with_zoom(Zoom::new(2).unwrap()).render().unwrap();
//! assert_eq!(image.dimensions(), (42, 42));
//! ```

pub use qrpix_core::*;
pub use qrpix_encode::*;
