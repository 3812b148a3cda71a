//! Turn text or bytes into QR code images.
//!
//! A [Request] carries the payload and the symbol parameters. The symbol itself is computed by a
//! [SymbolEncoder] (by default [QrcodeEncoder]), rasterized by [qrpix_core::rasterize] and written
//! to a [Sink] in an [OutputFormat].

mod charset;
mod encode;
mod error;
mod output;
mod render;
mod request;

pub use charset::{CharsetError, Payload};
pub use encode::{EncodingError, QrcodeEncoder, Settings, SymbolEncoder};
pub use error::{Error, Result};
pub use output::{encode_image, OutputFormat, Sink};
pub use render::AsciiRenderer;
pub use request::Request;
