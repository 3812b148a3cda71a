use thiserror::Error;

use qrpix_core::RasterError;

use crate::{CharsetError, EncodingError};

/// Errors produced while turning a payload into an image.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Charset(#[from] CharsetError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("unknown output format '{0}'")]
    UnknownFormat(String),

    #[error("cannot infer the output format: '{0}' has no extension")]
    MissingExtension(String),

    #[error("a format is required when writing to a stream")]
    MissingFormat,

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
