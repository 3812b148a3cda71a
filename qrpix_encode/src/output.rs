use std::io::{Cursor, Write};
use std::path::Path;
use std::str::FromStr;

use image::ImageFormat;

use qrpix_core::PixelBuffer;

use crate::error::{Error, Result};

/// Format of the produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A raster image encoded by the `image` crate.
    Image(ImageFormat),
    /// Modules drawn as text, see [AsciiRenderer](crate::AsciiRenderer).
    Text,
}

impl OutputFormat {
    pub const PNG: OutputFormat = OutputFormat::Image(ImageFormat::Png);

    /// Determine the format from the extension of `path`, i.e. the text after its last `.`.
    /// # Example
    /// ```
    /// use qrpix_encode::OutputFormat;
    /// assert_eq!(OutputFormat::from_path("qr.png").unwrap(), OutputFormat::PNG);
    /// assert_eq!(OutputFormat::from_path("qr.txt").unwrap(), OutputFormat::Text);
    /// assert!(OutputFormat::from_path("qr").is_err());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext);
        match extension {
            Some(ext) => ext.parse(),
            None => Err(Error::MissingExtension(path.display().to_string())),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    /// Parse a format name such as `png`, `jpeg`, `bmp` or `txt`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "txt" | "text" => Ok(OutputFormat::Text),
            _ => ImageFormat::from_extension(&name)
                .map(OutputFormat::Image)
                .ok_or_else(|| Error::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("txt"),
            OutputFormat::Image(format) => {
                f.write_str(format.extensions_str().first().copied().unwrap_or("?"))
            }
        }
    }
}

/// Destination of the output.
pub enum Sink<'a> {
    /// A file, created or truncated.
    Path(&'a Path),
    /// Any stream, such as stdout or an in-memory buffer.
    Writer(&'a mut dyn Write),
}

impl<'a> Sink<'a> {
    /// Resolve the format to write with: `format` if given, otherwise the one implied by the file
    /// extension. Streams have no extension to fall back on.
    pub fn resolve_format(&self, format: Option<OutputFormat>) -> Result<OutputFormat> {
        match (format, self) {
            (Some(format), _) => Ok(format),
            (None, Sink::Path(path)) => OutputFormat::from_path(path),
            (None, Sink::Writer(_)) => Err(Error::MissingFormat),
        }
    }
}

impl<'a> From<&'a Path> for Sink<'a> {
    fn from(value: &'a Path) -> Self {
        Sink::Path(value)
    }
}

impl<'a, W: Write> From<&'a mut W> for Sink<'a> {
    fn from(value: &'a mut W) -> Self {
        Sink::Writer(value)
    }
}

/// Encode `image` in memory with `format`. Encoders may need to seek, which streams like stdout
/// do not support.
pub fn encode_image(image: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::PNG);
        assert_eq!(
            "jpg".parse::<OutputFormat>().unwrap(),
            OutputFormat::Image(ImageFormat::Jpeg)
        );
        assert_eq!(
            "bmp".parse::<OutputFormat>().unwrap(),
            OutputFormat::Image(ImageFormat::Bmp)
        );
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!(matches!(
            "docx".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(name)) if name == "docx"
        ));
    }

    #[test]
    fn test_format_from_last_extension() {
        assert_eq!(
            OutputFormat::from_path("archive.tar.gif").unwrap(),
            OutputFormat::Image(ImageFormat::Gif)
        );
        assert!(matches!(
            OutputFormat::from_path("out/qrcode"),
            Err(Error::MissingExtension(_))
        ));
        assert!(matches!(
            OutputFormat::from_path("out.d/qrcode"),
            Err(Error::MissingExtension(_))
        ));
    }

    #[test]
    fn test_format_from_dotfile() {
        assert_eq!(OutputFormat::from_path(".png").unwrap(), OutputFormat::PNG);
        assert_eq!(OutputFormat::from_path("out/.txt").unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_stream_needs_format() {
        let mut out = Vec::new();
        let sink = Sink::from(&mut out);
        assert!(matches!(sink.resolve_format(None), Err(Error::MissingFormat)));
        assert_eq!(
            sink.resolve_format(Some(OutputFormat::Text)).unwrap(),
            OutputFormat::Text
        );
    }

    #[test]
    fn test_encode_png_signature() {
        let image = PixelBuffer::from_pixel(2, 2, qrpix_core::WHITE);
        let bytes = encode_image(&image, ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
