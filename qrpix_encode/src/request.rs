use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::{debug, info};

use qrpix_core::{rasterize, Ecl, Mode, ModuleMatrix, PixelBuffer, Version, Zoom};

use crate::error::Result;
use crate::{encode_image, AsciiRenderer, OutputFormat, Payload, QrcodeEncoder, Settings, Sink, SymbolEncoder};

/// Everything needed to produce a QR code image: the payload, how to turn it into bytes, the
/// symbol parameters and the zoom factor.
///
/// # Example
/// ```
/// use qrpix_encode::{OutputFormat, Request, Sink};
/// use qrpix_core::{Ecl, Zoom};
///
/// let mut png = Vec::new();
/// Request::new("https://example.com")
///     .with_ecl(Ecl::H)
///     .with_zoom(Zoom::new(4).unwrap())
///     .write(Sink::from(&mut png), Some(OutputFormat::PNG))
///     .unwrap();
/// assert!(png.starts_with(b"\x89PNG"));
/// ```
#[derive(Debug, Clone)]
pub struct Request<E = QrcodeEncoder> {
    payload: Payload,
    charset: Option<String>,
    settings: Settings,
    zoom: Zoom,
    encoder: E,
}

impl Request {
    /// Construct a new request for `payload` with default parameters: ECL M, byte mode, automatic
    /// version, zoom 1 and the `qrcode` backed encoder.
    pub fn new<P: Into<Payload>>(payload: P) -> Self {
        Self {
            payload: payload.into(),
            charset: None,
            settings: Settings::default(),
            zoom: Zoom::default(),
            encoder: QrcodeEncoder,
        }
    }
}

impl<E: SymbolEncoder> Request<E> {
    /// Set the character set used to turn a text payload into bytes.
    pub fn with_charset<S: Into<String>>(mut self, charset: S) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.settings.ecl = ecl;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.settings.mode = mode;
        self
    }

    /// Constrain the symbol to `version`, or pick the smallest fitting one if `None`.
    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.settings.version = version;
        self
    }

    pub fn with_zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = zoom;
        self
    }

    /// Use `encoder` to build the symbol.
    pub fn with_encoder<F: SymbolEncoder>(self, encoder: F) -> Request<F> {
        Request {
            payload: self.payload,
            charset: self.charset,
            settings: self.settings,
            zoom: self.zoom,
            encoder,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Get the bytes that will be encoded.
    pub fn payload_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(self.payload.to_bytes(self.charset.as_deref())?)
    }

    /// Compute the module matrix of the symbol.
    pub fn matrix(&self) -> Result<ModuleMatrix> {
        let bytes = self.payload_bytes()?;
        let matrix = self.encoder.encode(&bytes, &self.settings)?;
        debug!(side = matrix.side(), "computed module matrix");
        Ok(matrix)
    }

    /// Compute the symbol and rasterize it.
    pub fn render(&self) -> Result<PixelBuffer> {
        let matrix = self.matrix()?;
        Ok(rasterize(&matrix, self.zoom)?)
    }

    /// Compute the symbol and write it to `sink` in `format`. When `format` is `None`, it is
    /// inferred from the extension of a [Sink::Path].
    ///
    /// Nothing is created or written unless the symbol could be computed. A failure while writing
    /// may leave a partially written file behind.
    pub fn write(&self, sink: Sink<'_>, format: Option<OutputFormat>) -> Result<()> {
        let format = sink.resolve_format(format)?;
        let matrix = self.matrix()?;
        let bytes = match format {
            OutputFormat::Text => {
                let mut text = Vec::new();
                AsciiRenderer::new().render(&mut text, &matrix)?;
                text
            }
            OutputFormat::Image(image_format) => {
                let image = rasterize(&matrix, self.zoom)?;
                encode_image(&image, image_format)?
            }
        };
        match sink {
            Sink::Path(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                writer.write_all(&bytes)?;
                writer.flush()?;
                info!(path = %path.display(), %format, len = bytes.len(), "wrote QR code");
            }
            Sink::Writer(writer) => {
                writer.write_all(&bytes)?;
                writer.flush()?;
                debug!(%format, len = bytes.len(), "streamed QR code");
            }
        }
        Ok(())
    }
}
