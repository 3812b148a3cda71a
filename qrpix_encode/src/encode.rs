use itertools::Itertools;
use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;
use tracing::debug;

use qrpix_core::{Ecl, MatrixError, Mode, ModuleMatrix, Version};

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("cannot encode byte 0x{byte:02x} at offset {offset} using mode {mode}, the data needs mode {required}")]
    CannotEncodeWithMode {
        byte: u8,
        offset: usize,
        mode: Mode,
        required: Mode,
    },
    #[error("cannot encode {len} B of data in {mode} mode with ECL {ecl} {}", version_bound(.version))]
    DataTooBig {
        len: usize,
        mode: Mode,
        ecl: Ecl,
        version: Option<Version>,
    },
    #[error("symbol encoder failed: {0}")]
    Backend(#[from] QrError),
    #[error("symbol encoder produced an invalid matrix: {0}")]
    Matrix(#[from] MatrixError),
}

fn version_bound(version: &Option<Version>) -> String {
    match version {
        Some(version) => format!("in version {}", version),
        None => format!("in any version up to {}", Version::MAX),
    }
}

/// Parameters of a QR symbol.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub ecl: Ecl,
    pub mode: Mode,
    /// `None` selects the smallest version that fits the data.
    pub version: Option<Version>,
}

/// Something able to turn bytes into the module matrix of a QR symbol.
pub trait SymbolEncoder {
    /// Encode `data` into a symbol following `settings`.
    fn encode(&self, data: &[u8], settings: &Settings) -> Result<ModuleMatrix, EncodingError>;
}

impl<T: SymbolEncoder + ?Sized> SymbolEncoder for &T {
    fn encode(&self, data: &[u8], settings: &Settings) -> Result<ModuleMatrix, EncodingError> {
        (**self).encode(data, settings)
    }
}

/// [SymbolEncoder] backed by the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeEncoder;

impl QrcodeEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Lay out `data` as a single segment of `mode` in `version`.
    fn bits(data: &[u8], mode: Mode, ecl: Ecl, version: Version) -> Result<Bits, QrError> {
        let mut bits = Bits::new(qrcode::Version::Normal(version.number() as i16));
        match mode {
            Mode::Num => bits.push_numeric_data(data)?,
            Mode::Alnum => bits.push_alphanumeric_data(data)?,
            Mode::Bytes => bits.push_byte_data(data)?,
        }
        bits.push_terminator(ec_level(ecl))?;
        Ok(bits)
    }

    /// Find the version to use, trying each allowed version from the smallest upwards.
    fn fit(data: &[u8], settings: &Settings) -> Result<(Version, Bits), EncodingError> {
        let (mut version, max) = match settings.version {
            Some(version) => (version, version),
            None => (Version::MIN, Version::MAX),
        };
        loop {
            match Self::bits(data, settings.mode, settings.ecl, version) {
                Ok(bits) => return Ok((version, bits)),
                Err(QrError::DataTooLong) => {}
                Err(err) => return Err(err.into()),
            }
            match version.incr() {
                Some(next) if next <= max => version = next,
                _ => {
                    return Err(EncodingError::DataTooBig {
                        len: data.len(),
                        mode: settings.mode,
                        ecl: settings.ecl,
                        version: settings.version,
                    })
                }
            }
        }
    }
}

impl SymbolEncoder for QrcodeEncoder {
    fn encode(&self, data: &[u8], settings: &Settings) -> Result<ModuleMatrix, EncodingError> {
        let required = Mode::narrowest_for(data);
        if settings.mode.most_generic(required) != settings.mode {
            if let Some((offset, &byte)) = data
                .iter()
                .find_position(|&&byte| !settings.mode.can_encode(byte))
            {
                return Err(EncodingError::CannotEncodeWithMode {
                    byte,
                    offset,
                    mode: settings.mode,
                    required,
                });
            }
        }
        let (version, bits) = Self::fit(data, settings)?;
        let code = QrCode::with_bits(bits, ec_level(settings.ecl))?;
        debug!(%version, ecl = %settings.ecl, mode = %settings.mode, len = data.len(), "encoded symbol");
        let modules = code.to_colors().into_iter().map(|color| color == Color::Dark);
        Ok(ModuleMatrix::from_modules(code.width(), modules)?)
    }
}

fn ec_level(ecl: Ecl) -> EcLevel {
    match ecl {
        Ecl::L => EcLevel::L,
        Ecl::M => EcLevel::M,
        Ecl::Q => EcLevel::Q,
        Ecl::H => EcLevel::H,
    }
}
