use std::borrow::Cow;

use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CharsetError {
    #[error("unsupported character set '{0}'")]
    Unsupported(String),
    #[error("text contains characters that cannot be represented in {0}")]
    Unmappable(&'static str),
}

/// Data to be stored in a QR symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text, turned into bytes with a character set before encoding.
    Text(String),
    /// Raw bytes, encoded as they are.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Get the bytes to encode. Text is transcoded with `charset` (a WHATWG encoding label such as
    /// `"Shift_JIS"`), defaulting to UTF-8. Bytes ignore `charset`.
    ///
    /// Two labels differ from the WHATWG registry: `"ISO-8859-1"` (and its aliases) is Latin-1
    /// proper, not windows-1252, and `"UTF-16"` is big endian with a byte order mark.
    /// # Example
    /// ```
    /// use qrpix_encode::Payload;
    /// let text = Payload::from("é");
    /// assert_eq!(text.to_bytes(None).unwrap().as_ref(), &[0xc3, 0xa9]);
    /// assert_eq!(text.to_bytes(Some("latin1")).unwrap().as_ref(), &[0xe9]);
    /// ```
    pub fn to_bytes(&self, charset: Option<&str>) -> Result<Cow<'_, [u8]>, CharsetError> {
        match self {
            Payload::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Payload::Text(text) => match charset {
                Some(label) => transcode(text, label),
                None => Ok(Cow::Borrowed(text.as_bytes())),
            },
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Labels of ISO-8859-1 proper. The WHATWG registry maps them to windows-1252, which assigns
/// printable characters to 0x80..=0x9f.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso8859_1",
    "8859_1",
    "latin1",
    "l1",
];

/// Transcode `text` into the character set named by `label`.
fn transcode<'a>(text: &'a str, label: &str) -> Result<Cow<'a, [u8]>, CharsetError> {
    let name = label.trim().to_ascii_lowercase();
    if name == "utf-16" || name == "utf16" {
        trace!(label, "transcoding text payload to UTF-16 with byte order mark");
        let mut bytes = vec![0xfe, 0xff];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        return Ok(Cow::Owned(bytes));
    }
    if LATIN1_LABELS.contains(&name.as_str()) {
        trace!(label, "transcoding text payload to ISO-8859-1");
        return text
            .chars()
            .map(|c| u8::try_from(c).map_err(|_| CharsetError::Unmappable("ISO-8859-1")))
            .collect::<Result<Vec<u8>, _>>()
            .map(Cow::Owned);
    }
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .filter(|&encoding| encoding != REPLACEMENT)
        .ok_or_else(|| CharsetError::Unsupported(label.to_string()))?;
    trace!(label, encoding = encoding.name(), "transcoding text payload");
    // UTF-16 has no encoder of its own: its output encoding is UTF-8.
    if encoding == UTF_16BE {
        return Ok(Cow::Owned(
            text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        ));
    }
    if encoding == UTF_16LE {
        return Ok(Cow::Owned(
            text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        ));
    }
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(CharsetError::Unmappable(encoding.name()));
    }
    Ok(bytes)
}
