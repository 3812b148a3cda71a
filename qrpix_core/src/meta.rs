use std::str::FromStr;

use thiserror::Error;

/// Failure to parse one of the symbol parameters from a string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid error correction level '{0}', expected one of L, M, Q, H")]
    Ecl(String),
    #[error("invalid encoding mode '{0}', expected numeric (N), alphanumeric (A) or bytes (B)")]
    Mode(String),
    #[error("invalid version '{0}', expected 0 (auto) or a number in 1..=40")]
    Version(String),
}

/// Error correction level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ecl {
    /// Low: 7% recovery rate.
    L,
    /// Medium: 15% recovery rate.
    #[default]
    M,
    /// Quartile: 25% recovery rate.
    Q,
    /// High: 30% recovery rate.
    H,
}

impl Ecl {
    /// Get the single letter naming the level.
    pub fn letter(self) -> char {
        match self {
            Self::L => 'L',
            Self::M => 'M',
            Self::Q => 'Q',
            Self::H => 'H',
        }
    }
}

impl TryFrom<char> for Ecl {
    type Error = ParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'L' => Ok(Self::L),
            'M' => Ok(Self::M),
            'Q' => Ok(Self::Q),
            'H' => Ok(Self::H),
            _ => Err(ParseError::Ecl(value.to_string())),
        }
    }
}

impl FromStr for Ecl {
    type Err = ParseError;

    /// # Example
    /// ```
    /// use qrpix_core::Ecl;
    /// assert_eq!("q".parse(), Ok(Ecl::Q));
    /// assert!("X".parse::<Ecl>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c).map_err(|_| ParseError::Ecl(s.to_string())),
            _ => Err(ParseError::Ecl(s.to_string())),
        }
    }
}

impl std::fmt::Display for Ecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Encoding mode of the payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Encoding for digits 0-9.
    Num,
    /// Encoding for digits 0-9, capital characters A-Z, space and `$%*+-./:`.
    Alnum,
    /// Encoding for arbitrary bytes.
    #[default]
    Bytes,
}

impl Mode {
    /// Return the [Mode] that is the most generic between `self` and `other`.
    /// # Example
    /// ```
    /// use qrpix_core::Mode;
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Bytes), Mode::Bytes);
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Num), Mode::Alnum);
    /// ```
    pub fn most_generic(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Determine whether `byte` can be represented in this mode.
    /// # Example
    /// ```
    /// use qrpix_core::Mode;
    /// assert!(Mode::Alnum.can_encode(b'7'));
    /// assert!(!Mode::Num.can_encode(b'A'));
    /// assert!(Mode::Bytes.can_encode(0xff));
    /// ```
    pub fn can_encode(self, byte: u8) -> bool {
        Mode::from(byte) <= self
    }

    /// Get the narrowest mode that can represent all of `data`.
    pub fn narrowest_for(data: &[u8]) -> Self {
        data.iter()
            .map(|&byte| Mode::from(byte))
            .fold(Mode::Num, Mode::most_generic)
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value {
            0x30..=0x39 => Mode::Num,
            0x20 | 0x24 | 0x25 | 0x2a | 0x2b | 0x2d..=0x2f | 0x3a | 0x41..=0x5a => Mode::Alnum,
            _ => Mode::Bytes,
        }
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "num" | "numeric" => Ok(Self::Num),
            "a" | "alnum" | "alphanumeric" => Ok(Self::Alnum),
            "b" | "bytes" | "byte" | "8bit" | "8-bit" => Ok(Self::Bytes),
            _ => Err(ParseError::Mode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Num => "numeric",
            Self::Alnum => "alphanumeric",
            Self::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Version of a QR code, which determines its size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Version {
    V01 =  1, V02 =  2, V03 =  3, V04 =  4, V05 =  5, V06 =  6, V07 =  7, V08 =  8, V09 =  9, V10 = 10,
    V11 = 11, V12 = 12, V13 = 13, V14 = 14, V15 = 15, V16 = 16, V17 = 17, V18 = 18, V19 = 19, V20 = 20,
    V21 = 21, V22 = 22, V23 = 23, V24 = 24, V25 = 25, V26 = 26, V27 = 27, V28 = 28, V29 = 29, V30 = 30,
    V31 = 31, V32 = 32, V33 = 33, V34 = 34, V35 = 35, V36 = 36, V37 = 37, V38 = 38, V39 = 39, V40 = 40,
}

impl Version {
    pub const MIN: Version = Version::V01;
    pub const MAX: Version = Version::V40;

    /// Construct a new version given its number. Valid version numbers are in the range 1..=40.
    /// # Example
    /// ```
    /// use qrpix_core::Version;
    /// assert!(Version::new(1).is_some());
    /// assert!(Version::new(50).is_none());
    /// ```
    pub const fn new(number: u8) -> Option<Self> {
        let version = match number {
             1 => Self::V01,  2 => Self::V02,  3 => Self::V03,  4 => Self::V04,  5 => Self::V05,  6 => Self::V06,  7 => Self::V07,  8 => Self::V08,  9 => Self::V09, 10 => Self::V10,
            11 => Self::V11, 12 => Self::V12, 13 => Self::V13, 14 => Self::V14, 15 => Self::V15, 16 => Self::V16, 17 => Self::V17, 18 => Self::V18, 19 => Self::V19, 20 => Self::V20,
            21 => Self::V21, 22 => Self::V22, 23 => Self::V23, 24 => Self::V24, 25 => Self::V25, 26 => Self::V26, 27 => Self::V27, 28 => Self::V28, 29 => Self::V29, 30 => Self::V30,
            31 => Self::V31, 32 => Self::V32, 33 => Self::V33, 34 => Self::V34, 35 => Self::V35, 36 => Self::V36, 37 => Self::V37, 38 => Self::V38, 39 => Self::V39, 40 => Self::V40,
            _ => return None,
        };
        Some(version)
    }

    /// Interpret a numeric version selector, where 0 requests automatic selection of the smallest
    /// version that fits the data.
    /// # Example
    /// ```
    /// use qrpix_core::Version;
    /// assert_eq!(Version::from_selector(0), Ok(None));
    /// assert_eq!(Version::from_selector(7), Ok(Some(Version::V07)));
    /// assert!(Version::from_selector(41).is_err());
    /// ```
    pub fn from_selector(selector: u8) -> Result<Option<Self>, ParseError> {
        match selector {
            0 => Ok(None),
            n => Self::new(n)
                .map(Some)
                .ok_or_else(|| ParseError::Version(n.to_string())),
        }
    }

    /// Get the version number.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Get the next higher version, if it exists.
    /// # Example
    /// ```
    /// use qrpix_core::Version;
    /// assert_eq!(Version::V10.incr(), Some(Version::V11));
    /// assert_eq!(Version::V40.incr(), None);
    /// ```
    pub fn incr(self) -> Option<Self> {
        Self::new(self.number() + 1)
    }

    /// Get the side length, in modules, of symbols of this version.
    /// # Example
    /// ```
    /// use qrpix_core::Version;
    /// assert_eq!(Version::V01.side(), 21);
    /// assert_eq!(Version::V40.side(), 177);
    /// ```
    pub fn side(self) -> usize {
        17 + self.number() as usize * 4
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        value.number()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.number())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ecl_from_letters() {
        for (letter, ecl) in [('L', Ecl::L), ('M', Ecl::M), ('Q', Ecl::Q), ('H', Ecl::H)] {
            assert_eq!(Ecl::try_from(letter), Ok(ecl));
            assert_eq!(ecl.letter(), letter);
        }
        assert_eq!("MM".parse::<Ecl>(), Err(ParseError::Ecl("MM".into())));
        assert_eq!(Ecl::default(), Ecl::M);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("N".parse(), Ok(Mode::Num));
        assert_eq!("alphanumeric".parse(), Ok(Mode::Alnum));
        assert_eq!("8bit".parse(), Ok(Mode::Bytes));
        assert!("kanji".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Bytes);
    }

    #[test]
    fn test_narrowest_mode() {
        assert_eq!(Mode::narrowest_for(b"0123"), Mode::Num);
        assert_eq!(Mode::narrowest_for(b"HTTP://X.Y/1"), Mode::Alnum);
        assert_eq!(Mode::narrowest_for(b"hello"), Mode::Bytes);
        assert_eq!(Mode::narrowest_for(b""), Mode::Num);
    }
}
