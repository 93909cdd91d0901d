//! Textual representations of UUIDs

#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use crate::Uuid;
use data_encoding::{Encoding, BASE64, BASE64_NOPAD};
use fstr::FStr;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const URN_PREFIX: &[u8; 9] = b"urn:uuid:";

impl Uuid {
    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7p::Uuid;
    ///
    /// let x = "06592008-007b-71c8-8315-ab123456789a".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "06592008-007b-71c8-8315-ab123456789a");
    /// assert_eq!(format!("{}", y), "06592008-007b-71c8-8315-ab123456789a");
    /// # Ok::<(), uuid7p::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        self.write_canonical(&mut buffer);
        into_fstr(buffer)
    }

    /// Returns the 32-digit hexadecimal string representation without hyphens.
    pub fn encode_short(&self) -> FStr<32> {
        let mut buffer = [0u8; 32];
        for (i, e) in self.as_bytes().iter().enumerate() {
            buffer[i * 2] = HEX_DIGITS[(e >> 4) as usize];
            buffer[i * 2 + 1] = HEX_DIGITS[(e & 15) as usize];
        }
        into_fstr(buffer)
    }

    /// Returns the 8-4-4-4-12 representation enclosed in braces (the Microsoft GUID form).
    pub fn encode_braced(&self) -> FStr<38> {
        let mut buffer = [0u8; 38];
        buffer[0] = b'{';
        self.write_canonical(&mut buffer[1..37]);
        buffer[37] = b'}';
        into_fstr(buffer)
    }

    /// Returns the URN representation (`urn:uuid:` followed by the 8-4-4-4-12 form).
    pub fn encode_urn(&self) -> FStr<45> {
        let mut buffer = [0u8; 45];
        buffer[..9].copy_from_slice(URN_PREFIX);
        self.write_canonical(&mut buffer[9..]);
        into_fstr(buffer)
    }

    /// Returns the unpadded standard base64 representation of the 16 bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7p::Uuid;
    ///
    /// assert_eq!(&Uuid::NIL.encode_base64() as &str, "AAAAAAAAAAAAAAAAAAAAAA");
    /// assert_eq!(&Uuid::MAX.encode_base64() as &str, "/////////////////////w");
    /// ```
    pub fn encode_base64(&self) -> FStr<22> {
        let mut buffer = [0u8; 22];
        BASE64_NOPAD.encode_mut(self.as_bytes(), &mut buffer);
        into_fstr(buffer)
    }

    /// Writes the 36-character 8-4-4-4-12 form into `dst`.
    fn write_canonical(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), 36);
        let mut buf_iter = dst.iter_mut();
        for (i, e) in self.as_bytes().iter().enumerate() {
            if let Some(hi) = buf_iter.next() {
                *hi = HEX_DIGITS[(e >> 4) as usize];
            }
            if let Some(lo) = buf_iter.next() {
                *lo = HEX_DIGITS[(e & 15) as usize];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(hyphen) = buf_iter.next() {
                    *hyphen = b'-';
                }
            }
        }
    }

    /// Creates an object from any of the supported textual representations.
    ///
    /// The form is selected by the length of `src` in bytes:
    ///
    /// | Length | Form                                                 |
    /// | ------ | ---------------------------------------------------- |
    /// | 32     | hexadecimal digits without hyphens                   |
    /// | 36     | 8-4-4-4-12 hexadecimal                               |
    /// | 38     | 8-4-4-4-12 enclosed in `{` and `}`                   |
    /// | 45     | `urn:uuid:` (case-insensitive) followed by 8-4-4-4-12 |
    /// | other  | unpadded base64, then padded base64                  |
    ///
    /// Hexadecimal digits are accepted in either case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7p::Uuid;
    ///
    /// let x = Uuid::parse_str("06592008-007b-71c8-8315-ab123456789a")?;
    /// assert_eq!(Uuid::parse_str("06592008007b71c88315ab123456789a")?, x);
    /// assert_eq!(Uuid::parse_str("{06592008-007b-71c8-8315-ab123456789a}")?, x);
    /// assert_eq!(Uuid::parse_str("urn:uuid:06592008-007b-71c8-8315-ab123456789a")?, x);
    /// assert_eq!(Uuid::parse_str("BlkgCAB7cciDFasSNFZ4mg")?, x);
    /// assert_eq!(Uuid::parse_str("BlkgCAB7cciDFasSNFZ4mg==")?, x);
    /// # Ok::<(), uuid7p::ParseError>(())
    /// ```
    pub fn parse_str(src: &str) -> Result<Self, ParseError> {
        let src = src.as_bytes();
        match src.len() {
            32 => parse_hex(src).map(Self::from),
            36 => parse_hyphenated(src).map(Self::from),
            38 => {
                if src[0] != b'{' || src[37] != b'}' {
                    return Err(ParseErrorKind::Delimiter.into());
                }
                parse_hyphenated(&src[1..37]).map(Self::from)
            }
            45 => {
                if !src[..9].eq_ignore_ascii_case(URN_PREFIX) {
                    return Err(ParseErrorKind::UrnPrefix.into());
                }
                parse_hyphenated(&src[9..]).map(Self::from)
            }
            _ => decode_base64(src)
                .map(Self::from)
                .ok_or_else(|| ParseErrorKind::Base64.into()),
        }
    }

    /// Creates an object from a raw 16-byte big-endian sequence, copying it verbatim.
    pub fn from_slice(src: &[u8]) -> Result<Self, ParseError> {
        <[u8; 16]>::try_from(src)
            .map(Self::from)
            .map_err(|_| ParseErrorKind::Length.into())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from any of the supported textual representations.
    ///
    /// See [`Uuid::parse_str()`] for the accepted forms.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_str(src)
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse_str(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = ParseError;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

fn into_fstr<const N: usize>(buffer: [u8; N]) -> FStr<N> {
    debug_assert!(buffer.is_ascii());
    // SAFETY: every encoder above writes ASCII bytes only
    unsafe { FStr::from_inner_unchecked(buffer) }
}

fn hex_digit(c: u8) -> Result<u8, ParseError> {
    (c as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(ParseError::new(ParseErrorKind::Digit))
}

/// Parses 32 hexadecimal digits.
fn parse_hex(src: &[u8]) -> Result<[u8; 16], ParseError> {
    debug_assert_eq!(src.len(), 32);
    let mut dst = [0u8; 16];
    for (e, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *e = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
    }
    Ok(dst)
}

/// Parses the 8-4-4-4-12 form after checking the hyphen positions.
fn parse_hyphenated(src: &[u8]) -> Result<[u8; 16], ParseError> {
    debug_assert_eq!(src.len(), 36);
    if src[8] != b'-' || src[13] != b'-' || src[18] != b'-' || src[23] != b'-' {
        return Err(ParseErrorKind::Hyphen.into());
    }

    let mut digits = [0u8; 32];
    digits[..8].copy_from_slice(&src[..8]);
    digits[8..12].copy_from_slice(&src[9..13]);
    digits[12..16].copy_from_slice(&src[14..18]);
    digits[16..20].copy_from_slice(&src[19..23]);
    digits[20..].copy_from_slice(&src[24..]);
    parse_hex(&digits)
}

/// Returns the unpadded and padded standard base64 encodings with the unused bits of the last
/// symbol ignored.
fn lenient_base64() -> [Encoding; 2] {
    [BASE64_NOPAD, BASE64].map(|base| {
        let mut specification = base.specification();
        specification.check_trailing_bits = false;
        specification.encoding().unwrap_or(base)
    })
}

/// Decodes unpadded, then padded, standard base64 that encodes exactly 16 bytes.
fn decode_base64(src: &[u8]) -> Option<[u8; 16]> {
    #[cfg(feature = "std")]
    let encodings = {
        static ENCODINGS: std::sync::OnceLock<[Encoding; 2]> = std::sync::OnceLock::new();
        ENCODINGS.get_or_init(lenient_base64)
    };
    #[cfg(not(feature = "std"))]
    let encodings = &lenient_base64();

    encodings.iter().find_map(|e| decode_base64_exact(e, src))
}

fn decode_base64_exact(encoding: &Encoding, src: &[u8]) -> Option<[u8; 16]> {
    // 24 symbols with padding decode to at most 18 bytes
    let mut buffer = [0u8; 18];
    let dst = buffer.get_mut(..encoding.decode_len(src.len()).ok()?)?;
    let len = encoding.decode_mut(src, dst).ok()?;
    <[u8; 16]>::try_from(&dst[..len]).ok()
}

/// Error parsing an invalid representation of UUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
}

impl ParseError {
    const fn new(kind: ParseErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the reason the input was rejected.
    pub const fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            ParseErrorKind::Digit => "invalid hexadecimal digit",
            ParseErrorKind::Hyphen => "hyphens not found at offsets 8, 13, 18, and 23",
            ParseErrorKind::Delimiter => "missing braces around braced representation",
            ParseErrorKind::UrnPrefix => "missing `urn:uuid:` prefix",
            ParseErrorKind::Base64 => "invalid base64 representation",
            ParseErrorKind::Length => "invalid length: expected 16 bytes",
        })
    }
}

/// The reason a representation was rejected by the parser.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// A character that must be a hexadecimal digit is not one.
    Digit,
    /// A 36-character form lacks a hyphen at offset 8, 13, 18, or 23.
    Hyphen,
    /// A 38-character form is not enclosed in `{` and `}`.
    Delimiter,
    /// A 45-character form does not start with `urn:uuid:`.
    UrnPrefix,
    /// Neither unpadded nor padded base64 decoding yields 16 bytes.
    Base64,
    /// A raw byte sequence is not 16 bytes long.
    Length,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{ParseError, Uuid};

    impl From<Uuid> for String {
        fn from(src: Uuid) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Uuid {
        type Error = ParseError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }

    impl std::error::Error for ParseError {}
}
