//! Error types for graphic field decoding.
//!
//! Every failure is terminal for the decode call that produced it: no partial
//! bitmap is ever returned.

use thiserror::Error;

/// Main error type for graphic field decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// The text does not start with a recognised envelope, or the compression
    /// tag is not the ASCII form.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Header fields are missing, not numeric, or inconsistent with each other.
    ///
    /// Bytes per row must be positive and divide the total byte count exactly.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The Z64 payload could not be turned back into raw bytes.
    ///
    /// Wraps the base64 or zlib failure that stopped the binary path.
    #[error(transparent)]
    DecompressionError(#[from] DecompressionError),

    /// The run-length text uses a shortcut or repeat code that cannot be
    /// expanded.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Pixel query outside the bitmap.
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} bitmap")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// The Z64 checksum segment does not match the CRC of the base64 text.
    ///
    /// Only reported when checksum verification is enabled.
    #[error("Checksum mismatch: field says {expected:04X}, data hashes to {actual:04X}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// Decoded buffer size differs from the header's total byte count.
    ///
    /// Only reported when strict length checking is enabled.
    #[error("Length mismatch: expected {expected} bytes, decoded {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Failures of the Z64 (base64 + zlib) path.
#[derive(Error, Debug)]
pub enum DecompressionError {
    #[error("Invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid zlib stream: {0}")]
    Inflate(#[from] std::io::Error),

    /// Payload too short to hold the marker and the checksum segment.
    #[error("Z64 payload is too short ({0} bytes)")]
    Truncated(usize),

    #[error("Invalid checksum segment {0:?}")]
    InvalidChecksum(String),
}
