//! Z64 graphic data: `:Z64:<base64 of a zlib stream>:<crc>`.

use std::{borrow::Cow, io::Read};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::{
    error::{DecompressionError, Error},
    options::DecodeOptions,
};

pub const MARKER: &str = ":Z64:";

/// `:` followed by four hex digits.
pub const CHECKSUM_LEN: usize = 5;

/// Split a Z64 payload into its base64 text and checksum segment.
pub fn split(payload: &str) -> Result<(&str, &str), Error> {
    let body = payload
        .strip_prefix(MARKER)
        .ok_or_else(|| Error::UnsupportedEncoding(format!("payload does not start with {}", MARKER)))?;

    if body.len() < CHECKSUM_LEN || !body.is_char_boundary(body.len() - CHECKSUM_LEN) {
        return Err(DecompressionError::Truncated(payload.len()).into());
    }
    Ok(body.split_at(body.len() - CHECKSUM_LEN))
}

/// Decode the base64 text and inflate it into at most `size` bytes.
///
/// The checksum segment is only looked at when the options ask for it.
/// Inflation never produces more than `size` bytes: in strict mode any
/// excess is a [`Error::LengthMismatch`], otherwise it is dropped. A short
/// stream is only rejected in strict mode.
pub fn decode(
    data: &str,
    checksum: &str,
    size: usize,
    options: &DecodeOptions,
) -> Result<Vec<u8>, Error> {
    let data: Cow<str> = if options.skips_line_breaks() && data.contains(&['\r', '\n'][..]) {
        Cow::Owned(data.chars().filter(|c| *c != '\r' && *c != '\n').collect())
    } else {
        Cow::Borrowed(data)
    };

    if options.checks_checksum() {
        verify(&data, checksum)?;
    }

    let deflated = STANDARD
        .decode(data.as_bytes())
        .map_err(DecompressionError::from)?;
    debug!("Z64 base64: {} chars -> {} bytes", data.len(), deflated.len());

    let mut buffer: Vec<u8> = Vec::new();
    ZlibDecoder::new(deflated.as_slice())
        .take((size as u64).saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(DecompressionError::from)?;
    debug!("Z64 inflate: {} -> {} bytes", deflated.len(), buffer.len());

    if buffer.len() > size {
        if options.checks_length() {
            return Err(Error::LengthMismatch {
                expected: size,
                actual: buffer.len(),
            });
        }
        warn!("Z64 data inflates past {} bytes, dropping the rest", size);
        buffer.truncate(size);
    } else if buffer.len() < size && options.checks_length() {
        return Err(Error::LengthMismatch {
            expected: size,
            actual: buffer.len(),
        });
    }

    Ok(buffer)
}

fn verify(data: &str, checksum: &str) -> Result<(), Error> {
    let expected = checksum
        .strip_prefix(':')
        .filter(|hex| hex.len() == 4)
        .and_then(|hex| u16::from_str_radix(hex, 16).ok())
        .ok_or_else(|| DecompressionError::InvalidChecksum(checksum.to_string()))?;

    let actual = crc16(data.as_bytes());
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// CRC-16/XMODEM: polynomial 0x1021, initial value 0, no reflection.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = crc << 1 ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
