//! `^GF` field parsing and dispatch.
//!
//! A field reads `^GFa,b,c,d,data^FS` where `a` is the compression type, `b`
//! the total byte count, `c` the graphic field byte count, `d` the bytes per
//! row and `data` the graphic data. The leading `^GF` and trailing `^FS` are
//! optional, a bare `A,b,c,d,data` is accepted as well.

use log::{debug, warn};

use crate::{ascii, bitmap::Bitmap, error::Error, options::DecodeOptions, z64};

const FIELD_START: &str = "^GF";
const FIELD_END: &str = "^FS";

/// Compression type of the only accepted form: ASCII hex, possibly carrying
/// Z64 data.
const ASCII_TAG: &str = "A";

/// Parsed header of a graphic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    total_bytes: usize,
    field_bytes: usize,
    bytes_per_row: usize,
}

impl Header {
    fn new(total_bytes: usize, field_bytes: usize, bytes_per_row: usize) -> Result<Self, Error> {
        if bytes_per_row == 0 {
            return Err(Error::MalformedHeader(
                "bytes per row must be positive".to_string(),
            ));
        }
        if total_bytes % bytes_per_row != 0 {
            return Err(Error::MalformedHeader(format!(
                "{} bytes do not split into rows of {} bytes",
                total_bytes, bytes_per_row
            )));
        }
        if bytes_per_row.checked_mul(8).is_none() {
            return Err(Error::MalformedHeader(format!(
                "{} bytes per row is too wide",
                bytes_per_row
            )));
        }
        if field_bytes != total_bytes {
            warn!(
                "field byte count {} differs from total byte count {}, using the total",
                field_bytes, total_bytes
            );
        }

        Ok(Header {
            total_bytes,
            field_bytes,
            bytes_per_row,
        })
    }

    /// Declared size of the decoded bitmap.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn field_bytes(&self) -> usize {
        self.field_bytes
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Width in dots.
    pub fn width(&self) -> usize {
        self.bytes_per_row * 8
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.total_bytes / self.bytes_per_row
    }
}

/// Graphic data of a field, by encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Hex digits with repeat codes and row shortcuts.
    Ascii(&'a str),
    /// Base64 text of a zlib stream and its trailing checksum segment.
    Z64 { data: &'a str, checksum: &'a str },
}

impl<'a> Payload<'a> {
    fn parse(text: &'a str) -> Result<Self, Error> {
        if text.starts_with(z64::MARKER) {
            let (data, checksum) = z64::split(text)?;
            Ok(Payload::Z64 { data, checksum })
        } else {
            Ok(Payload::Ascii(text))
        }
    }
}

/// A graphic field split into header and payload, not yet decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicField<'a> {
    pub header: Header,
    pub payload: Payload<'a>,
}

impl<'a> GraphicField<'a> {
    pub fn parse(text: &'a str) -> Result<Self, Error> {
        let mut text = text.trim();

        if !text.starts_with("^GFA") && !text.starts_with(ASCII_TAG) {
            return Err(Error::UnsupportedEncoding(format!(
                "expected {}{} or {}, found {:?}",
                FIELD_START,
                ASCII_TAG,
                ASCII_TAG,
                text.chars().take(8).collect::<String>()
            )));
        }
        if let Some(rest) = text.strip_prefix(FIELD_START) {
            text = rest;
        }
        if let Some(rest) = text.strip_suffix(FIELD_END) {
            text = rest;
        }

        let mut parts = text.splitn(5, ',');
        let mut next = |name: &str| {
            parts
                .next()
                .ok_or_else(|| Error::MalformedHeader(format!("missing {}", name)))
        };

        let tag = next("compression type")?;
        if tag != ASCII_TAG {
            return Err(Error::UnsupportedEncoding(format!(
                "compression type {:?}",
                tag
            )));
        }

        let total_bytes = parse_count(next("total byte count")?, "total byte count")?;
        let field_bytes = parse_count(next("field byte count")?, "field byte count")?;
        let bytes_per_row = parse_count(next("bytes per row")?, "bytes per row")?;
        let data = next("graphic data")?;

        let header = Header::new(total_bytes, field_bytes, bytes_per_row)?;
        debug!(
            "graphic field: {} bytes, {} per row, {}x{} dots",
            header.total_bytes,
            header.bytes_per_row,
            header.width(),
            header.height()
        );

        Ok(GraphicField {
            header,
            payload: Payload::parse(data)?,
        })
    }

    pub fn decode(&self, options: &DecodeOptions) -> Result<Bitmap, Error> {
        let header = self.header;

        let buffer = match self.payload {
            Payload::Z64 { data, checksum } => {
                z64::decode(data, checksum, header.total_bytes, options)?
            }
            Payload::Ascii(data) => {
                ascii::decode(data, header.total_bytes, header.bytes_per_row, options)?
            }
        };

        Ok(Bitmap::new(header.width(), header.height(), buffer))
    }
}

fn parse_count(text: &str, name: &str) -> Result<usize, Error> {
    text.trim()
        .parse::<usize>()
        .map_err(|err| Error::MalformedHeader(format!("{} {:?}: {}", name, text, err)))
}
