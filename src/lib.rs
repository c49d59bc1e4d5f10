//! ZPL Graphic Field Decoder
//!
//! This crate decodes the graphic data of a `^GF` field, as sent to Zebra
//! label printers, into a monochrome bitmap. Both the ASCII hex form with
//! its run-length compression and the `:Z64:` form (base64 of a zlib stream)
//! are supported.
//!
//! # Example
//!
//! ```rust
//! use zpl_gf::decode;
//!
//! let bitmap = decode("^GFA,4,4,1,FF,,^FS").unwrap();
//! assert_eq!(bitmap.width(), 8);
//! assert_eq!(bitmap.height(), 4);
//! assert_eq!(bitmap.as_bytes(), &[0xFF, 0x00, 0x00, 0x00]);
//! assert_eq!(bitmap.pixel_bit(0, 0).unwrap(), 1);
//! ```

mod alphabet;
mod ascii;
mod bitmap;
mod error;
mod field;
mod options;
mod z64;

pub use crate::{
    bitmap::Bitmap,
    error::{DecompressionError, Error},
    field::{GraphicField, Header, Payload},
    options::DecodeOptions,
    z64::crc16,
};

/// Type alias for 1-bit bitmap data split into rows.
///
/// Each inner `Vec<u8>` represents a single row of pixels, with 8 pixels
/// packed into each byte, leftmost pixel in the most significant bit.
pub type Matrix = Vec<Vec<u8>>;

/// Decode a graphic field with the default options.
pub fn decode(text: &str) -> Result<Bitmap, Error> {
    decode_with(text, &DecodeOptions::default())
}

/// Decode a graphic field.
///
/// `text` is a single field, `^GFA,...^FS` or the bare `A,...` form.
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Bitmap, Error> {
    GraphicField::parse(text)?.decode(options)
}
