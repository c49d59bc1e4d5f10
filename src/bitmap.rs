use crate::{error::Error, Matrix};

/// Decoded monochrome bitmap.
///
/// Each byte holds 8 horizontal dots, bit 7 being the leftmost one. A set bit
/// is a printed (black) dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
}

impl Bitmap {
    pub(crate) fn new(width: usize, height: usize, buffer: Vec<u8>) -> Self {
        Bitmap {
            width,
            height,
            buffer,
        }
    }

    /// Width in dots, always a multiple of 8.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        self.width / 8
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Read the dot at column `x` of row `y`, returning 0 or 1.
    ///
    /// Fails with [`Error::OutOfRange`] outside the declared size, and for dots
    /// a Z64 field declared but did not deliver.
    pub fn pixel_bit(&self, x: usize, y: usize) -> Result<u8, Error> {
        let out_of_range = || Error::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        };

        if x >= self.width || y >= self.height {
            return Err(out_of_range());
        }

        let index = y * self.bytes_per_row() + x / 8;
        let byte = self.buffer.get(index).ok_or_else(out_of_range)?;
        Ok((byte >> (7 - x % 8)) & 0x01)
    }

    pub fn is_black(&self, x: usize, y: usize) -> Result<bool, Error> {
        self.pixel_bit(x, y).map(|bit| bit == 1)
    }

    /// Iterate over complete rows of packed bytes.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.buffer
            .chunks_exact(self.bytes_per_row().max(1))
            .take(self.height)
    }

    /// Copy the rows into a [`Matrix`].
    pub fn to_matrix(&self) -> Matrix {
        self.rows().map(|row| row.to_vec()).collect()
    }
}
