//! Bounds-checked cursor over a byte buffer
//!
//! All multi-byte values are little-endian. This is a property of the RBF
//! format, not a per-call option.

use crate::error::OutOfBounds;

/// A read cursor over a borrowed, fixed-length byte buffer.
///
/// Every read either consumes exactly the bytes it needs or fails with
/// [`OutOfBounds`] and leaves the cursor untouched.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader positioned at offset 0
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Fail unless at least `len` bytes remain
    pub fn ensure_remaining(&self, len: usize) -> Result<(), OutOfBounds> {
        if len > self.remaining() {
            Err(OutOfBounds {
                offset: self.position,
                requested: len,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Read the next `len` bytes as a slice of the underlying buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfBounds> {
        self.ensure_remaining(len)?;
        let start = self.position;
        self.position += len;
        Ok(&self.buffer[start..self.position])
    }

    /// Read the next `len` bytes as a tag string (non-ASCII bytes are replaced)
    pub fn read_magic(&mut self, len: usize) -> Result<String, OutOfBounds> {
        self.read_bytes(len)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        self.read_array::<1>().map(|b| b[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, OutOfBounds> {
        self.read_array().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, OutOfBounds> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Read three consecutive f64 values.
    ///
    /// The values are returned raw; finiteness is the caller's concern.
    pub fn read_f64_triple(&mut self) -> Result<[f64; 3], OutOfBounds> {
        self.ensure_remaining(3 * std::mem::size_of::<f64>())?;
        Ok([self.read_f64()?, self.read_f64()?, self.read_f64()?])
    }
}
