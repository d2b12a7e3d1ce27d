use crate::error::{PngShuffleError, Result};

/// Sequential cursor over an immutable byte buffer.
///
/// Every read either returns exactly the bytes requested or fails with
/// [`PngShuffleError::TruncatedStream`], leaving the cursor where it was.
/// A zero-length read is a successful empty read and never moves the cursor.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Create a reader positioned at `offset`, clamped to the buffer end
    pub fn starting_at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            cursor: offset.min(data.len()),
        }
    }

    /// Current absolute offset into the buffer
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// Read the next `n` raw bytes
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        if n == 0 {
            return Ok(&[]);
        }
        if n > self.remaining() {
            return Err(PngShuffleError::TruncatedStream {
                offset: self.cursor,
                requested: n,
                available: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.data[start..self.cursor])
    }

    /// Read the next `n` bytes as a big-endian unsigned integer
    pub fn read_uint(&mut self, n: usize) -> Result<u64> {
        if n > 8 {
            return Err(PngShuffleError::IntegerWidth {
                offset: self.cursor,
                width: n,
            });
        }
        let bytes = self.read(n)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array::<4>()?))
    }

    /// Read exactly `N` bytes into a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }
}
