use crate::error::{PngShuffleError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// PNG signature: `\x89 P N G \r \n \x1A \n`
pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes occupied by the length and type fields in front of a payload
pub const CHUNK_PREFIX_SIZE: usize = 8;

/// Bytes occupied by the trailer after a payload
pub const CHUNK_TRAILER_SIZE: usize = 4;

/// Check that `data` starts with the PNG signature
pub fn check_magic(data: &[u8]) -> Result<()> {
    if data.len() < PNG_MAGIC.len() {
        return Err(PngShuffleError::InvalidFormat {
            offset: 0,
            reason: format!(
                "file is {} bytes, too short for the PNG signature",
                data.len()
            ),
        });
    }
    if data[..PNG_MAGIC.len()] != PNG_MAGIC {
        return Err(PngShuffleError::InvalidFormat {
            offset: 0,
            reason: format!(
                "expected PNG signature {}, found {}",
                hex::encode(PNG_MAGIC),
                hex::encode(&data[..PNG_MAGIC.len()])
            ),
        });
    }
    Ok(())
}

/// Four-byte chunk type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header, pinned at canonical position 0
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// Image trailer, pinned at the last canonical position
    pub const IEND: ChunkType = ChunkType(*b"IEND");

    /// Tags this tool recognizes by name; anything else is still carried opaquely
    pub const KNOWN: [ChunkType; 14] = [
        ChunkType(*b"IHDR"),
        ChunkType(*b"IDAT"),
        ChunkType(*b"IEND"),
        ChunkType(*b"PLTE"),
        ChunkType(*b"tRNS"),
        ChunkType(*b"cHRM"),
        ChunkType(*b"bKGD"),
        ChunkType(*b"gAMA"),
        ChunkType(*b"iCCP"),
        ChunkType(*b"sBIT"),
        ChunkType(*b"sRGB"),
        ChunkType(*b"tEXt"),
        ChunkType(*b"zTXt"),
        ChunkType(*b"tIME"),
    ];

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(self)
    }

    /// Header or terminator, i.e. excluded from permutation
    pub fn is_pinned(&self) -> bool {
        *self == Self::IHDR || *self == Self::IEND
    }

    /// Critical chunks have an uppercase first letter
    pub fn is_critical(&self) -> bool {
        self.0[0].is_ascii_uppercase()
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_alphabetic()) {
            // All ASCII letters, so this cannot fail
            f.write_str(std::str::from_utf8(&self.0).unwrap_or("????"))
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

impl Serialize for ChunkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
