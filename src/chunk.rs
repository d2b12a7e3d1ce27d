use crate::checksum::chunk_crc;
use crate::header::{ChunkType, CHUNK_PREFIX_SIZE, CHUNK_TRAILER_SIZE, PNG_MAGIC};

/// One chunk of a PNG stream, borrowing its payload from the input buffer.
///
/// `crc` is the canonical trailer. In canonical collection it is the value
/// stored in the stream; in positional collection it is recomputed, because
/// the stored trailer holds a position instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of the chunk's length field in the input buffer
    pub offset: usize,
    pub chunk_type: ChunkType,
    pub payload: &'a [u8],
    pub crc: [u8; 4],
    /// Trailer bytes exactly as found in the stream
    pub stored_trailer: [u8; 4],
}

impl<'a> Chunk<'a> {
    /// Payload length as written in the length field
    pub fn length(&self) -> u32 {
        // Payloads are read with a u32 length, so this never truncates
        self.payload.len() as u32
    }

    /// Size of the chunk on the wire, including length, type and trailer
    pub fn encoded_len(&self) -> usize {
        CHUNK_PREFIX_SIZE + self.payload.len() + CHUNK_TRAILER_SIZE
    }

    /// Whether `crc` matches the chunk contents
    pub fn crc_is_valid(&self) -> bool {
        self.crc == chunk_crc(&self.chunk_type, self.payload)
    }

    /// Whether the trailer found in the stream is the chunk's CRC
    pub fn stored_trailer_is_crc(&self) -> bool {
        self.stored_trailer == chunk_crc(&self.chunk_type, self.payload)
    }

    /// Append `length ++ type ++ payload ++ crc`
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.write_with_trailer(out, self.crc);
    }

    /// Append `length ++ type ++ payload ++ position`, position as big-endian u32
    pub fn write_positional(&self, out: &mut Vec<u8>, position: u32) {
        self.write_with_trailer(out, position.to_be_bytes());
    }

    fn write_with_trailer(&self, out: &mut Vec<u8>, trailer: [u8; 4]) {
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.length().to_be_bytes());
        out.extend_from_slice(self.chunk_type.as_bytes());
        out.extend_from_slice(self.payload);
        out.extend_from_slice(&trailer);
    }
}

/// Assemble a canonical stream: PNG signature followed by each chunk with its CRC
pub fn encode_canonical_stream<'p, I>(chunks: I) -> Vec<u8>
where
    I: IntoIterator<Item = (ChunkType, &'p [u8])>,
{
    let mut out = PNG_MAGIC.to_vec();
    for (chunk_type, payload) in chunks {
        let crc = chunk_crc(&chunk_type, payload);
        let chunk = Chunk {
            offset: out.len(),
            chunk_type,
            payload,
            crc,
            stored_trailer: crc,
        };
        chunk.write_canonical(&mut out);
    }
    out
}
