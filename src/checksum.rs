use crate::header::ChunkType;
use crc32fast::Hasher;

/// CRC-32 (IEEE, reflected) of `data` as 4 big-endian bytes
pub fn crc32_bytes(data: &[u8]) -> [u8; 4] {
    crc32fast::hash(data).to_be_bytes()
}

/// CRC of a chunk, computed over `type ++ payload` as the PNG format defines it
pub fn chunk_crc(chunk_type: &ChunkType, payload: &[u8]) -> [u8; 4] {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(payload);
    hasher.finalize().to_be_bytes()
}
