use crate::checksum::chunk_crc;
use crate::chunk::Chunk;
use crate::error::{PngShuffleError, Result};
use crate::header::{ChunkType, PNG_MAGIC};
use crate::reader::ByteReader;
use serde::Serialize;

/// How the trailer of each chunk is interpreted during collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectMode {
    /// Stream order is canonical order; trailers are stored CRCs
    #[default]
    Canonical,
    /// Trailers carry each chunk's canonical position; CRCs are recomputed.
    /// The first chunk (IEND) and last chunk (IHDR) are pinned and keep CRCs.
    Positional,
}

/// Chunks indexed densely by canonical position
#[derive(Debug, Clone, Default)]
pub struct ChunkArena<'a> {
    chunks: Vec<Chunk<'a>>,
}

impl<'a> ChunkArena<'a> {
    /// Build an arena from `(position, chunk)` pairs.
    ///
    /// Positions must cover `0..entries.len()` exactly once; anything out of
    /// range or repeated is reported against the offending chunk's offset.
    pub fn from_positioned(entries: Vec<(u32, Chunk<'a>)>) -> Result<Self> {
        let count = entries.len();
        let mut slots: Vec<Option<Chunk<'a>>> = (0..count).map(|_| None).collect();

        for (position, chunk) in entries {
            let index = position as usize;
            if index >= count {
                return Err(PngShuffleError::InconsistentPositions {
                    offset: chunk.offset,
                    position,
                    reason: format!("stream holds {} chunks, positions must be below that", count),
                });
            }
            if let Some(existing) = &slots[index] {
                return Err(PngShuffleError::InconsistentPositions {
                    offset: chunk.offset,
                    position,
                    reason: format!("position already taken by chunk at byte {}", existing.offset),
                });
            }
            slots[index] = Some(chunk);
        }

        // Every position is in range and unique, so every slot is filled
        let chunks = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| PngShuffleError::InconsistentPositions {
                offset: PNG_MAGIC.len(),
                position: 0,
                reason: "gap in chunk positions".into(),
            })?;

        Ok(Self { chunks })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Chunk<'a>> {
        self.chunks.get(position)
    }

    /// Chunks in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk<'a>> {
        self.chunks.iter()
    }

    pub fn into_vec(self) -> Vec<Chunk<'a>> {
        self.chunks
    }

    /// Check that IHDR sits at position 0 and IEND at the last position
    pub fn check_pinned(&self) -> Result<()> {
        self.split_pinned().map(|_| ())
    }

    /// Split into `(header, permutable chunks, terminator)` after checking
    /// that the boundaries hold IHDR and IEND.
    pub fn split_pinned(&self) -> Result<(&Chunk<'a>, &[Chunk<'a>], &Chunk<'a>)> {
        match self.chunks.as_slice() {
            [header, middle @ .., terminator] => {
                expect_type(header, ChunkType::IHDR, "first")?;
                expect_type(terminator, ChunkType::IEND, "last")?;
                Ok((header, middle, terminator))
            }
            _ => Err(PngShuffleError::InvalidFormat {
                offset: PNG_MAGIC.len(),
                reason: format!(
                    "stream holds {} chunks, at least IHDR and IEND are required",
                    self.chunks.len()
                ),
            }),
        }
    }
}

fn expect_type(chunk: &Chunk<'_>, expected: ChunkType, place: &str) -> Result<()> {
    if chunk.chunk_type != expected {
        return Err(PngShuffleError::InvalidFormat {
            offset: chunk.offset,
            reason: format!(
                "{} chunk must be {}, found {}",
                place, expected, chunk.chunk_type
            ),
        });
    }
    Ok(())
}

/// Parse every chunk after the PNG signature.
///
/// The signature itself must already have been checked. Parsing stops only
/// when the cursor lands exactly on the end of `data`; a length that runs
/// past the end is a [`PngShuffleError::TruncatedStream`].
pub fn collect_chunks(data: &[u8], mode: CollectMode) -> Result<ChunkArena<'_>> {
    let mut reader = ByteReader::starting_at(data, PNG_MAGIC.len());
    let mut entries: Vec<(u32, Chunk<'_>)> = Vec::new();

    while !reader.is_at_end() {
        let offset = reader.position();
        let length = reader.read_u32()? as usize;
        let chunk_type = ChunkType(reader.read_array::<4>()?);
        let payload = reader.read(length)?;

        let (position, crc, stored_trailer) = match mode {
            CollectMode::Canonical => {
                let trailer = reader.read_array::<4>()?;
                let position = u32::try_from(entries.len()).map_err(|_| {
                    PngShuffleError::InconsistentPositions {
                        offset,
                        position: u32::MAX,
                        reason: "too many chunks to number with a u32".into(),
                    }
                })?;
                (position, trailer, trailer)
            }
            CollectMode::Positional => {
                let position = reader.read_u32()?;
                (
                    position,
                    chunk_crc(&chunk_type, payload),
                    position.to_be_bytes(),
                )
            }
        };

        entries.push((
            position,
            Chunk {
                offset,
                chunk_type,
                payload,
                crc,
                stored_trailer,
            },
        ));
    }

    if mode == CollectMode::Positional {
        pin_boundary_chunks(&mut entries)?;
    }

    for (position, chunk) in &entries {
        tracing::debug!(
            chunk_type = %chunk.chunk_type,
            position = *position,
            length = chunk.length(),
            trailer = %hex::encode(chunk.stored_trailer),
            "collected chunk"
        );
    }

    ChunkArena::from_positioned(entries)
}

/// Assign canonical positions to the pinned chunks of a shuffled stream:
/// physically first must be IEND (last position), physically last must be
/// IHDR (position 0). Their stored trailers are CRCs, not positions.
fn pin_boundary_chunks(entries: &mut [(u32, Chunk<'_>)]) -> Result<()> {
    let count = entries.len();
    if count < 2 {
        return Err(PngShuffleError::InvalidFormat {
            offset: PNG_MAGIC.len(),
            reason: format!(
                "shuffled stream holds {} chunks, at least IEND and IHDR are required",
                count
            ),
        });
    }
    let last_position = u32::try_from(count - 1).map_err(|_| {
        PngShuffleError::InconsistentPositions {
            offset: PNG_MAGIC.len(),
            position: u32::MAX,
            reason: "too many chunks to number with a u32".into(),
        }
    })?;

    expect_type(&entries[0].1, ChunkType::IEND, "first")?;
    expect_type(&entries[count - 1].1, ChunkType::IHDR, "last")?;
    entries[0].0 = last_position;
    entries[count - 1].0 = 0;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::encode_canonical_stream;

    fn minimal_png() -> Vec<u8> {
        encode_canonical_stream([
            (ChunkType::IHDR, &b""[..]),
            (ChunkType(*b"IDAT"), &[1u8, 2, 3][..]),
            (ChunkType::IEND, &b""[..]),
        ])
    }

    /// Hand-assemble a chunk with an arbitrary trailer
    fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8], trailer: [u8; 4]) {
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(payload);
        out.extend_from_slice(&trailer);
    }

    #[test]
    fn test_canonical_collection_uses_stream_order() {
        let data = minimal_png();
        let arena = collect_chunks(&data, CollectMode::Canonical).unwrap();

        assert_eq!(arena.len(), 3);
        let types: Vec<ChunkType> = arena.iter().map(|c| c.chunk_type).collect();
        assert_eq!(types, vec![ChunkType::IHDR, ChunkType(*b"IDAT"), ChunkType::IEND]);
        assert!(arena.iter().all(|c| c.crc_is_valid()));
        assert_eq!(arena.get(1).unwrap().payload, &[1, 2, 3]);
        assert_eq!(arena.get(0).unwrap().offset, 8);
        arena.check_pinned().unwrap();
    }

    #[test]
    fn test_canonical_collection_keeps_stored_trailer() {
        let mut data = PNG_MAGIC.to_vec();
        push_chunk(&mut data, b"IHDR", &[], [0xDE, 0xAD, 0xBE, 0xEF]);

        let arena = collect_chunks(&data, CollectMode::Canonical).unwrap();
        let chunk = arena.get(0).unwrap();
        assert_eq!(chunk.crc, [0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(!chunk.crc_is_valid());
    }

    #[test]
    fn test_empty_body_collects_nothing() {
        let arena = collect_chunks(&PNG_MAGIC, CollectMode::Canonical).unwrap();
        assert!(arena.is_empty());
        assert!(arena.check_pinned().is_err());
    }

    #[test]
    fn test_positional_collection_orders_by_embedded_position() {
        let mut data = PNG_MAGIC.to_vec();
        push_chunk(&mut data, b"IEND", &[], [0xAE, 0x42, 0x60, 0x82]);
        push_chunk(&mut data, b"tEXt", b"second", 2u32.to_be_bytes());
        push_chunk(&mut data, b"IDAT", b"first", 1u32.to_be_bytes());
        push_chunk(&mut data, b"IHDR", &[7; 13], [0, 0, 0, 0]);

        let arena = collect_chunks(&data, CollectMode::Positional).unwrap();
        let types: Vec<String> = arena.iter().map(|c| c.chunk_type.to_string()).collect();
        assert_eq!(types, vec!["IHDR", "IDAT", "tEXt", "IEND"]);
        // CRCs are recomputed regardless of what was stored
        assert!(arena.iter().all(|c| c.crc_is_valid()));
        arena.check_pinned().unwrap();
    }

    #[test]
    fn test_positional_duplicate_position_rejected() {
        let mut data = PNG_MAGIC.to_vec();
        push_chunk(&mut data, b"IEND", &[], [0; 4]);
        push_chunk(&mut data, b"IDAT", b"a", 1u32.to_be_bytes());
        push_chunk(&mut data, b"IDAT", b"b", 1u32.to_be_bytes());
        push_chunk(&mut data, b"IHDR", &[], [0; 4]);

        let err = collect_chunks(&data, CollectMode::Positional).unwrap_err();
        match err {
            PngShuffleError::InconsistentPositions {
                position, reason, ..
            } => {
                assert_eq!(position, 1);
                assert!(reason.contains("already taken"));
            }
            other => panic!("expected InconsistentPositions, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_out_of_range_position_rejected() {
        let mut data = PNG_MAGIC.to_vec();
        push_chunk(&mut data, b"IEND", &[], [0; 4]);
        push_chunk(&mut data, b"IDAT", b"a", 9u32.to_be_bytes());
        push_chunk(&mut data, b"IHDR", &[], [0; 4]);

        let err = collect_chunks(&data, CollectMode::Positional).unwrap_err();
        assert!(matches!(
            err,
            PngShuffleError::InconsistentPositions {
                position: 9,
                offset: 20,
                ..
            }
        ));
    }

    #[test]
    fn test_positional_requires_pinned_boundaries() {
        // A canonical stream is not a valid shuffled stream
        let data = minimal_png();
        let err = collect_chunks(&data, CollectMode::Positional).unwrap_err();
        assert!(matches!(err, PngShuffleError::InvalidFormat { offset: 8, .. }));

        let mut single = PNG_MAGIC.to_vec();
        push_chunk(&mut single, b"IEND", &[], [0; 4]);
        assert!(collect_chunks(&single, CollectMode::Positional).is_err());
    }

    #[test]
    fn test_truncated_payload_detected() {
        let mut data = PNG_MAGIC.to_vec();
        data.extend_from_slice(&100u32.to_be_bytes());
        data.extend_from_slice(b"IDAT");
        data.extend_from_slice(&[0u8; 10]);

        let err = collect_chunks(&data, CollectMode::Canonical).unwrap_err();
        assert!(matches!(
            err,
            PngShuffleError::TruncatedStream {
                offset: 16,
                requested: 100,
                available: 10
            }
        ));
    }

    #[test]
    fn test_missing_trailer_detected() {
        let mut data = minimal_png();
        data.truncate(data.len() - 2);

        for mode in [CollectMode::Canonical, CollectMode::Positional] {
            assert!(matches!(
                collect_chunks(&data, mode),
                Err(PngShuffleError::TruncatedStream { requested: 4, available: 2, .. })
            ));
        }
    }

    #[test]
    fn test_arena_from_positioned_rejects_gaps() {
        let data = minimal_png();
        let arena = collect_chunks(&data, CollectMode::Canonical).unwrap();
        let chunks = arena.into_vec();

        let entries = vec![(0, chunks[0].clone()), (2, chunks[1].clone())];
        assert!(ChunkArena::from_positioned(entries).is_err());

        let entries = vec![(1, chunks[0].clone()), (0, chunks[1].clone())];
        let arena = ChunkArena::from_positioned(entries).unwrap();
        assert_eq!(arena.get(0).unwrap(), &chunks[1]);
    }
}
