use crate::collect::{collect_chunks, CollectMode};
use crate::error::Result;
use crate::header::{check_magic, ChunkType, PNG_MAGIC};
use crate::reader::ByteReader;
use serde::Serialize;

/// Which layout a stream is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamForm {
    Canonical,
    Shuffled,
}

impl StreamForm {
    pub fn collect_mode(&self) -> CollectMode {
        match self {
            StreamForm::Canonical => CollectMode::Canonical,
            StreamForm::Shuffled => CollectMode::Positional,
        }
    }
}

/// One row of an inspection report, in canonical order
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    pub position: usize,
    pub offset: usize,
    pub chunk_type: ChunkType,
    pub length: u32,
    /// Trailer as found in the stream, hex encoded
    pub trailer: String,
    /// `None` when the trailer holds a position rather than a CRC
    pub crc_valid: Option<bool>,
    pub known: bool,
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub form: StreamForm,
    pub total_bytes: usize,
    pub chunks: Vec<ChunkSummary>,
}

impl StreamReport {
    /// Chunks whose stored trailer should be a CRC but is not
    pub fn invalid_crcs(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.crc_valid == Some(false))
            .count()
    }
}

/// Guess the form from the first chunk: a shuffled stream always opens with IEND
pub fn detect_form(data: &[u8]) -> Result<StreamForm> {
    check_magic(data)?;
    let mut reader = ByteReader::starting_at(data, PNG_MAGIC.len());
    if reader.is_at_end() {
        return Ok(StreamForm::Canonical);
    }
    reader.read_u32()?;
    let first = ChunkType(reader.read_array::<4>()?);
    Ok(if first == ChunkType::IEND {
        StreamForm::Shuffled
    } else {
        StreamForm::Canonical
    })
}

/// Parse a canonical or shuffled stream and describe every chunk.
///
/// CRC mismatches are reported, not rejected; structural errors
/// (truncation, inconsistent positions) still fail.
pub fn inspect(data: &[u8]) -> Result<StreamReport> {
    let form = detect_form(data)?;
    let arena = collect_chunks(data, form.collect_mode())?;
    let last = arena.len().saturating_sub(1);

    let chunks = arena
        .iter()
        .enumerate()
        .map(|(position, chunk)| {
            let trailer_is_crc =
                form == StreamForm::Canonical || position == 0 || position == last;
            ChunkSummary {
                position,
                offset: chunk.offset,
                chunk_type: chunk.chunk_type,
                length: chunk.length(),
                trailer: hex::encode(chunk.stored_trailer),
                crc_valid: trailer_is_crc.then(|| chunk.stored_trailer_is_crc()),
                known: chunk.chunk_type.is_known(),
                critical: chunk.chunk_type.is_critical(),
            }
        })
        .collect();

    Ok(StreamReport {
        form,
        total_bytes: data.len(),
        chunks,
    })
}
