use crate::collect::{collect_chunks, CollectMode};
use crate::error::Result;
use crate::header::{check_magic, PNG_MAGIC};

/// Restore canonical chunk order from a shuffled PNG.
///
/// Positions embedded in the trailers decide the order, so the physical
/// order of the shuffled stream does not matter. Every CRC is recomputed.
pub fn unshuffle(data: &[u8]) -> Result<Vec<u8>> {
    check_magic(data)?;
    let arena = collect_chunks(data, CollectMode::Positional)?;

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&PNG_MAGIC);
    for chunk in arena.iter() {
        chunk.write_canonical(&mut out);
    }

    tracing::info!(
        chunks = arena.len(),
        bytes = out.len(),
        "restored canonical chunk order"
    );

    Ok(out)
}
