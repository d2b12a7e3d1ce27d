use crate::error::Result;
use crate::pipeline::unshuffle;
use std::path::Path;

/// Restore a shuffled PNG file into `output_path`.
/// Returns the number of bytes written.
pub fn unshuffle_file(input_path: &Path, output_path: &Path) -> Result<usize> {
    let data = std::fs::read(input_path)?;
    tracing::debug!(input = %input_path.display(), bytes = data.len(), "read input");

    let restored = unshuffle(&data)?;
    std::fs::write(output_path, &restored)?;

    Ok(restored.len())
}
