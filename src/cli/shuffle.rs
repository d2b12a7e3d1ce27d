use crate::error::Result;
use crate::pipeline::{shuffle, Seed};
use std::path::Path;

/// Options for the shuffle command
#[derive(Debug, Clone, Default)]
pub struct ShuffleOptions {
    /// `None` draws a fresh permutation every run
    pub seed: Option<Seed>,
}

/// Shuffle a PNG file's chunks into `output_path`.
/// Returns the number of bytes written.
pub fn shuffle_file(input_path: &Path, output_path: &Path, options: &ShuffleOptions) -> Result<usize> {
    let data = std::fs::read(input_path)?;
    tracing::debug!(input = %input_path.display(), bytes = data.len(), "read input");

    // Nothing is written unless the whole transform succeeds
    let shuffled = shuffle(&data, options.seed.as_ref())?;
    std::fs::write(output_path, &shuffled)?;

    Ok(shuffled.len())
}
