pub mod info;
pub mod shuffle;
pub mod unshuffle;

pub use info::*;
pub use shuffle::*;
pub use unshuffle::*;

use std::path::{Path, PathBuf};

/// `dir/name.png` becomes `dir/name.<tag>.png`
pub fn default_output_path(input: &Path, tag: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}.{}.png", stem, tag))
}
