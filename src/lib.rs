//! pngshuffle - reversible PNG chunk shuffling
//!
//! Shuffling reorders every chunk between `IHDR` and `IEND` and stores each
//! chunk's original position in its CRC field. The stream stays byte-for-byte
//! recoverable even though most decoders will refuse to render it.
//!
//! ## Layout
//!
//! ```text
//! canonical: SIG | IHDR crc | c1 crc | c2 crc | ... | cN crc | IEND crc
//! shuffled:  SIG | IEND crc | cπ(1) pos | ... | cπ(N) pos | IHDR crc
//! ```
//!
//! - `IEND` moves to the front and `IHDR` to the back, both keeping their CRC
//! - every other chunk carries its canonical position as a big-endian `u32`
//! - unshuffling sorts by position and recomputes every CRC
//!
//! ## Example
//!
//! ```no_run
//! use pngshuffle::{shuffle, unshuffle, Seed};
//!
//! let original = std::fs::read("image.png").unwrap();
//! let shuffled = shuffle(&original, Some(&Seed::Number(7))).unwrap();
//! assert_eq!(unshuffle(&shuffled).unwrap(), original);
//! ```

pub mod checksum;
pub mod chunk;
pub mod cli;
pub mod collect;
pub mod error;
pub mod header;
pub mod inspect;
pub mod pipeline;
pub mod reader;

pub use chunk::Chunk;
pub use collect::{collect_chunks, ChunkArena, CollectMode};
pub use error::{PngShuffleError, Result};
pub use header::{ChunkType, PNG_MAGIC};
pub use pipeline::{shuffle, shuffle_with_rng, unshuffle, Seed};
