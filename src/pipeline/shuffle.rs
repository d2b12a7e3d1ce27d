use crate::collect::{collect_chunks, CollectMode};
use crate::error::{PngShuffleError, Result};
use crate::header::{check_magic, PNG_MAGIC};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Seed for the chunk permutation.
///
/// The generator is not cryptographic and its output sequence is only
/// stable for a given build of this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Number(u64),
    /// Arbitrary text, hashed with SHA3-256 into a 32-byte generator seed
    Phrase(String),
}

impl Seed {
    /// Build a fresh generator for one shuffle call
    pub fn to_rng(&self) -> StdRng {
        match self {
            Seed::Number(n) => StdRng::seed_from_u64(*n),
            Seed::Phrase(phrase) => StdRng::from_seed(phrase_seed(phrase)),
        }
    }
}

fn phrase_seed(phrase: &str) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(phrase.as_bytes());
    hasher.finalize().into()
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl std::str::FromStr for Seed {
    type Err = PngShuffleError;
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PngShuffleError::InvalidSeed("seed must not be empty".into()));
        }
        Ok(match s.parse::<u64>() {
            Ok(n) => Seed::Number(n),
            Err(_) => Seed::Phrase(s.to_string()),
        })
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{}", n),
            Seed::Phrase(phrase) => f.write_str(phrase),
        }
    }
}

/// Shuffle the non-pinned chunks of a canonical PNG.
///
/// Without a seed the permutation is drawn from OS entropy and cannot be
/// reproduced; pass a seed when the same output is needed twice.
pub fn shuffle(data: &[u8], seed: Option<&Seed>) -> Result<Vec<u8>> {
    let mut rng = match seed {
        Some(seed) => seed.to_rng(),
        None => StdRng::from_entropy(),
    };
    shuffle_with_rng(data, &mut rng)
}

/// Shuffle using a caller-supplied generator.
///
/// Output layout: signature, IEND verbatim, every other chunk in permuted
/// order with its trailer replaced by its canonical position, IHDR verbatim.
pub fn shuffle_with_rng<R: Rng + ?Sized>(data: &[u8], rng: &mut R) -> Result<Vec<u8>> {
    check_magic(data)?;
    let arena = collect_chunks(data, CollectMode::Canonical)?;
    let (header, middle, terminator) = arena.split_pinned()?;

    // Position 0 is the header, so middle chunks start at 1. The collector
    // numbered every chunk with a u32, so these casts cannot truncate.
    let mut order: Vec<(u32, _)> = middle
        .iter()
        .enumerate()
        .map(|(i, chunk)| (i as u32 + 1, chunk))
        .collect();
    order.shuffle(rng);

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&PNG_MAGIC);
    terminator.write_canonical(&mut out);
    for (position, chunk) in &order {
        chunk.write_positional(&mut out, *position);
    }
    header.write_canonical(&mut out);

    tracing::info!(
        chunks = arena.len(),
        permuted = order.len(),
        bytes = out.len(),
        "shuffled PNG chunks"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::chunk_crc;
    use crate::chunk::encode_canonical_stream;
    use crate::header::ChunkType;
    use crate::pipeline::unshuffle;

    fn png_with_middle(count: usize) -> Vec<u8> {
        let payloads: Vec<Vec<u8>> = (0..count).map(|i| vec![i as u8; i % 5 + 1]).collect();
        let header = [0u8; 13];
        let mut chunks = vec![(ChunkType::IHDR, &header[..])];
        for payload in &payloads {
            chunks.push((ChunkType(*b"IDAT"), payload.as_slice()));
        }
        chunks.push((ChunkType::IEND, &b""[..]));
        encode_canonical_stream(chunks)
    }

    #[test]
    fn test_minimal_example() {
        let original = encode_canonical_stream([
            (ChunkType::IHDR, &b""[..]),
            (ChunkType(*b"IDAT"), &[1u8, 2, 3][..]),
            (ChunkType::IEND, &b""[..]),
        ]);

        let shuffled = shuffle(&original, Some(&Seed::Number(7))).unwrap();

        let mut expected = PNG_MAGIC.to_vec();
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(b"IEND");
        expected.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
        expected.extend_from_slice(&[0, 0, 0, 3]);
        expected.extend_from_slice(b"IDAT");
        expected.extend_from_slice(&[1, 2, 3]);
        expected.extend_from_slice(&[0, 0, 0, 1]);
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(b"IHDR");
        expected.extend_from_slice(&chunk_crc(&ChunkType::IHDR, &[]));
        assert_eq!(shuffled, expected);

        assert_eq!(unshuffle(&shuffled).unwrap(), original);
    }

    #[test]
    fn test_shuffle_unshuffle_roundtrip() {
        let original = png_with_middle(20);
        for seed in 0..10u64 {
            let shuffled = shuffle(&original, Some(&Seed::Number(seed))).unwrap();
            assert_eq!(shuffled.len(), original.len());
            assert_eq!(unshuffle(&shuffled).unwrap(), original);
        }
    }

    #[test]
    fn test_unseeded_roundtrip() {
        let original = png_with_middle(8);
        let shuffled = shuffle(&original, None).unwrap();
        assert_eq!(unshuffle(&shuffled).unwrap(), original);
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let original = png_with_middle(16);
        let seed = Seed::Number(42);

        let first = shuffle(&original, Some(&seed)).unwrap();
        let second = shuffle(&original, Some(&seed)).unwrap();
        assert_eq!(first, second);

        let phrase: Seed = "correct horse".parse().unwrap();
        assert_eq!(
            shuffle(&original, Some(&phrase)).unwrap(),
            shuffle(&original, Some(&phrase)).unwrap()
        );
    }

    #[test]
    fn test_shuffle_reorders() {
        let original = png_with_middle(32);
        // 32! orderings; two seeds landing on identity would be astronomically unlikely
        let a = shuffle(&original, Some(&Seed::Number(1))).unwrap();
        let b = shuffle(&original, Some(&Seed::Number(2))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pinned_chunks_swap_ends() {
        let original = png_with_middle(5);
        let shuffled = shuffle(&original, Some(&Seed::Number(3))).unwrap();

        assert_eq!(&shuffled[..8], &PNG_MAGIC);
        assert_eq!(&shuffled[12..16], b"IEND");
        // IHDR with its 13-byte payload closes the stream
        let ihdr_start = shuffled.len() - (12 + 13);
        assert_eq!(&shuffled[ihdr_start + 4..ihdr_start + 8], b"IHDR");
        assert_eq!(
            &shuffled[shuffled.len() - 4..],
            &chunk_crc(&ChunkType::IHDR, &[0u8; 13])
        );
    }

    #[test]
    fn test_only_pinned_chunks() {
        let original = png_with_middle(0);
        let shuffled = shuffle(&original, Some(&Seed::Number(0))).unwrap();
        assert_eq!(&shuffled[12..16], b"IEND");
        assert_eq!(unshuffle(&shuffled).unwrap(), original);
    }

    #[test]
    fn test_rejects_non_png() {
        let err = shuffle(b"not a png at all", Some(&Seed::Number(0))).unwrap_err();
        assert!(matches!(err, PngShuffleError::InvalidFormat { offset: 0, .. }));
    }

    #[test]
    fn test_rejects_missing_pinned_chunk() {
        let no_iend = encode_canonical_stream([
            (ChunkType::IHDR, &b""[..]),
            (ChunkType(*b"IDAT"), &[1u8][..]),
        ]);
        let err = shuffle(&no_iend, Some(&Seed::Number(0))).unwrap_err();
        assert!(matches!(err, PngShuffleError::InvalidFormat { offset: 20, .. }));
    }

    #[test]
    fn test_seed_parsing() {
        assert_eq!("123".parse::<Seed>().unwrap(), Seed::Number(123));
        assert_eq!(
            "pixels".parse::<Seed>().unwrap(),
            Seed::Phrase("pixels".into())
        );
        assert!(matches!(
            "".parse::<Seed>(),
            Err(PngShuffleError::InvalidSeed(_))
        ));
        assert_eq!(Seed::from(5).to_string(), "5");
    }
}
