use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{PieceId, PieceKind, Tetromino};

/// Hands out monotonically increasing [`PieceId`]s.
#[derive(Debug, Clone, Default)]
pub struct PieceIdGenerator {
    next: u32,
}

impl PieceIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> PieceId {
        let id = PieceId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Creates new pieces at the spawn position.
///
/// Kinds are drawn uniformly from the seven tetrominoes. Two factories built
/// from the same [`PieceSeed`] produce the same sequence.
///
/// # Example
///
/// ```
/// use roundris_engine::engine::{PieceFactory, PieceSeed};
///
/// let seed = PieceSeed::from(42);
/// let mut a = PieceFactory::with_seed(seed);
/// let mut b = PieceFactory::with_seed(seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.create().kind(), b.create().kind());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: Pcg32,
    ids: PieceIdGenerator,
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceFactory {
    /// Creates a factory with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            ids: PieceIdGenerator::new(),
        }
    }

    /// Draws a random kind and returns a fresh piece at the spawn position.
    pub fn create(&mut self) -> Tetromino {
        let kind: PieceKind = self.rng.random();
        Tetromino::new(self.ids.next_id(), kind)
    }
}

/// Seed for deterministic piece generation.
///
/// Serialized as a 32 digit hex string. Small integers convert with
/// [`From<u64>`], which is handy for command line flags and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed {input:?}: expected up to 32 hex digits")]
pub struct ParsePieceSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 32 {
            return Err(ParsePieceSeedError { input: s.into() });
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|_| ParsePieceSeedError { input: s.into() })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PIECE_SPAWN_X, PIECE_SPAWN_Y};

    #[test]
    fn test_ids_are_monotonic() {
        let mut factory = PieceFactory::with_seed(PieceSeed::from(1));
        let ids: Vec<_> = (0..5).map(|_| factory.create().id().get()).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pieces_spawn_at_spawn_position() {
        let mut factory = PieceFactory::with_seed(PieceSeed::from(7));
        for _ in 0..20 {
            let piece = factory.create();
            assert_eq!((piece.x(), piece.y()), (PIECE_SPAWN_X, PIECE_SPAWN_Y));
            assert_eq!(piece.rotation(), 0);
            assert_eq!(*piece.shape(), piece.kind().shape());
        }
    }

    #[test]
    fn test_all_kinds_appear() {
        let mut factory = PieceFactory::with_seed(PieceSeed::from(3));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[usize::from(factory.create().kind().code() - 1)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_seed_text_round_trip() {
        let seed = PieceSeed::from(0xdead_beef);
        let text = seed.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.ends_with("deadbeef"));
        assert_eq!(text.parse::<PieceSeed>(), Ok(seed));
        assert_eq!("ff".parse::<PieceSeed>(), Ok(PieceSeed::from(255)));
        assert!("xyz".parse::<PieceSeed>().is_err());
        assert!("".parse::<PieceSeed>().is_err());
    }

    #[test]
    fn test_seed_json() {
        let seed = PieceSeed::from(10);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, format!("\"{seed}\""));
        let parsed: PieceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, seed);
    }
}
