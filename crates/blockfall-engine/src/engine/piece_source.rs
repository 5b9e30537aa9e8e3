use std::{fmt, str::FromStr};

use rand::{Rng, SeedableRng as _, distr::StandardUniform, prelude::Distribution};
use rand_pcg::Pcg32;

use crate::core::PieceKind;

/// Supplies the kind of every newly spawned piece.
///
/// The game engine asks for one kind per spawn, including the very first
/// piece of each game.
pub trait PieceSource {
    fn next_piece(&mut self) -> PieceKind;
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value used to initialize the random number generator of
/// [`RandomPieces`]. The same seed always yields the same piece sequence.
///
/// Seeds are written and parsed as 32 hexadecimal digits.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, PieceSource as _, RandomPieces};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
///
/// let mut a = RandomPieces::with_seed(seed);
/// let mut b = RandomPieces::with_seed(seed);
/// for _ in 0..20 {
///     assert_eq!(a.next_piece(), b.next_piece());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when a [`PieceSeed`] cannot be parsed.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len} characters")]
    InvalidLength { len: usize },
    #[display("invalid seed: {found:?} at position {index} is not a hex digit")]
    InvalidDigit { index: usize, found: char },
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength { len: s.len() });
        }
        let num = s.chars().enumerate().try_fold(0_u128, |acc, (index, found)| {
            let digit = found
                .to_digit(16)
                .ok_or(ParsePieceSeedError::InvalidDigit { index, found })?;
            Ok::<_, ParsePieceSeedError>((acc << 4) | u128::from(digit))
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Independent uniform draws over the seven kinds.
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: Pcg32,
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieces {
    /// Creates a source with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceSource for RandomPieces {
    fn next_piece(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Replays a fixed list of kinds, starting over at the end.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, PieceSequence, PieceSource as _};
///
/// let mut source = PieceSequence::new([PieceKind::I, PieceKind::O]);
/// assert_eq!(source.next_piece(), PieceKind::I);
/// assert_eq!(source.next_piece(), PieceKind::O);
/// assert_eq!(source.next_piece(), PieceKind::I);
/// ```
#[derive(Debug, Clone)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl PieceSequence {
    /// Creates a sequence over `kinds`.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, next: 0 }
    }

    /// Parses a sequence such as `"IOTSZJL"`.
    ///
    /// Returns `None` if the string is empty or holds a character that is
    /// not a piece kind.
    #[must_use]
    pub fn from_chars(chars: &str) -> Option<Self> {
        let kinds = chars
            .chars()
            .map(PieceKind::from_char)
            .collect::<Option<Vec<_>>>()?;
        (!kinds.is_empty()).then(|| Self::new(kinds))
    }
}

impl PieceSource for PieceSequence {
    fn next_piece(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}
