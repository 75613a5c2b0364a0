//! Random identifier spaces for session tokens and room ids.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where random identifiers are drawn from.
///
/// The space matters in two ways: a small space is easy to type (room
/// ids get read aloud to a friend) but easy to guess and quick to fill;
/// a wide space is neither.
///
/// ```text
/// Decimal { upper: 1_000_000 }  →  "48213"
/// Hex128                        →  "9f86d081884c7d659a2feaa0c55ad015"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdSpace {
    /// A uniform integer in `0..upper`, rendered in decimal without
    /// padding. `upper = 0` is treated as 1.
    Decimal { upper: u32 },

    /// 128 random bits rendered as 32 lowercase hex characters.
    Hex128,
}

impl IdSpace {
    /// The six-digit space browsers have always been handed.
    pub const SIX_DIGIT: IdSpace = IdSpace::Decimal { upper: 1_000_000 };

    /// Draws an identifier using the thread-local RNG.
    pub fn draw(&self) -> String {
        self.draw_with(&mut rand::rng())
    }

    /// Draws an identifier from the given RNG.
    ///
    /// Split out from [`draw`](Self::draw) so tests can pass a seeded RNG.
    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match *self {
            Self::Decimal { upper } => {
                rng.random_range(0..upper.max(1)).to_string()
            }
            Self::Hex128 => {
                let bytes: [u8; 16] = rng.random();
                bytes.iter().map(|b| format!("{b:02x}")).collect()
            }
        }
    }

    /// Number of distinct identifiers, or `None` when the space is too
    /// large to ever fill.
    pub fn capacity(&self) -> Option<u64> {
        match *self {
            Self::Decimal { upper } => Some(u64::from(upper.max(1))),
            Self::Hex128 => None,
        }
    }
}

impl Default for IdSpace {
    fn default() -> Self {
        Self::Hex128
    }
}
