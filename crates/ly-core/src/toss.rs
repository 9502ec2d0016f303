//! The three-coin method.
//!
//! Each line is cast by tossing three coins and counting heads. Heads is the
//! face that leans toward yin:
//!
//! | heads | line          |
//! |-------|---------------|
//! | 0     | 9, old yang   |
//! | 1     | 8, young yin  |
//! | 2     | 7, young yang |
//! | 3     | 6, old yin    |

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::line::Line;

/// Coins tossed per line.
pub const COINS_PER_TOSS: usize = 3;

/// One coin face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    /// Counts toward old yin.
    Heads,
    /// Counts toward old yang.
    Tails,
}

impl Coin {
    /// Parse a single `h`/`t` character.
    pub fn from_char(c: char) -> CoreResult<Self> {
        match c.to_ascii_lowercase() {
            'h' => Ok(Self::Heads),
            't' => Ok(Self::Tails),
            other => Err(CoreError::InvalidCoin(other)),
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heads => write!(f, "H"),
            Self::Tails => write!(f, "T"),
        }
    }
}

/// A supply of independent fair coin flips.
pub trait CoinSource {
    /// Flip one coin, or `None` if the source has run out.
    fn flip(&mut self) -> Option<Coin>;
}

impl CoinSource for StdRng {
    fn flip(&mut self) -> Option<Coin> {
        Some(if self.random_bool(0.5) {
            Coin::Heads
        } else {
            Coin::Tails
        })
    }
}

impl<S: CoinSource + ?Sized> CoinSource for &mut S {
    fn flip(&mut self) -> Option<Coin> {
        (**self).flip()
    }
}

/// A scripted, finite coin sequence.
#[derive(Debug, Clone, Default)]
pub struct FixedCoins {
    coins: VecDeque<Coin>,
}

impl FixedCoins {
    /// Script the given coins, consumed front to back.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Self {
        Self {
            coins: coins.into_iter().collect(),
        }
    }

    /// Parse a sequence of `h`/`t` letters. Whitespace, commas and `|` are ignored.
    pub fn parse(script: &str) -> CoreResult<Self> {
        let coins = script
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '|'))
            .map(Coin::from_char)
            .collect::<CoreResult<VecDeque<_>>>()?;
        Ok(Self { coins })
    }

    /// Coins not yet drawn.
    pub fn remaining(&self) -> usize {
        self.coins.len()
    }
}

impl CoinSource for FixedCoins {
    fn flip(&mut self) -> Option<Coin> {
        self.coins.pop_front()
    }
}

/// The outcome of tossing three coins for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    /// The three faces, in the order drawn.
    pub coins: [Coin; COINS_PER_TOSS],
    /// The line they produce.
    pub line: Line,
}

impl Toss {
    /// Number of heads among the three coins.
    pub fn heads(&self) -> usize {
        self.coins.iter().filter(|c| **c == Coin::Heads).count()
    }

    /// Whether the resulting line is a changing line.
    pub fn is_changing(&self) -> bool {
        self.line.is_changing()
    }
}

impl std::fmt::Display for Toss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.coins;
        write!(f, "{a}{b}{c} -> {}", self.line)
    }
}

/// Map a head count to its line value. Counts above three are rejected.
pub fn line_for_heads(heads: usize) -> CoreResult<Line> {
    match heads {
        0 => Ok(Line::OldYang),
        1 => Ok(Line::YoungYin),
        2 => Ok(Line::YoungYang),
        3 => Ok(Line::OldYin),
        _ => Err(CoreError::InvalidHeadCount(heads)),
    }
}

/// Toss three coins and classify the line.
///
/// Fails if the source runs dry partway; no partial toss is returned.
pub fn toss(source: &mut impl CoinSource) -> CoreResult<Toss> {
    let mut coins = [Coin::Tails; COINS_PER_TOSS];
    for (drawn, slot) in coins.iter_mut().enumerate() {
        *slot = source
            .flip()
            .ok_or(CoreError::CoinSourceExhausted { drawn })?;
    }
    let heads = coins.iter().filter(|c| **c == Coin::Heads).count();
    Ok(Toss {
        coins,
        line: line_for_heads(heads)?,
    })
}
