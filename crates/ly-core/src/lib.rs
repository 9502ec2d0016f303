//! Core divination engine for Liuyao.
//!
//! Provides line values and their polarity, the eight trigrams, the static
//! 64-hexagram table, the three-coin line generator, and the resolver that
//! derives the original and transformed hexagrams from a cast. Everything
//! here is pure: no I/O, no clocks beyond record timestamps, no shared
//! mutable state.

pub mod error;
pub mod hexagram;
pub mod line;
pub mod record;
pub mod resolve;
pub mod toss;
pub mod trigram;

pub use error::{CoreError, CoreResult};
pub use hexagram::{Hexagram, Pattern};
pub use line::{LINE_COUNT, Line, Polarity};
pub use record::{Category, DivinationRecord, Method, Origin};
pub use resolve::{Lines, Resolution, Transformed, identify, identify_values, resolve, transform};
pub use toss::{Coin, CoinSource, FixedCoins, Toss, toss};
pub use trigram::Trigram;
