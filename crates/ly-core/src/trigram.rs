//! The eight trigrams (bagua).
//!
//! A hexagram is two stacked trigrams: the lower one is lines 0-2 and the
//! upper one is lines 3-5. Trigram bits follow the hexagram convention,
//! bit 0 being the bottom line.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One of the eight three-line figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigram {
    /// ☰ Heaven.
    Qian,
    /// ☱ Lake.
    Dui,
    /// ☲ Fire.
    Li,
    /// ☳ Thunder.
    Zhen,
    /// ☴ Wind.
    Xun,
    /// ☵ Water.
    Kan,
    /// ☶ Mountain.
    Gen,
    /// ☷ Earth.
    Kun,
}

impl Trigram {
    /// All trigrams in the traditional Fu Xi order.
    pub const ALL: [Trigram; 8] = [
        Trigram::Qian,
        Trigram::Dui,
        Trigram::Li,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Kun,
    ];

    /// Build a trigram from its three bits (bit 0 = bottom line).
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b111 => Self::Qian,
            0b011 => Self::Dui,
            0b101 => Self::Li,
            0b001 => Self::Zhen,
            0b110 => Self::Xun,
            0b010 => Self::Kan,
            0b100 => Self::Gen,
            _ => Self::Kun,
        }
    }

    /// The three bits of this trigram (bit 0 = bottom line).
    pub fn bits(self) -> u8 {
        match self {
            Self::Qian => 0b111,
            Self::Dui => 0b011,
            Self::Li => 0b101,
            Self::Zhen => 0b001,
            Self::Xun => 0b110,
            Self::Kan => 0b010,
            Self::Gen => 0b100,
            Self::Kun => 0b000,
        }
    }

    /// Chinese name (乾, 兑, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Qian => "乾",
            Self::Dui => "兑",
            Self::Li => "离",
            Self::Zhen => "震",
            Self::Xun => "巽",
            Self::Kan => "坎",
            Self::Gen => "艮",
            Self::Kun => "坤",
        }
    }

    /// The natural image the trigram stands for (天, 泽, ...).
    pub fn image(self) -> &'static str {
        match self {
            Self::Qian => "天",
            Self::Dui => "泽",
            Self::Li => "火",
            Self::Zhen => "雷",
            Self::Xun => "风",
            Self::Kan => "水",
            Self::Gen => "山",
            Self::Kun => "地",
        }
    }

    /// English rendering of the image.
    pub fn english(self) -> &'static str {
        match self {
            Self::Qian => "Heaven",
            Self::Dui => "Lake",
            Self::Li => "Fire",
            Self::Zhen => "Thunder",
            Self::Xun => "Wind",
            Self::Kan => "Water",
            Self::Gen => "Mountain",
            Self::Kun => "Earth",
        }
    }

    /// Unicode trigram symbol.
    pub fn symbol(self) -> char {
        match self {
            Self::Qian => '☰',
            Self::Dui => '☱',
            Self::Li => '☲',
            Self::Zhen => '☳',
            Self::Xun => '☴',
            Self::Kan => '☵',
            Self::Gen => '☶',
            Self::Kun => '☷',
        }
    }

    /// Parse a trigram from its pinyin, English image, Chinese name or image.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| {
                format!("{t:?}").to_lowercase() == needle
                    || t.english().to_lowercase() == needle
                    || t.name() == needle
                    || t.image() == needle
            })
            .ok_or_else(|| CoreError::UnknownTrigram(s.to_string()))
    }
}

impl std::fmt::Display for Trigram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.symbol(), self.name(), self.image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        for t in Trigram::ALL {
            assert_eq!(Trigram::from_bits(t.bits()), t);
        }
    }

    #[test]
    fn all_bit_patterns_distinct() {
        let mut seen: Vec<u8> = Trigram::ALL.iter().map(|t| t.bits()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn thunder_has_yang_at_bottom() {
        assert_eq!(Trigram::Zhen.bits() & 1, 1);
        assert_eq!(Trigram::Gen.bits() & 0b100, 0b100);
    }

    #[test]
    fn parse_accepts_every_name_form() {
        assert_eq!(Trigram::parse("kan"), Ok(Trigram::Kan));
        assert_eq!(Trigram::parse("Water"), Ok(Trigram::Kan));
        assert_eq!(Trigram::parse("坎"), Ok(Trigram::Kan));
        assert_eq!(Trigram::parse("水"), Ok(Trigram::Kan));
        assert!(Trigram::parse("ocean").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Trigram::Qian.to_string(), "☰ 乾天");
    }
}
