//! Hexagram identity and the static 64-entry table.
//!
//! A [`Pattern`] is the canonical identity of a hexagram: six polarities,
//! bottom line first. Its string form puts position 0 leftmost, so the
//! pattern of 复 (one yang line at the bottom) is `"100000"`.

mod judgment;
mod table;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::line::{LINE_COUNT, Line, Polarity};
use crate::trigram::Trigram;

use judgment::JUDGMENTS;
use table::{BY_PATTERN, HEXAGRAMS};

/// Six line polarities packed into the low six bits (bit 0 = bottom line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pattern(u8);

impl Pattern {
    /// Build a pattern from raw bits; anything above bit 5 is dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11_1111)
    }

    /// The raw bits (0..64).
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The pattern of a cast, bottom line first.
    pub fn from_lines(lines: &[Line; LINE_COUNT]) -> Self {
        let bits = lines
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, line)| acc | (line.polarity().bit() << i));
        Self(bits)
    }

    /// Parse the canonical 6-character `0`/`1` string.
    pub fn parse(s: &str) -> CoreResult<Self> {
        if s.chars().count() != LINE_COUNT {
            return Err(CoreError::InvalidEncoding(s.to_string()));
        }
        let mut bits = 0u8;
        for (i, c) in s.chars().enumerate() {
            match c {
                '1' => bits |= 1 << i,
                '0' => {}
                _ => return Err(CoreError::InvalidEncoding(s.to_string())),
            }
        }
        Ok(Self(bits))
    }

    /// Polarity at a position (0 = bottom). Positions past the top read as yin.
    pub fn polarity(self, position: usize) -> Polarity {
        Polarity::from_bit(position < LINE_COUNT && self.0 & (1 << position) != 0)
    }

    /// All six polarities, bottom first.
    pub fn polarities(self) -> [Polarity; LINE_COUNT] {
        std::array::from_fn(|i| self.polarity(i))
    }

    /// The lower trigram (lines 0-2).
    pub fn lower(self) -> Trigram {
        Trigram::from_bits(self.0 & 0b111)
    }

    /// The upper trigram (lines 3-5).
    pub fn upper(self) -> Trigram {
        Trigram::from_bits(self.0 >> 3)
    }

    /// The pattern formed by stacking `upper` over `lower`.
    pub fn from_trigrams(lower: Trigram, upper: Trigram) -> Self {
        Self(lower.bits() | (upper.bits() << 3))
    }

    /// Every pattern, in bit order.
    pub fn all() -> impl Iterator<Item = Pattern> {
        (0u8..64).map(Self)
    }

    /// The canonical string encoding.
    pub fn encode(self) -> String {
        (0..LINE_COUNT)
            .map(|i| match self.polarity(i) {
                Polarity::Yang => '1',
                Polarity::Yin => '0',
            })
            .collect()
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.encode()
    }
}

impl TryFrom<String> for Pattern {
    type Error = CoreError;

    fn try_from(s: String) -> CoreResult<Self> {
        Self::parse(&s)
    }
}

/// One entry of the hexagram table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hexagram {
    /// King Wen sequence number (1-64).
    pub number: u8,
    /// Line pattern, bottom first.
    pub pattern: Pattern,
    /// Full compound name, upper image then lower image then short name (地雷复).
    pub name: &'static str,
    /// Single-word name (复).
    pub short_name: &'static str,
    /// Pinyin of the short name.
    pub pinyin: &'static str,
    /// Conventional English title.
    pub english: &'static str,
}

impl Hexagram {
    /// The lower trigram.
    pub fn lower(&self) -> Trigram {
        self.pattern.lower()
    }

    /// The upper trigram.
    pub fn upper(&self) -> Trigram {
        self.pattern.upper()
    }

    /// The judgment text (卦辞) without the leading name.
    pub fn judgment(&self) -> &'static str {
        JUDGMENTS[usize::from(self.number) - 1]
    }

    /// The judgment as traditionally quoted, e.g. "复：亨。出入无疾，...".
    pub fn guaci(&self) -> String {
        format!("{}：{}", self.short_name, self.judgment())
    }
}

impl std::fmt::Display for Hexagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} ({}, {})",
            self.number, self.name, self.pinyin, self.english
        )
    }
}

/// Look up the hexagram for a pattern. Total over all 64 patterns.
pub fn lookup(pattern: Pattern) -> &'static Hexagram {
    &HEXAGRAMS[BY_PATTERN[pattern.bits() as usize] as usize]
}

/// Look up a hexagram by its canonical string encoding.
pub fn lookup_encoding(encoding: &str) -> CoreResult<&'static Hexagram> {
    Pattern::parse(encoding).map(lookup)
}

/// Look up a hexagram by King Wen number.
pub fn by_number(number: u32) -> CoreResult<&'static Hexagram> {
    match number {
        1..=64 => Ok(&HEXAGRAMS[number as usize - 1]),
        _ => Err(CoreError::UnknownHexagramNumber(number)),
    }
}

/// The whole table in King Wen order.
pub fn all() -> &'static [Hexagram] {
    &HEXAGRAMS
}

/// Case-insensitive search across every name form.
pub fn search(query: &str) -> Vec<&'static Hexagram> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    HEXAGRAMS
        .iter()
        .filter(|h| {
            h.name.contains(&needle)
                || h.short_name.contains(&needle)
                || h.pinyin.to_lowercase().contains(&needle)
                || h.english.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn every_hexagram_has_a_judgment() {
        for hexagram in all() {
            assert!(hexagram.judgment().ends_with('。'), "#{}", hexagram.number);
        }
        assert_eq!(by_number(1).unwrap().guaci(), "乾：元亨，利贞。");
        assert_eq!(by_number(14).unwrap().judgment(), "元亨。");
        assert!(by_number(24).unwrap().judgment().contains("七日来复"));
    }

    #[test]
    fn lookup_is_total_and_numbers_unique() {
        let mut numbers = HashSet::new();
        for pattern in Pattern::all() {
            let hexagram = lookup(pattern);
            assert_eq!(hexagram.pattern, pattern);
            assert!(!hexagram.name.is_empty());
            assert!((1..=64).contains(&hexagram.number));
            assert!(numbers.insert(hexagram.number), "duplicate #{}", hexagram.number);
        }
        assert_eq!(numbers.len(), 64);
    }

    #[test]
    fn every_encoding_string_resolves() {
        for bits in 0u8..64 {
            let encoding: String = (0..6)
                .map(|i| if bits & (1 << i) != 0 { '1' } else { '0' })
                .collect();
            let hexagram = lookup_encoding(&encoding).unwrap();
            assert_eq!(hexagram.pattern.encode(), encoding);
        }
    }

    #[test]
    fn pure_hexagrams() {
        assert_eq!(lookup_encoding("111111").unwrap().number, 1);
        assert_eq!(lookup_encoding("000000").unwrap().number, 2);
        assert_eq!(lookup_encoding("111111").unwrap().name, "乾为天");
        assert_eq!(lookup_encoding("000000").unwrap().name, "坤为地");
    }

    #[test]
    fn encoding_is_bottom_first() {
        // 复: yang at the bottom; 剥: yang at the top.
        assert_eq!(lookup_encoding("100000").unwrap().short_name, "复");
        assert_eq!(lookup_encoding("000001").unwrap().short_name, "剥");
        // 泰: heaven below earth.
        let tai = lookup_encoding("111000").unwrap();
        assert_eq!(tai.number, 11);
        assert_eq!(tai.lower(), Trigram::Qian);
        assert_eq!(tai.upper(), Trigram::Kun);
    }

    #[test]
    fn compound_names_follow_trigram_images() {
        for h in all() {
            if h.upper() == h.lower() {
                assert_eq!(h.name, format!("{}为{}", h.upper().name(), h.upper().image()));
            } else {
                assert_eq!(
                    h.name,
                    format!("{}{}{}", h.upper().image(), h.lower().image(), h.short_name)
                );
            }
        }
    }

    #[test]
    fn by_number_matches_table_order() {
        for n in 1..=64u32 {
            assert_eq!(u32::from(by_number(n).unwrap().number), n);
        }
        assert_eq!(by_number(0), Err(CoreError::UnknownHexagramNumber(0)));
        assert_eq!(by_number(65), Err(CoreError::UnknownHexagramNumber(65)));
    }

    #[test]
    fn malformed_encodings_rejected() {
        for bad in [
            "", "10101", "1010101", "10201x", "abcdef", " 111111", "111111 ", " 11111",
        ] {
            assert!(matches!(
                lookup_encoding(bad),
                Err(CoreError::InvalidEncoding(_))
            ));
        }
    }

    #[test]
    fn trigrams_recompose_pattern() {
        for pattern in Pattern::all() {
            assert_eq!(
                Pattern::from_trigrams(pattern.lower(), pattern.upper()),
                pattern
            );
        }
    }

    #[test]
    fn search_by_name_forms() {
        assert_eq!(search("return")[0].number, 24);
        assert_eq!(search("复")[0].number, 24);
        assert!(search("wei ji").iter().any(|h| h.number == 64));
        assert!(search("   ").is_empty());
        assert!(search("zzz").is_empty());
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(lookup_encoding("100000").unwrap().to_string(), @"#24 地雷复 (Fu, Return)");
    }

    #[test]
    fn pattern_serializes_as_encoding() {
        let pattern = Pattern::parse("110100").unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "\"110100\"");
        let back: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
    }

    proptest! {
        #[test]
        fn encode_lookup_decode_round_trip(bits in 0u8..64) {
            let pattern = Pattern::from_bits(bits);
            let hexagram = lookup(pattern);
            let reparsed = Pattern::parse(&hexagram.pattern.encode()).unwrap();
            prop_assert_eq!(reparsed, pattern);
            prop_assert_eq!(reparsed.polarities(), pattern.polarities());
        }
    }
}
