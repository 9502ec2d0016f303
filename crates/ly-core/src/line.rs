//! Line (yao) values and their polarity.
//!
//! A cast line is one of four values inherited from the yarrow-stalk and
//! three-coin traditions: 6 (old yin), 7 (young yang), 8 (young yin) and
//! 9 (old yang). The "old" extremes are changing lines and flip into their
//! opposite in the transformed hexagram.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Number of lines in a hexagram.
pub const LINE_COUNT: usize = 6;

/// Solid (yang) or broken (yin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Broken line.
    Yin,
    /// Solid line.
    Yang,
}

impl Polarity {
    /// The bit used for this polarity in a hexagram pattern.
    pub fn bit(self) -> u8 {
        match self {
            Self::Yin => 0,
            Self::Yang => 1,
        }
    }

    /// The polarity encoded by a pattern bit.
    pub fn from_bit(set: bool) -> Self {
        if set { Self::Yang } else { Self::Yin }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yin => write!(f, "yin"),
            Self::Yang => write!(f, "yang"),
        }
    }
}

/// A single cast line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Line {
    /// 6: yin, changing into yang.
    OldYin,
    /// 7: yang, static.
    YoungYang,
    /// 8: yin, static.
    YoungYin,
    /// 9: yang, changing into yin.
    OldYang,
}

impl Line {
    /// All four line values in numeric order.
    pub const ALL: [Line; 4] = [
        Line::OldYin,
        Line::YoungYang,
        Line::YoungYin,
        Line::OldYang,
    ];

    /// The traditional numeric value (6-9).
    pub fn value(self) -> u8 {
        match self {
            Self::OldYin => 6,
            Self::YoungYang => 7,
            Self::YoungYin => 8,
            Self::OldYang => 9,
        }
    }

    /// Whether the line is solid or broken.
    ///
    /// This is the single place polarity is derived from a line value.
    pub fn polarity(self) -> Polarity {
        match self {
            Self::YoungYang | Self::OldYang => Polarity::Yang,
            Self::OldYin | Self::YoungYin => Polarity::Yin,
        }
    }

    /// Returns true for the old extremes (6 and 9).
    pub fn is_changing(self) -> bool {
        matches!(self, Self::OldYin | Self::OldYang)
    }

    /// The line as it appears in the transformed hexagram.
    ///
    /// Old yin and old yang swap; young lines are returned unchanged.
    pub fn changed(self) -> Self {
        match self {
            Self::OldYin => Self::OldYang,
            Self::OldYang => Self::OldYin,
            young => young,
        }
    }

    /// Text glyph for terminal display, with a mark on changing lines.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::OldYin => "━━━ ━━━ ×",
            Self::YoungYang => "━━━━━━━  ",
            Self::YoungYin => "━━━ ━━━  ",
            Self::OldYang => "━━━━━━━ ○",
        }
    }

    /// Traditional Chinese label (老阴, 少阳, 少阴, 老阳).
    pub fn label(self) -> &'static str {
        match self {
            Self::OldYin => "老阴",
            Self::YoungYang => "少阳",
            Self::YoungYin => "少阴",
            Self::OldYang => "老阳",
        }
    }
}

impl TryFrom<u8> for Line {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        match value {
            6 => Ok(Self::OldYin),
            7 => Ok(Self::YoungYang),
            8 => Ok(Self::YoungYin),
            9 => Ok(Self::OldYang),
            other => Err(CoreError::InvalidLineValue(other)),
        }
    }
}

impl From<Line> for u8 {
    fn from(line: Line) -> Self {
        line.value()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Name of a line position, counted from the bottom (初, 二, ... 上).
pub fn position_name(index: usize) -> &'static str {
    match index {
        0 => "初",
        1 => "二",
        2 => "三",
        3 => "四",
        4 => "五",
        5 => "上",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_through_u8() {
        for line in Line::ALL {
            assert_eq!(Line::try_from(line.value()), Ok(line));
        }
    }

    #[test]
    fn out_of_range_values_rejected() {
        for raw in [0, 1, 5, 10, 255] {
            assert_eq!(Line::try_from(raw), Err(CoreError::InvalidLineValue(raw)));
        }
    }

    #[test]
    fn only_extremes_change() {
        assert!(Line::OldYin.is_changing());
        assert!(Line::OldYang.is_changing());
        assert!(!Line::YoungYang.is_changing());
        assert!(!Line::YoungYin.is_changing());
    }

    #[test]
    fn polarity_of_each_value() {
        assert_eq!(Line::OldYin.polarity(), Polarity::Yin);
        assert_eq!(Line::YoungYin.polarity(), Polarity::Yin);
        assert_eq!(Line::YoungYang.polarity(), Polarity::Yang);
        assert_eq!(Line::OldYang.polarity(), Polarity::Yang);
    }

    #[test]
    fn changed_swaps_extremes_only() {
        assert_eq!(Line::OldYin.changed(), Line::OldYang);
        assert_eq!(Line::OldYang.changed(), Line::OldYin);
        assert_eq!(Line::YoungYang.changed(), Line::YoungYang);
        assert_eq!(Line::YoungYin.changed(), Line::YoungYin);
    }

    #[test]
    fn changed_is_involutive() {
        for line in Line::ALL {
            assert_eq!(line.changed().changed(), line);
        }
    }

    #[test]
    fn changing_lines_flip_polarity() {
        for line in Line::ALL.into_iter().filter(|l| l.is_changing()) {
            assert_ne!(line.changed().polarity(), line.polarity());
        }
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&[Line::OldYin, Line::OldYang]).unwrap();
        assert_eq!(json, "[6,9]");
        let back: Vec<Line> = serde_json::from_str("[7,8]").unwrap();
        assert_eq!(back, vec![Line::YoungYang, Line::YoungYin]);
        assert!(serde_json::from_str::<Line>("5").is_err());
    }

    #[test]
    fn position_names() {
        assert_eq!(position_name(0), "初");
        assert_eq!(position_name(5), "上");
    }
}
