//! Turning six cast lines into the original and transformed hexagrams.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::hexagram::{self, Hexagram, Pattern};
use crate::line::{LINE_COUNT, Line};

/// Six lines, bottom first.
pub type Lines = [Line; LINE_COUNT];

/// Validate a slice of lines as a complete cast.
pub fn to_lines(lines: &[Line]) -> CoreResult<Lines> {
    lines
        .try_into()
        .map_err(|_| CoreError::WrongLineCount(lines.len()))
}

/// Validate raw numbers (6-9) as a complete cast.
pub fn lines_from_values(values: &[u8]) -> CoreResult<Lines> {
    let lines = values
        .iter()
        .map(|v| Line::try_from(*v))
        .collect::<CoreResult<Vec<_>>>()?;
    to_lines(&lines)
}

/// The hexagram formed by six lines.
pub fn identify(lines: &[Line]) -> CoreResult<&'static Hexagram> {
    let lines = to_lines(lines)?;
    Ok(hexagram::lookup(Pattern::from_lines(&lines)))
}

/// The hexagram formed by six raw line values.
pub fn identify_values(values: &[u8]) -> CoreResult<&'static Hexagram> {
    let lines = lines_from_values(values)?;
    Ok(hexagram::lookup(Pattern::from_lines(&lines)))
}

/// Flip every changing line; static lines pass through.
pub fn transform(lines: Lines) -> Lines {
    lines.map(Line::changed)
}

/// Positions (0 = bottom) of the changing lines, in ascending order.
pub fn changing_lines(lines: &Lines) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_changing())
        .map(|(i, _)| i)
        .collect()
}

/// The transformed half of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transformed {
    /// Lines after flipping.
    pub lines: Lines,
    /// The hexagram they form.
    pub hexagram: &'static Hexagram,
}

/// A fully resolved cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The cast lines, bottom first.
    pub lines: Lines,
    /// The original hexagram (本卦).
    pub original: &'static Hexagram,
    /// The transformed hexagram (变卦); `None` when no line is changing.
    pub transformed: Option<Transformed>,
    /// Changing positions, bottom first.
    pub changing: Vec<usize>,
}

impl Resolution {
    /// Whether any line is changing.
    pub fn has_changes(&self) -> bool {
        !self.changing.is_empty()
    }
}

/// Resolve a complete cast.
pub fn resolve(lines: Lines) -> Resolution {
    let changing = changing_lines(&lines);
    let original = hexagram::lookup(Pattern::from_lines(&lines));
    let transformed = if changing.is_empty() {
        None
    } else {
        let flipped = transform(lines);
        Some(Transformed {
            lines: flipped,
            hexagram: hexagram::lookup(Pattern::from_lines(&flipped)),
        })
    };
    Resolution {
        lines,
        original,
        transformed,
        changing,
    }
}
