//! The divination record handed to callers, and the tags it carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::hexagram::{self, Hexagram, Pattern};
use crate::resolve::{Lines, Resolution};

/// How the divination was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Six-line coin casting (六爻).
    #[default]
    LiuYao,
    /// Plum-blossom numerology (梅花易数).
    MeiHua,
    /// Cast handed straight to the AI interpreter (AI解卦).
    Ai,
}

impl Method {
    /// Parse a method tag.
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "liuyao" | "coins" | "六爻" => Ok(Self::LiuYao),
            "meihua" | "plumblossom" | "梅花易数" => Ok(Self::MeiHua),
            "ai" => Ok(Self::Ai),
            _ => Err(CoreError::UnknownMethod(s.to_string())),
        }
    }

    /// The wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::LiuYao => "liuyao",
            Self::MeiHua => "meihua",
            Self::Ai => "ai",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// What the question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Work and career (事业发展).
    Career,
    /// Love and marriage (感情婚姻).
    Relationship,
    /// Health (健康养生).
    Health,
    /// Money and investment (财运投资).
    Wealth,
    /// Study and exams (学业考试).
    Study,
    /// Family (家庭亲情).
    Family,
}

impl Category {
    /// Every category.
    pub const ALL: [Category; 6] = [
        Category::Career,
        Category::Relationship,
        Category::Health,
        Category::Wealth,
        Category::Study,
        Category::Family,
    ];

    /// Parse a category tag. Unknown tags are rejected.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == needle)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }

    /// The wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Career => "career",
            Self::Relationship => "relationship",
            Self::Health => "health",
            Self::Wealth => "wealth",
            Self::Study => "study",
            Self::Family => "family",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Where the lines of a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Every round was played out.
    Observed,
    /// The session was skipped and the lines were cast in one go.
    Synthesized,
}

/// A completed divination. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationRecord {
    /// Unique record id.
    pub id: Uuid,
    /// Requested method.
    pub method: Method,
    /// Played out or synthesized on skip.
    pub origin: Origin,
    /// The cast lines, bottom first.
    pub original: Lines,
    /// The lines after flipping; present only when a line was changing.
    pub transformed: Option<Lines>,
    /// Changing positions (0 = bottom).
    pub changing_lines: Vec<usize>,
    /// The question asked.
    pub question: String,
    /// Question category, if one was chosen.
    pub category: Option<Category>,
    /// When the cast completed.
    pub cast_at: DateTime<Utc>,
}

impl DivinationRecord {
    /// Build a record from a resolution.
    pub fn new(
        resolution: &Resolution,
        method: Method,
        origin: Origin,
        question: impl Into<String>,
        category: Option<Category>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            origin,
            original: resolution.lines,
            transformed: resolution.transformed.as_ref().map(|t| t.lines),
            changing_lines: resolution.changing.clone(),
            question: question.into(),
            category,
            cast_at: Utc::now(),
        }
    }

    /// The original hexagram (本卦).
    pub fn original_hexagram(&self) -> &'static Hexagram {
        hexagram::lookup(Pattern::from_lines(&self.original))
    }

    /// The transformed hexagram (变卦), if any line was changing.
    pub fn transformed_hexagram(&self) -> Option<&'static Hexagram> {
        self.transformed
            .as_ref()
            .map(|lines| hexagram::lookup(Pattern::from_lines(lines)))
    }

    /// The lowest changing line, the one a single-line reading focuses on.
    pub fn primary_changing_line(&self) -> Option<usize> {
        self.changing_lines.first().copied()
    }
}
