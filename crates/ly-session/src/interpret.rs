//! Boundary to the commentary service.
//!
//! A resolved record is turned into an [`InterpretationRequest`], the body
//! the remote interpretation endpoint expects. Commentary is always
//! optional: if the interpreter fails, the [`Reading`] still carries the
//! record untouched.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::warn;

use ly_core::line::position_name;
use ly_core::{Category, DivinationRecord, Hexagram, Method};

/// Tone of the requested commentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Classical phrasing.
    Traditional,
    /// Plain modern language.
    Modern,
    /// Long-form analysis.
    Detailed,
    /// A few sentences.
    Concise,
}

/// Life area the commentary should address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    /// Work.
    Career,
    /// Love and marriage.
    Relationship,
    /// Health.
    Health,
    /// Money.
    Wealth,
    /// Anything else.
    General,
}

impl From<Option<Category>> for Focus {
    fn from(category: Option<Category>) -> Self {
        match category {
            Some(Category::Career) => Self::Career,
            Some(Category::Relationship) => Self::Relationship,
            Some(Category::Health) => Self::Health,
            Some(Category::Wealth) => Self::Wealth,
            Some(Category::Study | Category::Family) | None => Self::General,
        }
    }
}

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese only.
    Chinese,
    /// Chinese with English alongside.
    Bilingual,
}

/// Which texts a reading should centre on, given the changing lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingRule {
    /// No changing lines: the original judgment.
    OriginalJudgment,
    /// One changing line: that line's text.
    MovingLine {
        /// Position of the line (0 = bottom).
        position: usize,
    },
    /// Two changing lines: both texts, the upper one leading.
    TwoMovingLines {
        /// The upper changing line.
        primary: usize,
        /// The lower changing line.
        secondary: usize,
    },
    /// Three changing lines: both judgments, the original leading.
    BothJudgments,
    /// Four changing lines: the two static lines of the transformed hexagram, the lower leading.
    TransformedStaticLines {
        /// The lower static line.
        primary: usize,
        /// The upper static line.
        secondary: usize,
    },
    /// Five changing lines: the single static line of the transformed hexagram.
    TransformedStaticLine {
        /// Position of the static line.
        position: usize,
    },
    /// All six changing: the transformed judgment.
    TransformedJudgment,
    /// All six changing on 乾 or 坤: the extra all-lines text.
    AllLinesText {
        /// 用九 or 用六.
        text: &'static str,
    },
}

impl ReadingRule {
    /// Pick the rule for a record.
    pub fn for_record(record: &DivinationRecord) -> Self {
        let changing = &record.changing_lines;
        let static_lines: Vec<usize> = (0..ly_core::LINE_COUNT)
            .filter(|i| !changing.contains(i))
            .collect();
        match changing.as_slice() {
            [] => Self::OriginalJudgment,
            [position] => Self::MovingLine {
                position: *position,
            },
            [lower, upper] => Self::TwoMovingLines {
                primary: *upper,
                secondary: *lower,
            },
            [_, _, _] => Self::BothJudgments,
            [_, _, _, _] => Self::TransformedStaticLines {
                primary: static_lines.first().copied().unwrap_or(0),
                secondary: static_lines.get(1).copied().unwrap_or(0),
            },
            [_, _, _, _, _] => Self::TransformedStaticLine {
                position: static_lines.first().copied().unwrap_or(0),
            },
            _ => match record.original_hexagram().number {
                1 => Self::AllLinesText { text: "用九" },
                2 => Self::AllLinesText { text: "用六" },
                _ => Self::TransformedJudgment,
            },
        }
    }

    /// One-sentence guidance naming the texts to consult.
    pub fn guidance(&self, original: &Hexagram, transformed: Option<&Hexagram>) -> String {
        let bian = transformed.map_or(original.name, |h| h.name);
        match *self {
            Self::OriginalJudgment => format!("Read the judgment of {}.", original.name),
            Self::MovingLine { position } => format!(
                "Read line {} ({}) of {}.",
                position + 1,
                position_name(position),
                original.name
            ),
            Self::TwoMovingLines { primary, secondary } => format!(
                "Read lines {} and {} of {}, line {} leading.",
                secondary + 1,
                primary + 1,
                original.name,
                primary + 1
            ),
            Self::BothJudgments => format!(
                "Read the judgments of {} and {}, {} leading.",
                original.name, bian, original.name
            ),
            Self::TransformedStaticLines { primary, secondary } => format!(
                "Read static lines {} and {} of {}, line {} leading.",
                primary + 1,
                secondary + 1,
                bian,
                primary + 1
            ),
            Self::TransformedStaticLine { position } => {
                format!("Read static line {} of {}.", position + 1, bian)
            }
            Self::TransformedJudgment => format!("Read the judgment of {bian}."),
            Self::AllLinesText { text } => format!("Read {text} of {}.", original.name),
        }
    }
}

/// Classical texts sent with the hexagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Judgment (卦辞) of the original hexagram, name first.
    pub guaci: String,
    /// Line statements (爻辞) of the changing lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaoci: Option<Vec<String>>,
    /// Commentary from the Ten Wings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shiyi: Option<String>,
    /// Free-form analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Interpretation {
    /// The judgment of a hexagram, with no further texts.
    pub fn for_hexagram(hexagram: &Hexagram) -> Self {
        Self {
            guaci: hexagram.guaci(),
            yaoci: None,
            shiyi: None,
            analysis: None,
        }
    }
}

/// Hexagram details sent alongside the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagramInfo {
    /// Upper trigram, e.g. "☷ 坤地".
    pub upper_trigram: String,
    /// Lower trigram.
    pub lower_trigram: String,
    /// The lowest changing line, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changing_yao: Option<u8>,
    /// Every changing line, 1-based.
    pub changing_lines: Vec<u8>,
    /// Name of the transformed hexagram.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformed_name: Option<String>,
    /// Classical texts for the original hexagram.
    pub interpretation: Interpretation,
    /// Which texts to centre the reading on.
    pub guidance: String,
}

/// Body of a request to the commentary service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// Method tag.
    pub method: Method,
    /// The question.
    pub question: String,
    /// Name of the original hexagram.
    pub hexagram_name: String,
    /// Hexagram details.
    pub hexagram_info: HexagramInfo,
    /// Requested tone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// Life area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<Focus>,
    /// Output language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl InterpretationRequest {
    /// Build a request from a record. Focus follows the record's category.
    pub fn from_record(record: &DivinationRecord) -> Self {
        let original = record.original_hexagram();
        let transformed = record.transformed_hexagram();
        let rule = ReadingRule::for_record(record);
        let to_yao = |i: usize| u8::try_from(i + 1).unwrap_or(u8::MAX);
        Self {
            method: record.method,
            question: record.question.clone(),
            hexagram_name: original.name.to_string(),
            hexagram_info: HexagramInfo {
                upper_trigram: original.upper().to_string(),
                lower_trigram: original.lower().to_string(),
                changing_yao: record.primary_changing_line().map(to_yao),
                changing_lines: record.changing_lines.iter().copied().map(to_yao).collect(),
                transformed_name: transformed.map(|h| h.name.to_string()),
                interpretation: Interpretation::for_hexagram(original),
                guidance: rule.guidance(original, transformed),
            },
            style: None,
            focus: Some(Focus::from(record.category)),
            language: None,
        }
    }

    /// Set the tone.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// Why commentary could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    /// The service could not be reached or timed out.
    #[error("interpretation service unavailable: {0}")]
    Unavailable(String),
    /// The service answered with an error.
    #[error("interpretation rejected: {0}")]
    Rejected(String),
}

/// Something that turns a request into commentary.
pub trait Interpreter {
    /// Produce commentary for a request.
    fn interpret(
        &self,
        request: &InterpretationRequest,
    ) -> impl Future<Output = Result<String, InterpretError>> + Send;
}

/// Offline interpreter that states the reading rule and the hexagrams involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInterpreter;

impl Interpreter for LocalInterpreter {
    fn interpret(
        &self,
        request: &InterpretationRequest,
    ) -> impl Future<Output = Result<String, InterpretError>> + Send {
        let info = &request.hexagram_info;
        let mut text = format!(
            "{} ({} over {}).",
            request.hexagram_name, info.upper_trigram, info.lower_trigram
        );
        match &info.transformed_name {
            Some(name) => text.push_str(&format!(" Changes into {name}.")),
            None => text.push_str(" No changing lines."),
        }
        text.push(' ');
        text.push_str(&info.guidance);
        text.push(' ');
        text.push_str(&info.interpretation.guaci);
        std::future::ready(Ok(text))
    }
}

/// Commentary attached to a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commentary {
    /// The interpreter answered.
    Provided(String),
    /// The interpreter failed; the reason is kept for display.
    Unavailable(String),
}

/// A record paired with its commentary.
#[derive(Debug, Clone)]
pub struct Reading {
    /// The divination, unchanged by whatever the interpreter did.
    pub record: DivinationRecord,
    /// The request that was sent.
    pub request: InterpretationRequest,
    /// The interpreter's answer.
    pub commentary: Commentary,
}

impl Reading {
    /// Ask the interpreter about a record.
    pub async fn consult<I: Interpreter>(record: DivinationRecord, interpreter: &I) -> Self {
        let request = InterpretationRequest::from_record(&record);
        Self::consult_with(record, request, interpreter).await
    }

    /// Ask the interpreter using a caller-built request.
    pub async fn consult_with<I: Interpreter>(
        record: DivinationRecord,
        request: InterpretationRequest,
        interpreter: &I,
    ) -> Self {
        let commentary = match interpreter.interpret(&request).await {
            Ok(text) => Commentary::Provided(text),
            Err(e) => {
                warn!(error = %e, record = %record.id, "interpretation failed");
                Commentary::Unavailable(e.to_string())
            }
        };
        Self {
            record,
            request,
            commentary,
        }
    }
}

#[cfg(test)]
mod tests {
    use ly_core::resolve::resolve;
    use ly_core::{Line, Origin};

    use super::*;

    fn record(lines: [Line; 6], category: Option<Category>) -> DivinationRecord {
        DivinationRecord::new(
            &resolve(lines),
            Method::LiuYao,
            Origin::Observed,
            "Will the harvest be good?",
            category,
        )
    }

    /// Young yin everywhere, old yin at the given positions.
    fn yin_with_changes(changing: &[usize]) -> [Line; 6] {
        let mut lines = [Line::YoungYin; 6];
        for i in changing {
            lines[*i] = Line::OldYin;
        }
        lines
    }

    /// 地雷复 with its bottom line changing.
    fn fu_changing() -> [Line; 6] {
        let mut lines = [Line::YoungYin; 6];
        lines[0] = Line::OldYang;
        lines
    }

    struct Failing;

    impl Interpreter for Failing {
        fn interpret(
            &self,
            _request: &InterpretationRequest,
        ) -> impl Future<Output = Result<String, InterpretError>> + Send {
            std::future::ready(Err(InterpretError::Unavailable("timeout".into())))
        }
    }

    #[test]
    fn rule_by_changing_count() {
        let r = |changing: &[usize]| {
            ReadingRule::for_record(&record(yin_with_changes(changing), None))
        };
        assert_eq!(r(&[]), ReadingRule::OriginalJudgment);
        assert_eq!(r(&[3]), ReadingRule::MovingLine { position: 3 });
        assert_eq!(
            r(&[1, 4]),
            ReadingRule::TwoMovingLines {
                primary: 4,
                secondary: 1
            }
        );
        assert_eq!(r(&[0, 2, 5]), ReadingRule::BothJudgments);
        assert_eq!(
            r(&[0, 2, 3, 5]),
            ReadingRule::TransformedStaticLines {
                primary: 1,
                secondary: 4
            }
        );
        assert_eq!(
            r(&[0, 1, 2, 3, 5]),
            ReadingRule::TransformedStaticLine { position: 4 }
        );
        assert_eq!(
            r(&[0, 1, 2, 3, 4, 5]),
            ReadingRule::AllLinesText { text: "用六" }
        );
    }

    #[test]
    fn all_changing_qian_and_others() {
        let qian = record([Line::OldYang; 6], None);
        assert_eq!(
            ReadingRule::for_record(&qian),
            ReadingRule::AllLinesText { text: "用九" }
        );
        let mixed = record(
            [
                Line::OldYang,
                Line::OldYin,
                Line::OldYang,
                Line::OldYin,
                Line::OldYang,
                Line::OldYin,
            ],
            None,
        );
        assert_eq!(
            ReadingRule::for_record(&mixed),
            ReadingRule::TransformedJudgment
        );
    }

    #[test]
    fn request_shape() {
        let rec = record(fu_changing(), Some(Category::Career));
        let request = InterpretationRequest::from_record(&rec).with_style(Style::Detailed);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "liuyao");
        assert_eq!(json["hexagram_name"], "地雷复");
        assert_eq!(json["hexagram_info"]["upperTrigram"], "☷ 坤地");
        assert_eq!(json["hexagram_info"]["lowerTrigram"], "☳ 震雷");
        assert_eq!(json["hexagram_info"]["changingYao"], 1);
        assert_eq!(json["hexagram_info"]["transformedName"], "坤为地");
        assert_eq!(
            json["hexagram_info"]["interpretation"]["guaci"],
            "复：亨。出入无疾，朋来无咎。反复其道，七日来复，利有攸往。"
        );
        assert!(json["hexagram_info"]["interpretation"].get("yaoci").is_none());
        assert_eq!(
            json["hexagram_info"]["guidance"],
            "Read line 1 (初) of 地雷复."
        );
        assert_eq!(json["style"], "detailed");
        assert_eq!(json["focus"], "career");
        assert!(json.get("language").is_none());
    }

    #[test]
    fn request_without_changes_omits_optional_fields() {
        let rec = record([Line::YoungYang; 6], Some(Category::Family));
        let json = serde_json::to_value(InterpretationRequest::from_record(&rec)).unwrap();
        assert!(json["hexagram_info"].get("changingYao").is_none());
        assert!(json["hexagram_info"].get("transformedName").is_none());
        assert_eq!(
            json["hexagram_info"]["interpretation"]["guaci"],
            "乾：元亨，利贞。"
        );
        assert_eq!(json["focus"], "general");
    }

    #[test]
    fn guidance_text() {
        let rec = record(fu_changing(), None);
        let request = InterpretationRequest::from_record(&rec);
        insta::assert_snapshot!(request.hexagram_info.guidance, @"Read line 1 (初) of 地雷复.");
    }

    #[tokio::test]
    async fn local_interpreter_commentary() {
        let rec = record(fu_changing(), None);
        let reading = Reading::consult(rec, &LocalInterpreter).await;
        let Commentary::Provided(text) = reading.commentary else {
            panic!("expected commentary");
        };
        assert!(text.starts_with("地雷复 (☷ 坤地 over ☳ 震雷)."));
        assert!(text.contains("Changes into 坤为地."));
        assert!(text.ends_with("复：亨。出入无疾，朋来无咎。反复其道，七日来复，利有攸往。"));
    }

    #[tokio::test]
    async fn failing_interpreter_keeps_record() {
        let rec = record([Line::OldYin; 6], Some(Category::Health));
        let before = rec.clone();
        let reading = Reading::consult(rec, &Failing).await;
        assert_eq!(reading.record, before);
        assert_eq!(
            reading.commentary,
            Commentary::Unavailable("interpretation service unavailable: timeout".into())
        );
    }
}
