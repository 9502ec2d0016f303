//! Error types for the divination core.

/// Errors raised by the core computations.
///
/// Every variant is a precondition violation on the caller's input. None of
/// them is recoverable by retrying the same operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A raw line value outside {6, 7, 8, 9}.
    #[error("invalid line value {0} (expected 6, 7, 8 or 9)")]
    InvalidLineValue(u8),

    /// A hexagram was built from a number of lines other than six.
    #[error("a hexagram needs exactly 6 lines, got {0}")]
    WrongLineCount(usize),

    /// A hexagram encoding that is not six `0`/`1` characters.
    #[error("invalid hexagram encoding '{0}' (expected 6 characters of 0/1)")]
    InvalidEncoding(String),

    /// A King Wen number outside 1..=64.
    #[error("no hexagram numbered {0} (expected 1-64)")]
    UnknownHexagramNumber(u32),

    /// The coin source ran dry before a toss could draw its three coins.
    #[error("coin source exhausted after {drawn} of 3 coins")]
    CoinSourceExhausted {
        /// How many coins were drawn before the source ran out.
        drawn: usize,
    },

    /// A head count that three coins cannot produce.
    #[error("invalid head count {0} (expected 0-3)")]
    InvalidHeadCount(usize),

    /// A scripted coin sequence contained something other than h/t.
    #[error("invalid coin '{0}' (expected h or t)")]
    InvalidCoin(char),

    /// An unrecognized divination method tag.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// An unrecognized question category tag.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// An unrecognized trigram name.
    #[error("unknown trigram: {0}")]
    UnknownTrigram(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
