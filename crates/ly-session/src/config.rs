//! Configuration for a divination session.

use ly_core::{Category, Method};

use crate::error::{SessionError, SessionResult};

/// What a skip does to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    /// Discard the partial cast and throw all six lines at once.
    #[default]
    Synthesize,
    /// Stop without producing a record.
    Abort,
}

/// Configuration for a session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// The question being asked.
    pub question: String,
    /// Requested method.
    pub method: Method,
    /// Optional question category.
    pub category: Option<Category>,
    /// Behaviour on skip.
    pub skip_policy: SkipPolicy,
}

impl SessionConfig {
    /// A configuration for the given question with default settings.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Set the method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the question category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the skip policy.
    pub fn with_skip_policy(mut self, policy: SkipPolicy) -> Self {
        self.skip_policy = policy;
        self
    }

    /// Check the configuration before a session is built from it.
    pub fn validate(&self) -> SessionResult<()> {
        if self.question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        if self.method == Method::MeiHua {
            return Err(SessionError::UnsupportedMethod(self.method));
        }
        Ok(())
    }
}
