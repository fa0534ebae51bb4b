//! Compiled `like` / `LIKE` patterns.

use crate::error::QueryError;
use regex::{Regex, RegexBuilder};

/// A compiled pattern for the `like` and `LIKE` operators.
///
/// Built either from a raw regular expression, which is searched anywhere in
/// the value, or from a `[prefix, suffix]` pair, which compiles to
/// `^prefix.*suffix$`. Prefix and suffix are regex fragments, so `["p[a-z]", "ce"]`
/// matches `"prince"`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    case_sensitive: bool,
    regex: Regex,
}

impl Pattern {
    /// Compiles a raw regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if it does not compile.
    pub fn regex(source: &str, case_sensitive: bool) -> Result<Self, QueryError> {
        Self::compile(source.to_string(), case_sensitive)
    }

    /// Builds the anchored pattern `^prefix.*suffix$`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the assembled pattern does
    /// not compile.
    pub fn affix(prefix: &str, suffix: &str, case_sensitive: bool) -> Result<Self, QueryError> {
        let source = format!("^{prefix}.*{suffix}$");
        Self::compile(source, case_sensitive)
    }

    fn compile(source: String, case_sensitive: bool) -> Result<Self, QueryError> {
        let regex = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| QueryError::invalid_pattern(&source, e.to_string()))?;
        Ok(Self {
            source,
            case_sensitive,
            regex,
        })
    }

    /// Returns the regular expression this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` for `LIKE` patterns.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Tests the pattern against a text.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_sensitive == other.case_sensitive
    }
}
