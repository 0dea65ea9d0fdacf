// src/lexer/pattern.rs
use std::{fmt, sync::Arc};

use super::{context::PositionContext, tokens::Token};

/// Builds a token from a lexeme and the context at the lexeme's start.
pub type Action<T> = Arc<dyn Fn(&str, &PositionContext) -> T + Send + Sync>;

/// One lexer rule. Declaration order matters: on a same-length tie between
/// two rules of equal strength the earlier one wins.
pub struct Pattern<T> {
    source: String,
    strong: bool,
    action: Action<T>,
}

impl<T> Pattern<T> {
    pub fn new<F>(source: impl Into<String>, action: F) -> Self
    where
        F: Fn(&str, &PositionContext) -> T + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            strong: false,
            action: Arc::new(action),
        }
    }

    /// Mark as a strong signal: wins same-length ties against weak rules
    /// regardless of declaration order (keywords over identifiers).
    pub fn strong(mut self) -> Self {
        self.strong = true;
        self
    }

    pub fn with_strong(mut self, strong: bool) -> Self {
        self.strong = strong;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_strong(&self) -> bool {
        self.strong
    }

    pub fn action(&self) -> &Action<T> {
        &self.action
    }
}

impl<K> Pattern<Token<K>>
where
    K: Clone + Send + Sync + 'static,
{
    /// Rule producing a [`Token`] of `kind` carrying its text and position.
    pub fn token(source: impl Into<String>, kind: K) -> Self {
        Self::new(source, move |text, at| Token::new(kind.clone(), text, at))
    }
}

impl<T> Clone for Pattern<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            strong: self.strong,
            action: Arc::clone(&self.action),
        }
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("strong", &self.strong)
            .finish_non_exhaustive()
    }
}
