// src/lexer/stream.rs
use std::iter::FusedIterator;

use super::{Lexer, context::PositionContext};
use crate::error::LexError;

/// Lazy token sequence over one input.
///
/// Ends when the input is used up. A failed scan is yielded once as `Err`
/// and then the stream ends; `remainder()` and `context()` still point at the
/// failure so a caller can resume with a fresh stream after recovering.
pub struct TokenStream<'l, 'a, T> {
    lexer: &'l Lexer<T>,
    input: &'a str,
    context: PositionContext,
    failed: bool,
}

impl<'l, 'a, T> TokenStream<'l, 'a, T> {
    pub(crate) fn new(lexer: &'l Lexer<T>, input: &'a str, context: PositionContext) -> Self {
        Self {
            lexer,
            input,
            context,
            failed: false,
        }
    }

    /// Context after the last token produced.
    pub fn context(&self) -> &PositionContext {
        &self.context
    }

    /// Input not yet consumed.
    pub fn remainder(&self) -> &'a str {
        self.input
    }
}

impl<T> Iterator for TokenStream<'_, '_, T> {
    type Item = Result<T, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let scan = self.lexer.build(self.input, &self.context)?;
        match scan.result {
            Ok(token) => {
                self.input = scan.remainder;
                // a plain stream never rewinds, so nothing before here is needed
                self.context = scan.context.with_committed(scan.context.offset());
                Some(Ok(token))
            }
            Err(err) => {
                self.failed = true;
                self.context = scan.context;
                Some(Err(err))
            }
        }
    }
}

impl<T> FusedIterator for TokenStream<'_, '_, T> {}
