// src/lexer/spec_file.rs
// Plain-text pattern lists:
//
//   # comment
//   Ident    [A-Za-z_][A-Za-z0-9_]*
//   !If      if                 <- leading '!' marks a strong signal
//   White    \s+
//
// One rule per line: a name, whitespace, then the regex (rest of the line,
// trimmed). Order in the file is declaration order.

use thiserror::Error;

use super::{pattern::Pattern, tokens::Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub name: String,
    pub source: String,
    pub strong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SpecFileError {
    pub line: usize,
    pub message: String,
}

pub fn parse_spec(text: &str) -> Result<Vec<PatternSpec>, SpecFileError> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let err = |message: &str| SpecFileError {
            line: i + 1,
            message: message.to_string(),
        };

        let (head, rest) = line.split_once(char::is_whitespace).ok_or_else(|| err("missing pattern"))?;
        let (name, strong) = match head.strip_prefix('!') {
            Some(name) => (name, true),
            None => (head, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(err("rule name must be a non-empty identifier"));
        }
        let source = rest.trim();
        if source.is_empty() {
            return Err(err("missing pattern"));
        }
        out.push(PatternSpec {
            name: name.to_string(),
            source: source.to_string(),
            strong,
        });
    }
    Ok(out)
}

/// Rules that produce `Token<String>` named after each spec entry.
pub fn patterns_from_specs(specs: &[PatternSpec]) -> Vec<Pattern<Token<String>>> {
    specs
        .iter()
        .map(|s| Pattern::token(s.source.clone(), s.name.clone()).with_strong(s.strong))
        .collect()
}
