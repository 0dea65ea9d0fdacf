// src/lib.rs
//! Pattern-to-DFA compiler and deterministic longest-match lexer.
//!
//! Regex patterns are compiled into one NFA (Thompson construction), merged
//! with priority tags, determinized, and run by [`lexer::Lexer`] over a
//! character stream. Each lexing session threads its own
//! [`lexer::PositionContext`].

pub mod alphabet;
pub mod automata;
pub mod config;
pub mod dev;
pub mod error;
pub mod lexer;
pub mod regex;

pub use alphabet::{Alphabet, Ascii, Latin1, Symbol, UnicodeFolded};
pub use config::BuildConfig;
pub use error::{AutomatonStateError, BuildError, LexError, RegexErrorKind, RegexSyntaxError};
pub use lexer::{Lexer, LexerBuilder, Pattern, PositionContext, Scan, Token, TokenKind};
