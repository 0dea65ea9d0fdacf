// src/alphabet.rs
//! Symbol classification shared by the regex compiler and the lexer runtime.
//!
//! Automata never see raw characters: every character is first mapped to a
//! discrete [`Symbol`]. Character classes are expanded against the same
//! alphabet by testing each symbol's representative character, so the
//! compiler and the runtime agree on what a class matches.

use std::fmt::Debug;

/// Discrete input symbol of a compiled automaton.
pub type Symbol = u32;

pub trait Alphabet: Debug + Send + Sync {
    /// Number of symbols; valid symbols are `0..size()`.
    fn size(&self) -> u32;

    /// Map a raw character to its symbol, or `None` if it is not part of the alphabet.
    fn classify(&self, c: char) -> Option<Symbol>;

    /// A character that classifies to `sym`. Used to decide class membership.
    fn representative(&self, sym: Symbol) -> char;

    /// Whether `sym` stands for exactly one character. Literals in a pattern
    /// must classify to such a symbol; folded buckets are reachable only
    /// through classes (`\w`, `[^x]`, `.`).
    fn is_exact(&self, sym: Symbol) -> bool {
        let _ = sym;
        true
    }

    fn symbols(&self) -> std::ops::Range<Symbol> {
        0..self.size()
    }
}

/// 7-bit ASCII; anything else is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Alphabet for Ascii {
    fn size(&self) -> u32 {
        128
    }

    #[inline]
    fn classify(&self, c: char) -> Option<Symbol> {
        c.is_ascii().then_some(c as u32)
    }

    fn representative(&self, sym: Symbol) -> char {
        char::from_u32(sym).unwrap_or('\0')
    }
}

/// ISO-8859-1: the first 256 code points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

impl Alphabet for Latin1 {
    fn size(&self) -> u32 {
        256
    }

    #[inline]
    fn classify(&self, c: char) -> Option<Symbol> {
        let cp = c as u32;
        (cp < 256).then_some(cp)
    }

    fn representative(&self, sym: Symbol) -> char {
        char::from_u32(sym).unwrap_or('\0')
    }
}

/// ASCII plus three buckets that fold the rest of Unicode:
/// other alphabetic characters, other whitespace, and everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeFolded;

impl UnicodeFolded {
    pub const OTHER_ALPHA: Symbol = 128;
    pub const OTHER_SPACE: Symbol = 129;
    pub const OTHER: Symbol = 130;
}

impl Alphabet for UnicodeFolded {
    fn size(&self) -> u32 {
        131
    }

    #[inline]
    fn classify(&self, c: char) -> Option<Symbol> {
        Some(if c.is_ascii() {
            c as u32
        } else if c.is_alphabetic() {
            Self::OTHER_ALPHA
        } else if c.is_whitespace() {
            Self::OTHER_SPACE
        } else {
            Self::OTHER
        })
    }

    fn representative(&self, sym: Symbol) -> char {
        match sym {
            Self::OTHER_ALPHA => 'é',
            Self::OTHER_SPACE => '\u{a0}',
            Self::OTHER => '\u{a4}',
            s => char::from_u32(s).unwrap_or('\0'),
        }
    }

    fn is_exact(&self, sym: Symbol) -> bool {
        sym < 128
    }
}
