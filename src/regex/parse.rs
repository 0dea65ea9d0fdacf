// src/regex/parse.rs
// Recursive-descent parser: pattern text -> `Node`, with every character
// already resolved to alphabet symbols.
//
//   alt    := concat ('|' concat)*
//   concat := repeat+
//   repeat := atom quant?
//   atom   := literal | '.' | '\' escape | '[' class ']' | '(' alt ')'
//   quant  := '*' | '+' | '?' | '{' n '}' | '{' n ',' '}' | '{' n ',' m '}'

use std::collections::BTreeSet;

use crate::{
    alphabet::{Alphabet, Symbol},
    error::{RegexErrorKind, RegexSyntaxError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Exactly one symbol out of the set.
    Set(BTreeSet<Symbol>),
    Concat(Vec<Node>),
    Alt(Vec<Node>),
    Repeat {
        node: Box<Node>,
        min: u32,
        max: Option<u32>,
    },
}

/// Character predicates that `\d`, `\s`, `\w` and their negations name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Perl {
    Digit,
    Space,
    Word,
}

impl Perl {
    fn matches(self, c: char) -> bool {
        match self {
            Perl::Digit => c.is_ascii_digit(),
            Perl::Space => c.is_whitespace(),
            Perl::Word => c.is_alphanumeric() || c == '_',
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ClassItem {
    Range(char, char),
    Perl { class: Perl, negated: bool },
}

impl ClassItem {
    fn matches(self, c: char) -> bool {
        match self {
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
            ClassItem::Perl { class, negated } => class.matches(c) != negated,
        }
    }
}

/// What a single escape sequence denotes.
enum Escape {
    Char(char),
    Perl(ClassItem),
}

pub struct Parser<'a> {
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
    alphabet: &'a dyn Alphabet,
    max_repeat: u32,
}

impl<'a> Parser<'a> {
    pub fn new(pattern: &'a str, alphabet: &'a dyn Alphabet, max_repeat: u32) -> Self {
        Self {
            pattern,
            chars: pattern.chars().collect(),
            pos: 0,
            alphabet,
            max_repeat,
        }
    }

    pub fn parse(mut self) -> Result<Node, RegexSyntaxError> {
        if self.chars.is_empty() {
            return Err(self.error_at(0, RegexErrorKind::EmptyPattern));
        }
        let node = self.parse_alt()?;
        match self.peek() {
            None => Ok(node),
            Some(')') => Err(self.error(RegexErrorKind::UnmatchedClose(')'))),
            // parse_alt only stops early on ')' or end of input
            Some(c) => Err(self.error(RegexErrorKind::UnmatchedClose(c))),
        }
    }

    fn error(&self, kind: RegexErrorKind) -> RegexSyntaxError {
        self.error_at(self.pos, kind)
    }

    fn error_at(&self, position: usize, kind: RegexErrorKind) -> RegexSyntaxError {
        RegexSyntaxError {
            pattern: self.pattern.to_string(),
            position,
            kind,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_alt(&mut self) -> Result<Node, RegexSyntaxError> {
        let mut branches = vec![self.parse_concat()?];
        while self.eat('|') {
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap_or(Node::Concat(Vec::new()))
        } else {
            Node::Alt(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Node, RegexSyntaxError> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            items.push(self.parse_repeat()?);
        }
        if items.is_empty() {
            return Err(self.error(RegexErrorKind::EmptyAlternative));
        }
        Ok(if items.len() == 1 {
            items.pop().unwrap_or(Node::Concat(Vec::new()))
        } else {
            Node::Concat(items)
        })
    }

    fn parse_repeat(&mut self) -> Result<Node, RegexSyntaxError> {
        let atom = self.parse_atom()?;
        let Some((min, max)) = self.parse_quantifier()? else {
            return Ok(atom);
        };
        if let Some(c) = self.peek().filter(|c| matches!(c, '*' | '+' | '?' | '{')) {
            return Err(self.error(RegexErrorKind::StackedQuantifier(c)));
        }
        Ok(Node::Repeat {
            node: Box::new(atom),
            min,
            max,
        })
    }

    fn parse_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, RegexSyntaxError> {
        let q = match self.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => {
                self.pos += 1;
                return self.parse_bounds().map(Some);
            }
            _ => return Ok(None),
        };
        self.pos += 1;
        Ok(Some(q))
    }

    fn parse_bounds(&mut self) -> Result<(u32, Option<u32>), RegexSyntaxError> {
        let min = self.parse_number()?;
        let max = if self.eat(',') {
            if self.peek() == Some('}') {
                None
            } else {
                Some(self.parse_number()?)
            }
        } else {
            Some(min)
        };
        if !self.eat('}') {
            return Err(match self.peek() {
                None => self.error(RegexErrorKind::UnterminatedBound),
                Some(_) => self.error(RegexErrorKind::InvalidBound),
            });
        }
        if let Some(max) = max {
            if min > max {
                return Err(self.error(RegexErrorKind::BoundsOutOfOrder { min, max }));
            }
        }
        let largest = max.unwrap_or(min);
        if largest > self.max_repeat {
            return Err(self.error(RegexErrorKind::BoundTooLarge {
                bound: largest,
                limit: self.max_repeat,
            }));
        }
        Ok((min, max))
    }

    fn parse_number(&mut self) -> Result<u32, RegexSyntaxError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(match self.peek() {
                None => self.error(RegexErrorKind::UnterminatedBound),
                Some(_) => self.error(RegexErrorKind::InvalidBound),
            });
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse::<u32>()
            .map_err(|_| self.error_at(start, RegexErrorKind::InvalidBound))
    }

    fn parse_atom(&mut self) -> Result<Node, RegexSyntaxError> {
        let at = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error(RegexErrorKind::EmptyAlternative));
        };
        match c {
            '*' | '+' | '?' | '{' => Err(self.error_at(at, RegexErrorKind::DanglingQuantifier(c))),
            ']' | '}' => Err(self.error_at(at, RegexErrorKind::UnmatchedClose(c))),
            '(' => {
                if self.peek() == Some(')') {
                    return Err(self.error_at(at, RegexErrorKind::EmptyGroup));
                }
                let inner = self.parse_alt()?;
                if !self.eat(')') {
                    return Err(self.error_at(at, RegexErrorKind::UnterminatedGroup));
                }
                Ok(inner)
            }
            '[' => self.parse_class(at),
            '.' => Ok(Node::Set(self.symbols_where(|ch| ch != '\n'))),
            '\\' => match self.parse_escape(at)? {
                Escape::Char(ch) => self.literal(ch, at),
                Escape::Perl(item) => self.set_of(&[item], false, at),
            },
            ch => self.literal(ch, at),
        }
    }

    fn literal(&self, c: char, at: usize) -> Result<Node, RegexSyntaxError> {
        let sym = self
            .alphabet
            .classify(c)
            .ok_or_else(|| self.error_at(at, RegexErrorKind::OutsideAlphabet(c)))?;
        self.check_exact(c, at)?;
        Ok(Node::Set(BTreeSet::from([sym])))
    }

    /// A written character must not stand for a whole folded bucket.
    fn check_exact(&self, c: char, at: usize) -> Result<(), RegexSyntaxError> {
        match self.alphabet.classify(c) {
            Some(sym) if !self.alphabet.is_exact(sym) => {
                Err(self.error_at(at, RegexErrorKind::FoldedCharacter(c)))
            }
            _ => Ok(()),
        }
    }

    /// Parses the character(s) after a backslash at `at`.
    fn parse_escape(&mut self, at: usize) -> Result<Escape, RegexSyntaxError> {
        let Some(c) = self.bump() else {
            return Err(self.error_at(at, RegexErrorKind::TrailingEscape));
        };
        let perl = |class, negated| Ok(Escape::Perl(ClassItem::Perl { class, negated }));
        match c {
            'd' => perl(Perl::Digit, false),
            'D' => perl(Perl::Digit, true),
            's' => perl(Perl::Space, false),
            'S' => perl(Perl::Space, true),
            'w' => perl(Perl::Word, false),
            'W' => perl(Perl::Word, true),
            'n' => Ok(Escape::Char('\n')),
            'r' => Ok(Escape::Char('\r')),
            't' => Ok(Escape::Char('\t')),
            'f' => Ok(Escape::Char('\u{0c}')),
            'v' => Ok(Escape::Char('\u{0b}')),
            '0'..='9' => Err(self.error_at(at, RegexErrorKind::BackReference(c))),
            c if c.is_alphanumeric() => Err(self.error_at(at, RegexErrorKind::UnknownEscape(c))),
            c => Ok(Escape::Char(c)),
        }
    }

    fn parse_class(&mut self, open: usize) -> Result<Node, RegexSyntaxError> {
        let negated = self.eat('^');
        let mut items: Vec<ClassItem> = Vec::new();
        loop {
            let at = self.pos;
            let lo = match self.bump() {
                None => return Err(self.error_at(open, RegexErrorKind::UnterminatedClass)),
                Some(']') if items.is_empty() => {
                    return Err(self.error_at(open, RegexErrorKind::EmptyClass));
                }
                Some(']') => break,
                Some('\\') => match self.parse_escape(at)? {
                    Escape::Char(ch) => ch,
                    Escape::Perl(item) => {
                        items.push(item);
                        continue;
                    }
                },
                Some(ch) => ch,
            };
            self.check_exact(lo, at)?;

            // `a-z`; a '-' right before ']' is literal
            let is_range = self.peek() == Some('-')
                && self.chars.get(self.pos + 1).is_some_and(|&n| n != ']');
            if !is_range {
                items.push(ClassItem::Range(lo, lo));
                continue;
            }
            self.pos += 1;
            let hi_at = self.pos;
            let hi = match self.bump() {
                None => return Err(self.error_at(open, RegexErrorKind::UnterminatedClass)),
                Some('\\') => match self.parse_escape(hi_at)? {
                    Escape::Char(ch) => ch,
                    Escape::Perl(_) => {
                        return Err(self.error_at(hi_at, RegexErrorKind::InvalidRangeEnd(lo)));
                    }
                },
                Some(ch) => ch,
            };
            self.check_exact(hi, hi_at)?;
            if lo > hi {
                return Err(self.error_at(at, RegexErrorKind::InvertedRange(lo, hi)));
            }
            items.push(ClassItem::Range(lo, hi));
        }
        self.set_of(&items, negated, open)
    }

    fn set_of(&self, items: &[ClassItem], negated: bool, at: usize) -> Result<Node, RegexSyntaxError> {
        let set = self.symbols_where(|c| items.iter().any(|it| it.matches(c)) != negated);
        if set.is_empty() {
            return Err(self.error_at(at, RegexErrorKind::ClassMatchesNothing));
        }
        Ok(Node::Set(set))
    }

    fn symbols_where(&self, pred: impl Fn(char) -> bool) -> BTreeSet<Symbol> {
        self.alphabet
            .symbols()
            .filter(|&s| pred(self.alphabet.representative(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{Ascii, Latin1, UnicodeFolded};

    fn parse(p: &str) -> Result<Node, RegexSyntaxError> {
        Parser::new(p, &Ascii, 1000).parse()
    }

    fn kind(p: &str) -> RegexErrorKind {
        parse(p).unwrap_err().kind
    }

    #[test]
    fn shapes() {
        assert_eq!(parse("a").unwrap(), Node::Set(BTreeSet::from(['a' as u32])));
        assert!(matches!(parse("ab|c").unwrap(), Node::Alt(v) if v.len() == 2));
        assert!(matches!(
            parse("x{2,}").unwrap(),
            Node::Repeat { min: 2, max: None, .. }
        ));
        match parse("[a-c_]").unwrap() {
            Node::Set(s) => assert_eq!(s.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
        match parse("[^a]").unwrap() {
            Node::Set(s) => assert_eq!(s.len(), 127),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn literal_dash_and_escaped_metas() {
        match parse("[-+]").unwrap() {
            Node::Set(s) => assert_eq!(s, BTreeSet::from(['-' as u32, '+' as u32])),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(parse(r"\.").unwrap(), Node::Set(BTreeSet::from(['.' as u32])));
    }

    #[test]
    fn error_kinds() {
        assert_eq!(kind(""), RegexErrorKind::EmptyPattern);
        assert_eq!(kind("["), RegexErrorKind::UnterminatedClass);
        assert_eq!(kind("[]"), RegexErrorKind::EmptyClass);
        assert_eq!(kind("[^]"), RegexErrorKind::EmptyClass);
        assert_eq!(kind("+"), RegexErrorKind::DanglingQuantifier('+'));
        assert_eq!(kind("*a"), RegexErrorKind::DanglingQuantifier('*'));
        assert_eq!(kind("(|a)"), RegexErrorKind::EmptyAlternative);
        assert_eq!(kind("a|"), RegexErrorKind::EmptyAlternative);
        assert_eq!(kind("a{a}"), RegexErrorKind::InvalidBound);
        assert_eq!(kind("a{3,1}"), RegexErrorKind::BoundsOutOfOrder { min: 3, max: 1 });
        assert_eq!(kind("a{2"), RegexErrorKind::UnterminatedBound);
        assert_eq!(kind("a\\"), RegexErrorKind::TrailingEscape);
        assert_eq!(kind("(a)\\1"), RegexErrorKind::BackReference('1'));
        assert_eq!(kind("a)"), RegexErrorKind::UnmatchedClose(')'));
        assert_eq!(kind("a]"), RegexErrorKind::UnmatchedClose(']'));
        assert_eq!(kind("(a"), RegexErrorKind::UnterminatedGroup);
        assert_eq!(kind("()"), RegexErrorKind::EmptyGroup);
        assert_eq!(kind("a**"), RegexErrorKind::StackedQuantifier('*'));
        assert_eq!(kind("[z-a]"), RegexErrorKind::InvertedRange('z', 'a'));
        assert_eq!(kind("é"), RegexErrorKind::OutsideAlphabet('é'));
        assert_eq!(kind(r"\q"), RegexErrorKind::UnknownEscape('q'));
        assert_eq!(kind(r"[a-\d]"), RegexErrorKind::InvalidRangeEnd('a'));
    }

    #[test]
    fn folded_characters_cannot_be_written_literally() {
        let folded = |p: &str| Parser::new(p, &UnicodeFolded, 1000).parse().map_err(|e| e.kind);
        assert_eq!(folded("é"), Err(RegexErrorKind::FoldedCharacter('é')));
        assert_eq!(folded("[à-ü]"), Err(RegexErrorKind::FoldedCharacter('à')));
        assert_eq!(folded("[a-ü]"), Err(RegexErrorKind::FoldedCharacter('ü')));
        assert_eq!(folded("[xж]"), Err(RegexErrorKind::FoldedCharacter('ж')));

        // buckets stay reachable through classes
        match folded(r"\w").unwrap() {
            Node::Set(s) => assert!(s.contains(&UnicodeFolded::OTHER_ALPHA)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(folded("[^a]").is_ok());
        // Latin1 maps every character it knows one-to-one
        assert!(Parser::new("[à-ü]", &Latin1, 1000).parse().is_ok());
    }

    #[test]
    fn repeat_limit_is_enforced() {
        let err = Parser::new("a{1,20}", &Ascii, 10).parse().unwrap_err();
        assert_eq!(err.kind, RegexErrorKind::BoundTooLarge { bound: 20, limit: 10 });
    }
}
