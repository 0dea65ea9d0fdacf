// src/lexer/context.rs
use std::sync::Arc;

use hashbrown::HashMap;

use crate::automata::StateId;

/// Where a lexer session stands: absolute character offset, 1-based
/// line/column, and the dead-end memo used to short-circuit re-scans.
///
/// Contexts are values. Every update returns a new context and the old one
/// stays a valid place to resume from. The memo is shared copy-on-write, so
/// cloning a context is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionContext {
    offset: usize,
    line: usize,
    column: usize,
    committed: usize,
    // (offset, state) -> farthest offset reached from there without accepting
    pre_error: Arc<HashMap<(usize, StateId), usize>>,
}

impl Default for PositionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionContext {
    pub fn new() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            committed: 0,
            pre_error: Arc::new(HashMap::new()),
        }
    }

    /// A context positioned at `offset`/`line`/`column` with an empty memo.
    pub fn at(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
            committed: 0,
            pre_error: Arc::new(HashMap::new()),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Offsets below this are never revisited and are not memoized.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Step over `consumed`. `following` is the character right after it,
    /// needed to treat a `\r` that ends `consumed` as half of a `\r\n`.
    pub fn advance(&self, consumed: &str, following: Option<char>) -> Self {
        let mut next = self.clone();
        let mut chars = consumed.chars().peekable();
        while let Some(c) = chars.next() {
            next.offset += 1;
            let breaks = match c {
                '\n' => true,
                '\r' => chars.peek().copied().or(following) != Some('\n'),
                _ => false,
            };
            if breaks {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next
    }

    /// Whether scanning from `state` at `offset` is known to reach no further acceptance.
    pub fn is_dead_end(&self, offset: usize, state: StateId) -> bool {
        self.pre_error.contains_key(&(offset, state))
    }

    pub(crate) fn dead_end_reach(&self, offset: usize, state: StateId) -> Option<usize> {
        self.pre_error.get(&(offset, state)).copied()
    }

    pub fn pre_error_len(&self) -> usize {
        self.pre_error.len()
    }

    /// Record `pairs` as dead ends that got as far as `reach`.
    pub(crate) fn with_dead_ends<I>(&self, pairs: I, reach: usize) -> Self
    where
        I: IntoIterator<Item = (usize, StateId)>,
    {
        let mut next = self.clone();
        let mut pairs = pairs.into_iter().filter(|&(off, _)| off >= self.committed).peekable();
        if pairs.peek().is_none() {
            return next;
        }
        let memo = Arc::make_mut(&mut next.pre_error);
        for pair in pairs {
            let entry = memo.entry(pair).or_insert(reach);
            *entry = (*entry).max(reach);
        }
        next
    }

    /// Declare that nothing before `offset` will be scanned again; drops
    /// memo entries below it. The committed offset never moves backwards.
    pub fn with_committed(&self, offset: usize) -> Self {
        let mut next = self.clone();
        if offset <= next.committed {
            return next;
        }
        next.committed = offset;
        if next.pre_error.keys().any(|&(off, _)| off < offset) {
            Arc::make_mut(&mut next.pre_error).retain(|&(off, _), _| off >= offset);
        }
        next
    }

    /// Back up to `earlier`'s position while keeping this context's memo.
    ///
    /// Memo entries are keyed by absolute offset, so they stay valid for any
    /// position over the same input.
    pub fn resume_at(&self, earlier: &PositionContext) -> Self {
        Self {
            offset: earlier.offset,
            line: earlier.line,
            column: earlier.column,
            committed: self.committed,
            pre_error: Arc::clone(&self.pre_error),
        }
    }
}
