// Chunk: docs/chunks/incremental_lexing - Token kind, lexer state and packed token datum

//! Token identity types.
//!
//! A stored token is three small values: its [`TokenKind`], the
//! [`LexerState`] the lexer was in when the token started, and whether that
//! state is a resync point. [`TokenDatum`] packs all three into one `u32` so
//! the interval index stays at 12 bytes per token.

use rustc_hash::FxHashMap;

/// Opaque lexical category id (identifier, string, comment, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(pub u16);

/// Snapshot of a lexer automaton at a token start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LexerState(pub u16);

impl LexerState {
    /// The state equivalent to starting fresh; lexing may resume here.
    pub const INITIAL: LexerState = LexerState(0);

    /// Largest state value that fits in a [`TokenDatum`].
    pub const MAX: u16 = 0x7FFF;
}

const KIND_BITS: u32 = 16;
const STATE_MASK: u32 = 0x7FFF;
const INITIAL_FLAG: u32 = 1 << 31;

/// Kind, start state and is-initial flag packed into 32 bits.
///
/// Layout: bits 0-15 kind, bits 16-30 state, bit 31 initial flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDatum(u32);

impl TokenDatum {
    /// Packs a token datum.
    ///
    /// # Panics
    ///
    /// Panics if `state` exceeds [`LexerState::MAX`].
    pub fn new(kind: TokenKind, state: LexerState, initial: bool) -> Self {
        assert!(
            state.0 <= LexerState::MAX,
            "lexer state {} does not fit in a token datum",
            state.0
        );
        let flag = if initial { INITIAL_FLAG } else { 0 };
        TokenDatum(u32::from(kind.0) | (u32::from(state.0) << KIND_BITS) | flag)
    }

    pub fn kind(self) -> TokenKind {
        TokenKind(self.0 as u16)
    }

    pub fn state(self) -> LexerState {
        LexerState(((self.0 >> KIND_BITS) & STATE_MASK) as u16)
    }

    /// True if the token started in a state the lexer can resume from.
    pub fn is_initial(self) -> bool {
        self.0 & INITIAL_FLAG != 0
    }
}

/// Interns token kind names to dense ids.
///
/// Ids are handed out in registration order starting at 0, so a lexer that
/// interns its names in a fixed order gets stable ids it can use as
/// constants.
#[derive(Debug, Clone, Default)]
pub struct TokenKindTable {
    names: Vec<Box<str>>,
    ids: FxHashMap<Box<str>, TokenKind>,
}

impl TokenKindTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from names in id order.
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::new();
        for name in names {
            table.intern(name);
        }
        table
    }

    /// Returns the id for `name`, assigning the next free one if it is new.
    ///
    /// # Panics
    ///
    /// Panics when more than `u16::MAX` distinct kinds are interned.
    pub fn intern(&mut self, name: &str) -> TokenKind {
        if let Some(kind) = self.ids.get(name) {
            return *kind;
        }
        let id = u16::try_from(self.names.len()).expect("token kind table overflow");
        let kind = TokenKind(id);
        self.names.push(name.into());
        self.ids.insert(name.into(), kind);
        kind
    }

    pub fn get(&self, name: &str) -> Option<TokenKind> {
        self.ids.get(name).copied()
    }

    /// Returns the name of `kind`, or `""` for ids this table never issued.
    pub fn name(&self, kind: TokenKind) -> &str {
        self.names.get(usize::from(kind.0)).map_or("", |name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
