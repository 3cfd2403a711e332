//! Lexeme database for Lox
//!
//! Interns identifier text and hands out stable small integer ids, so the
//! rest of the pipeline can compare names without touching strings.

use std::collections::HashMap;

/// Stable handle into the lexeme database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexemeId(pub u16);

impl LexemeId {
    /// Sentinel id for "no lexeme" (also what empty text interns to).
    pub const NONE: LexemeId = LexemeId(u16::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Grow-only intern table mapping identifier text to ids.
///
/// Identical text always maps to the identical id. Slot zero is reserved
/// for the empty string so real lexemes start at id 1.
#[derive(Debug)]
pub struct LexemeDatabase {
    texts: Vec<String>,
    lookup: HashMap<String, LexemeId>,
}

impl LexemeDatabase {
    pub fn new() -> Self {
        Self {
            texts: vec![String::new()],
            lookup: HashMap::new(),
        }
    }

    /// Intern `lexeme` and return its id. Empty text maps to the sentinel.
    pub fn add(&mut self, lexeme: &str) -> LexemeId {
        if lexeme.is_empty() {
            return LexemeId::NONE;
        }
        if let Some(&id) = self.lookup.get(lexeme) {
            return id;
        }

        let id = LexemeId(self.texts.len() as u16);
        self.texts.push(lexeme.to_string());
        self.lookup.insert(lexeme.to_string(), id);
        id
    }

    /// Look up an already interned lexeme without inserting it.
    pub fn find(&self, lexeme: &str) -> LexemeId {
        self.lookup.get(lexeme).copied().unwrap_or(LexemeId::NONE)
    }

    /// Text stored for `id`; empty for the sentinel or an unknown id.
    pub fn get(&self, id: LexemeId) -> &str {
        self.texts.get(id.0 as usize).map_or("", String::as_str)
    }
}

impl Default for LexemeDatabase {
    fn default() -> Self {
        Self::new()
    }
}
