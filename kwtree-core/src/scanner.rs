// Scanner - first-match search over a finalized keyword tree
//
// Walks the text once from the root, falling back along failure links,
// and stops at the first state that carries an output.

use crate::state::{StateId, ROOT};
use crate::tree::KeywordTree;
use crate::KwTreeResult;
use serde::Serialize;

/// A keyword occurrence found by `search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordMatch<'a> {
    /// The keyword as it was added
    pub keyword: &'a str,

    /// Character offset (not byte offset) where the occurrence starts
    pub offset: usize,
}

impl KeywordMatch<'_> {
    pub fn into_owned(self) -> (String, usize) {
        (self.keyword.to_string(), self.offset)
    }
}

impl KeywordTree {
    /// Find the first keyword occurrence completed while scanning `text`.
    ///
    /// Occurrences are ranked by where they end: the earliest end wins and
    /// scanning stops there. Among keywords ending at the same character,
    /// the longest one is reported.
    pub fn search(&self, text: &str) -> KwTreeResult<Option<KeywordMatch<'_>>> {
        self.search_chars(text.chars())
    }

    /// Same as `search`, over any sequence of characters
    pub fn search_chars<I>(&self, text: I) -> KwTreeResult<Option<KeywordMatch<'_>>>
    where
        I: IntoIterator<Item = char>,
    {
        self.require_finalized()?;

        let mut state = ROOT;
        for (index, c) in text.into_iter().enumerate() {
            state = self.goto(state, self.fold(c));

            if let Some(keyword) = self.states[state].output.as_deref() {
                let length = keyword.chars().count();
                return Ok(Some(KeywordMatch {
                    keyword,
                    offset: index + 1 - length,
                }));
            }
        }

        Ok(None)
    }

    /// Transition on `c`, falling back along failure links; the root
    /// absorbs characters it has no transition for.
    pub(crate) fn goto(&self, mut state: StateId, c: char) -> StateId {
        loop {
            if let Some(next) = self.states[state].get_transition(c) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.states[state].fail;
        }
    }
}
