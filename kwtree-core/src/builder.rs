// Trie builder for the keyword tree
//
// Inserts keywords into the state arena while the tree is still building.
// Failure links are left at the root until `finalize` runs.

use crate::state::{State, ROOT};
use crate::tree::KeywordTree;
use crate::{KwTreeError, KwTreeResult};
use std::sync::Arc;
use tracing::{debug, trace};

impl KeywordTree {
    /// Add a keyword to the tree.
    ///
    /// The empty keyword is ignored. When case folding is enabled the
    /// transitions use lower-cased characters while the stored output keeps
    /// the keyword exactly as given; if two keywords fold onto the same
    /// path, the one added last is reported.
    pub fn add(&mut self, keyword: &str) -> KwTreeResult<()> {
        self.require_building("tree already finalized")?;

        if keyword.is_empty() {
            return Ok(());
        }

        let length = keyword.chars().count();
        let max_length = self.config.max_keyword_length;
        if max_length > 0 && length > max_length {
            return Err(KwTreeError::KeywordTooLong {
                length,
                max: max_length,
            });
        }

        // Follow the part of the keyword that is already in the trie
        let mut current = ROOT;
        let mut consumed = 0;
        for c in keyword.chars() {
            match self.states[current].get_transition(self.fold(c)) {
                Some(next) => {
                    current = next;
                    consumed += 1;
                }
                None => break,
            }
        }

        // Enforce the state limit before touching the arena
        let new_states = length - consumed;
        let max_states = self.config.max_states;
        if max_states > 0 && self.states.len() + new_states > max_states {
            return Err(KwTreeError::TooManyStates {
                count: self.states.len() + new_states,
                max: max_states,
            });
        }

        for c in keyword.chars().skip(consumed) {
            let key = self.fold(c);
            let id = self.states.len();
            self.states.push(State::new(id));
            self.states[current].add_transition(key, id);
            current = id;
        }

        let state = &mut self.states[current];
        if state.output.as_deref() != Some(keyword) {
            if let Some(previous) = state.output.as_deref() {
                debug!(previous, keyword, "Replacing keyword on folded path");
            }
            state.output = Some(Arc::from(keyword));
        }

        trace!(keyword, new_states, "Added keyword");
        Ok(())
    }

    /// Add multiple keywords, stopping at the first error
    pub fn add_all<I, S>(&mut self, keywords: I) -> KwTreeResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            self.add(keyword.as_ref())?;
        }
        Ok(())
    }
}
