// Keyword tree states
//
// States live in a single arena owned by the tree; transitions and
// failure links refer to other states by index.

use ahash::AHashMap;
use std::sync::Arc;

/// Index of a state in the tree's arena
pub type StateId = usize;

/// The root state is always the first one created
pub const ROOT: StateId = 0;

/// A single automaton state
#[derive(Debug, Clone)]
pub struct State {
    /// State ID (arena index)
    pub id: StateId,

    /// Transitions: (character) -> next_state_id
    pub transitions: AHashMap<char, StateId>,

    /// Fallback state when no transition exists for the current character
    pub fail: StateId,

    /// Keyword recognized at this state, own or inherited through `fail`
    pub output: Option<Arc<str>>,
}

impl State {
    pub fn new(id: StateId) -> Self {
        Self {
            id,
            transitions: AHashMap::default(),
            fail: ROOT,
            output: None,
        }
    }

    pub fn add_transition(&mut self, c: char, next_state: StateId) {
        self.transitions.insert(c, next_state);
    }

    pub fn get_transition(&self, c: char) -> Option<StateId> {
        self.transitions.get(&c).copied()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Transitions ordered by character
    pub fn sorted_transitions(&self) -> Vec<(char, StateId)> {
        let mut edges: Vec<_> = self.transitions.iter().map(|(&c, &id)| (c, id)).collect();
        edges.sort_unstable_by_key(|&(c, _)| c);
        edges
    }
}
