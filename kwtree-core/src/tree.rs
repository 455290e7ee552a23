// Keyword tree - owner of the state arena
//
// Trie insertion lives in `builder`, failure-link computation in
// `compiler`, scanning in `scanner` and persistence in `snapshot`.

use crate::state::{State, StateId, ROOT};
use crate::{KwTreeConfig, KwTreeError, KwTreeResult};
use std::fmt;

/// Lifecycle phase of a keyword tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Keywords may be added; searching is not yet possible
    Building,

    /// Failure links are computed; the tree is read-only
    Finalized,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Building => write!(f, "building"),
            Phase::Finalized => write!(f, "finalized"),
        }
    }
}

/// An Aho-Corasick keyword tree
#[derive(Clone)]
pub struct KeywordTree {
    /// State arena; index 0 is the root
    pub(crate) states: Vec<State>,

    /// Current lifecycle phase
    pub(crate) phase: Phase,

    /// Configuration
    pub(crate) config: KwTreeConfig,
}

impl KeywordTree {
    /// Create an empty tree that is ready for `add`
    pub fn new(case_insensitive: bool) -> Self {
        Self::with_config(KwTreeConfig::default().case_insensitive(case_insensitive))
    }

    /// Create an empty tree with custom configuration
    pub fn with_config(config: KwTreeConfig) -> Self {
        Self {
            states: vec![State::new(ROOT)],
            phase: Phase::Building,
            config,
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.config.case_insensitive
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn get_state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn config(&self) -> &KwTreeConfig {
        &self.config
    }

    /// Fold a character to the key used for transitions.
    ///
    /// Only single-character lower-case mappings are applied, so folding
    /// never changes the character count of a keyword or text.
    pub(crate) fn fold(&self, c: char) -> char {
        if !self.config.case_insensitive {
            return c;
        }
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => l,
            _ => c,
        }
    }

    pub(crate) fn require_building(&self, message: &'static str) -> KwTreeResult<()> {
        match self.phase {
            Phase::Building => Ok(()),
            Phase::Finalized => Err(KwTreeError::Lifecycle(message)),
        }
    }

    pub(crate) fn require_finalized(&self) -> KwTreeResult<()> {
        match self.phase {
            Phase::Finalized => Ok(()),
            Phase::Building => Err(KwTreeError::Lifecycle("not finalized")),
        }
    }
}

impl fmt::Debug for KeywordTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordTree")
            .field("case_insensitive", &self.config.case_insensitive)
            .field("phase", &self.phase)
            .field("state_count", &self.states.len())
            .finish()
    }
}

impl fmt::Display for KeywordTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "KeywordTree(case_insensitive={}, phase={}, states={})",
            self.config.case_insensitive,
            self.phase,
            self.states.len()
        )?;
        writeln!(f, "[{}] root", ROOT)?;

        let mut stack: Vec<(char, StateId, usize)> = self.states[ROOT]
            .sorted_transitions()
            .into_iter()
            .rev()
            .map(|(c, id)| (c, id, 1))
            .collect();

        while let Some((c, id, depth)) = stack.pop() {
            let state = &self.states[id];
            write!(
                f,
                "{:indent$}{:?} [{}] fail={}",
                "",
                c,
                id,
                state.fail,
                indent = depth * 2
            )?;
            if let Some(output) = state.output() {
                write!(f, " output={:?}", output)?;
            }
            writeln!(f)?;

            for (next_c, child) in state.sorted_transitions().into_iter().rev() {
                stack.push((next_c, child, depth + 1));
            }
        }

        Ok(())
    }
}
