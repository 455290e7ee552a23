// Automaton compiler
//
// Computes failure links breadth-first and copies outputs along them, so
// that the scanner never has to walk a failure chain to find a match.

use crate::state::{StateId, ROOT};
use crate::tree::{KeywordTree, Phase};
use crate::KwTreeResult;
use std::collections::VecDeque;
use tracing::debug;

impl KeywordTree {
    /// Compute failure links and inherited outputs.
    ///
    /// May be called exactly once; afterwards the tree is read-only and
    /// ready for `search`.
    pub fn finalize(&mut self) -> KwTreeResult<()> {
        self.require_building("already finalized")?;

        self.states[ROOT].fail = ROOT;

        // Depth 1: fall back to the root
        let mut queue: VecDeque<StateId> = VecDeque::new();
        for (_, child) in self.states[ROOT].sorted_transitions() {
            self.states[child].fail = ROOT;
            queue.push_back(child);
        }

        // Every fail target is shallower than the state it belongs to, so
        // its output is already resolved when the state is reached.
        while let Some(parent) = queue.pop_front() {
            let parent_fail = self.states[parent].fail;

            for (c, child) in self.states[parent].sorted_transitions() {
                let fail = self.goto(parent_fail, c);
                let inherited = self.states[fail].output.clone();

                let state = &mut self.states[child];
                state.fail = fail;
                if state.output.is_none() {
                    state.output = inherited;
                }

                queue.push_back(child);
            }
        }

        self.phase = Phase::Finalized;
        debug!(
            state_count = self.states.len(),
            case_insensitive = self.config.case_insensitive,
            "Keyword tree finalized"
        );
        Ok(())
    }
}
