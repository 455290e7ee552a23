// Snapshots - canonical nested representation of a finalized tree
//
// `dump` renders the state graph as a `serde_json::Value` made only of
// maps, arrays, strings, integers, booleans and nulls. `load` rebuilds a
// finalized tree from that value without re-running `finalize`. Byte
// encoding and file handling are left to the caller.

use crate::state::{State, StateId, ROOT};
use crate::tree::{KeywordTree, Phase};
use crate::{KwTreeConfig, KwTreeError, KwTreeResult};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Typed view of a dumped tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub case_insensitive: bool,
    pub state_count: usize,
    pub states: Vec<SnapshotState>,
}

/// One state of a dumped tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub id: StateId,

    /// One-character keys mapped to target state ids
    pub transitions: BTreeMap<String, StateId>,

    pub fail: StateId,

    pub output: Option<String>,
}

impl TreeSnapshot {
    /// Convert into the canonical nested value
    pub fn into_value(self) -> Value {
        let states: Vec<Value> = self
            .states
            .into_iter()
            .map(|state| {
                let transitions: Map<String, Value> = state
                    .transitions
                    .into_iter()
                    .map(|(c, target)| (c, Value::from(target)))
                    .collect();

                json!({
                    "id": state.id,
                    "transitions": Value::Object(transitions),
                    "fail": state.fail,
                    "output": state.output,
                })
            })
            .collect();

        json!({
            "case_insensitive": self.case_insensitive,
            "state_count": self.state_count,
            "states": states,
        })
    }
}

impl KeywordTree {
    /// Typed snapshot of a finalized tree
    pub fn snapshot(&self) -> KwTreeResult<TreeSnapshot> {
        self.require_finalized()?;

        let states = self
            .states
            .iter()
            .map(|state| SnapshotState {
                id: state.id,
                transitions: state
                    .transitions
                    .iter()
                    .map(|(c, &target)| (c.to_string(), target))
                    .collect(),
                fail: state.fail,
                output: state.output().map(str::to_string),
            })
            .collect();

        Ok(TreeSnapshot {
            case_insensitive: self.config.case_insensitive,
            state_count: self.states.len(),
            states,
        })
    }

    /// Dump a finalized tree to its canonical nested value
    pub fn dump(&self) -> KwTreeResult<Value> {
        self.snapshot().map(TreeSnapshot::into_value)
    }

    /// Rebuild a finalized tree from a value produced by `dump`
    pub fn load(value: &Value) -> KwTreeResult<Self> {
        let snapshot = TreeSnapshot::deserialize(value)
            .map_err(|e| KwTreeError::corrupt(format!("invalid snapshot structure: {}", e)))?;
        Self::from_snapshot(snapshot)
    }

    /// Rebuild a finalized tree from a typed snapshot
    pub fn from_snapshot(snapshot: TreeSnapshot) -> KwTreeResult<Self> {
        let count = snapshot.states.len();
        if count == 0 {
            return Err(KwTreeError::corrupt("missing root state"));
        }
        if snapshot.state_count != count {
            return Err(KwTreeError::corrupt(format!(
                "state_count is {} but {} states are present",
                snapshot.state_count, count
            )));
        }

        let mut interned: AHashMap<String, Arc<str>> = AHashMap::default();
        let mut states = Vec::with_capacity(count);

        for (index, entry) in snapshot.states.into_iter().enumerate() {
            if entry.id != index {
                return Err(KwTreeError::corrupt(format!(
                    "state at position {} has id {}",
                    index, entry.id
                )));
            }
            if entry.fail >= count {
                return Err(KwTreeError::corrupt(format!(
                    "state {} has dangling fail link {}",
                    index, entry.fail
                )));
            }

            let mut state = State::new(index);
            state.fail = entry.fail;

            for (key, target) in entry.transitions {
                let mut chars = key.chars();
                let c = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(KwTreeError::corrupt(format!(
                            "state {} has transition key {:?} that is not a single character",
                            index, key
                        )))
                    }
                };
                if target >= count || target == ROOT {
                    return Err(KwTreeError::corrupt(format!(
                        "state {} has invalid transition target {}",
                        index, target
                    )));
                }
                state.add_transition(c, target);
            }

            if let Some(output) = entry.output {
                if output.is_empty() {
                    return Err(KwTreeError::corrupt(format!(
                        "state {} has an empty output",
                        index
                    )));
                }
                let shared = interned
                    .entry(output)
                    .or_insert_with_key(|key| Arc::from(key.as_str()))
                    .clone();
                state.output = Some(shared);
            }

            states.push(state);
        }

        check_graph(&states)?;

        let tree = KeywordTree {
            states,
            phase: Phase::Finalized,
            config: KwTreeConfig::default().case_insensitive(snapshot.case_insensitive),
        };

        debug!(
            state_count = tree.states.len(),
            case_insensitive = snapshot.case_insensitive,
            "Keyword tree loaded"
        );
        Ok(tree)
    }
}

/// Verify that transitions form a tree rooted at `ROOT`, that failure links
/// point to strictly shallower states and that outputs fit their depth.
fn check_graph(states: &[State]) -> KwTreeResult<()> {
    if states[ROOT].fail != ROOT {
        return Err(KwTreeError::corrupt("root fail link must point to the root"));
    }

    let mut depth: Vec<Option<usize>> = vec![None; states.len()];
    depth[ROOT] = Some(0);

    let mut queue = VecDeque::from([ROOT]);
    while let Some(id) = queue.pop_front() {
        let next_depth = depth[id].unwrap_or_default() + 1;
        for &child in states[id].transitions.values() {
            if depth[child].is_some() {
                return Err(KwTreeError::corrupt(format!(
                    "state {} is reached by more than one transition",
                    child
                )));
            }
            depth[child] = Some(next_depth);
            queue.push_back(child);
        }
    }

    for state in states.iter().skip(1) {
        let state_depth = depth[state.id].ok_or_else(|| {
            KwTreeError::corrupt(format!("state {} is unreachable from the root", state.id))
        })?;

        let fail_depth = depth[state.fail].unwrap_or(usize::MAX);
        if fail_depth >= state_depth {
            return Err(KwTreeError::corrupt(format!(
                "state {} fail link {} is not shallower",
                state.id, state.fail
            )));
        }

        if let Some(output) = state.output() {
            if output.chars().count() > state_depth {
                return Err(KwTreeError::corrupt(format!(
                    "state {} output {:?} is longer than its depth {}",
                    state.id, output, state_depth
                )));
            }
        }
    }

    if states[ROOT].output.is_some() {
        return Err(KwTreeError::corrupt("root state cannot carry an output"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> KeywordTree {
        let mut tree = KeywordTree::new(true);
        tree.add_all(["bla", "blue", "blISs"]).unwrap();
        tree.finalize().unwrap();
        tree
    }

    fn assert_corrupt(value: Value, fragment: &str) {
        let err = KeywordTree::load(&value).unwrap_err();
        assert!(err.is_corrupt_data(), "expected corrupt data, got {:?}", err);
        assert!(
            err.to_string().contains(fragment),
            "{:?} does not mention {:?}",
            err.to_string(),
            fragment
        );
    }

    #[test]
    fn test_dump_layout() {
        let mut tree = KeywordTree::new(false);
        tree.add("ab").unwrap();
        tree.finalize().unwrap();

        let value = tree.dump().unwrap();
        assert_eq!(
            value,
            json!({
                "case_insensitive": false,
                "state_count": 3,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {"b": 2}, "fail": 0, "output": null},
                    {"id": 2, "transitions": {}, "fail": 0, "output": "ab"},
                ],
            })
        );
    }

    #[test]
    fn test_dump_before_finalize() {
        let mut tree = KeywordTree::new(false);
        tree.add("ab").unwrap();
        assert!(tree.dump().unwrap_err().is_lifecycle());
    }

    #[test]
    fn test_dump_is_deterministic() {
        let tree = sample_tree();
        assert_eq!(tree.dump().unwrap(), tree.dump().unwrap());
    }

    #[test]
    fn test_dump_and_load() {
        let tree = sample_tree();
        let loaded = KeywordTree::load(&tree.dump().unwrap()).unwrap();

        assert!(loaded.is_finalized());
        assert!(loaded.is_case_insensitive());
        assert_eq!(loaded.state_count(), tree.state_count());

        let result = loaded.search("bLa").unwrap().unwrap();
        assert_eq!((result.keyword, result.offset), ("bla", 0));

        let result = loaded.search("BLISS").unwrap().unwrap();
        assert_eq!((result.keyword, result.offset), ("blISs", 0));

        assert_eq!(loaded.dump().unwrap(), tree.dump().unwrap());
    }

    #[test]
    fn test_loaded_tree_is_finalized() {
        let tree = sample_tree();
        let mut loaded = KeywordTree::load(&tree.dump().unwrap()).unwrap();
        assert!(loaded.add("more").unwrap_err().is_lifecycle());
        assert!(loaded.finalize().unwrap_err().is_lifecycle());
    }

    #[test]
    fn test_load_interns_outputs() {
        let mut tree = KeywordTree::new(false);
        tree.add_all(["xyab", "ya"]).unwrap();
        tree.finalize().unwrap();

        let loaded = KeywordTree::load(&tree.dump().unwrap()).unwrap();
        let ya: Vec<&Arc<str>> = loaded
            .states
            .iter()
            .filter_map(|s| s.output.as_ref())
            .filter(|o| o.as_ref() == "ya")
            .collect();

        // "xya" inherits the output of "ya"
        assert_eq!(ya.len(), 2);
        assert!(Arc::ptr_eq(ya[0], ya[1]));
    }

    #[test]
    fn test_load_wrong_types() {
        assert_corrupt(json!("not a tree"), "invalid snapshot structure");
        assert_corrupt(
            json!({"case_insensitive": "yes", "state_count": 1, "states": []}),
            "invalid snapshot structure",
        );
        assert_corrupt(json!({"case_insensitive": false}), "invalid snapshot structure");
    }

    #[test]
    fn test_load_missing_root() {
        assert_corrupt(
            json!({"case_insensitive": false, "state_count": 0, "states": []}),
            "missing root",
        );
    }

    #[test]
    fn test_load_inconsistent_ids() {
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [{"id": 0, "transitions": {}, "fail": 0, "output": null}],
            }),
            "state_count",
        );
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 5, "transitions": {}, "fail": 0, "output": "a"},
                ],
            }),
            "has id 5",
        );
    }

    #[test]
    fn test_load_dangling_targets() {
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 7}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": "a"},
                ],
            }),
            "invalid transition target 7",
        );
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 9, "output": "a"},
                ],
            }),
            "dangling fail link 9",
        );
    }

    #[test]
    fn test_load_bad_transition_key() {
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"ab": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": null},
                ],
            }),
            "not a single character",
        );
    }

    #[test]
    fn test_load_rejects_non_tree_graphs() {
        // Unreachable state
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": null},
                ],
            }),
            "unreachable",
        );
        // Transition back into the root
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {"b": 0}, "fail": 0, "output": null},
                ],
            }),
            "invalid transition target 0",
        );
        // Two edges into one state
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1, "b": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": null},
                ],
            }),
            "more than one transition",
        );
    }

    #[test]
    fn test_load_rejects_fail_cycles() {
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 3,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {"b": 2}, "fail": 2, "output": null},
                    {"id": 2, "transitions": {}, "fail": 1, "output": null},
                ],
            }),
            "not shallower",
        );
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 1, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": null},
                ],
            }),
            "root fail link",
        );
    }

    #[test]
    fn test_load_rejects_bad_outputs() {
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": null},
                    {"id": 1, "transitions": {}, "fail": 0, "output": "abc"},
                ],
            }),
            "longer than its depth",
        );
        assert_corrupt(
            json!({
                "case_insensitive": false,
                "state_count": 2,
                "states": [
                    {"id": 0, "transitions": {"a": 1}, "fail": 0, "output": "a"},
                    {"id": 1, "transitions": {}, "fail": 0, "output": null},
                ],
            }),
            "root state cannot carry",
        );
    }
}
