use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::hash::Hash;

use crate::error::SyntaxError;

/// Identity of a DFA state: an integer assigned the first time its
/// originating subset (of NFA state ids, or of Position ids) is
/// canonicalized. See §3 "DFA state".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DfaStateId(pub u32);

/// A deterministic finite automaton over `char`, with per-state pattern
/// labels for accept states (§3 "DFA").
///
/// Both [`crate::automaton::subset`] (Thompson + subset construction) and
/// [`crate::automaton::syntax_tree`] (followpos direct construction) build
/// one of these; [`crate::automaton::minimize::minimize`] consumes and
/// produces one.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: BTreeSet<DfaStateId>,
    pub alphabet: BTreeSet<char>,
    pub transitions: BTreeMap<(DfaStateId, char), DfaStateId>,
    pub start: DfaStateId,
    /// Accept label per accepting state: the name of the pattern with
    /// lowest declaration index among those whose end-state landed here.
    pub accept: BTreeMap<DfaStateId, String>,
}

impl Dfa {
    pub fn transition(&self, state: DfaStateId, symbol: char) -> Option<DfaStateId> {
        self.transitions.get(&(state, symbol)).copied()
    }

    pub fn is_accepting(&self, state: DfaStateId) -> bool {
        self.accept.contains_key(&state)
    }

    pub fn pattern_at(&self, state: DfaStateId) -> Option<&str> {
        self.accept.get(&state).map(String::as_str)
    }

    /// Serialize to the five-line compact text format of §6. Pattern
    /// labels are not part of this format — only state ids, so round
    /// tripping through it loses the accept-state-to-pattern-name mapping
    /// by design (it is a structural persistence format, not a full
    /// snapshot).
    pub fn to_compact_text(&self) -> String {
        let mut out = String::new();
        writeln!(out, "{}", self.states.len()).unwrap();
        writeln!(out, "{}", self.start.0).unwrap();
        let accept_ids: Vec<String> = self.accept.keys().map(|id| id.0.to_string()).collect();
        writeln!(out, "{}", accept_ids.join(",")).unwrap();
        let alphabet: Vec<String> = self.alphabet.iter().map(|c| c.to_string()).collect();
        writeln!(out, "{}", alphabet.join(",")).unwrap();
        for (&(from, symbol), &to) in &self.transitions {
            writeln!(out, "{},{},{}", from.0, symbol, to.0).unwrap();
        }
        out
    }

    /// Parse the compact text format back into a [`Dfa`] with an empty
    /// accept map — callers that need pattern labels must track them
    /// separately, matching what `to_compact_text` actually persists.
    pub fn from_compact_text(text: &str) -> Result<Dfa, SyntaxError> {
        let mut lines = text.lines();
        let num_states: u32 = lines
            .next()
            .ok_or_else(|| SyntaxError::new("missing state count line"))?
            .trim()
            .parse()
            .map_err(|_| SyntaxError::new("state count is not an integer"))?;
        let start: u32 = lines
            .next()
            .ok_or_else(|| SyntaxError::new("missing start state line"))?
            .trim()
            .parse()
            .map_err(|_| SyntaxError::new("start state id is not an integer"))?;
        let accept_line = lines
            .next()
            .ok_or_else(|| SyntaxError::new("missing accept states line"))?;
        let accept_ids: BTreeSet<DfaStateId> = accept_line
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.trim()
                    .parse::<u32>()
                    .map(DfaStateId)
                    .map_err(|_| SyntaxError::new("accept state id is not an integer"))
            })
            .collect::<Result<_, _>>()?;
        let alphabet_line = lines
            .next()
            .ok_or_else(|| SyntaxError::new("missing alphabet line"))?;
        let alphabet: BTreeSet<char> = alphabet_line
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.chars()
                    .next()
                    .ok_or_else(|| SyntaxError::new("empty alphabet symbol"))
            })
            .collect::<Result<_, _>>()?;

        let mut transitions = BTreeMap::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ',');
            let from: u32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| SyntaxError::new("malformed transition line"))?;
            let symbol: char = parts
                .next()
                .and_then(|s| s.chars().next())
                .ok_or_else(|| SyntaxError::new("malformed transition line"))?;
            let to: u32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| SyntaxError::new("malformed transition line"))?;
            transitions.insert((DfaStateId(from), symbol), DfaStateId(to));
        }

        let states: BTreeSet<DfaStateId> = (0..num_states).map(DfaStateId).collect();
        Ok(Dfa {
            states,
            alphabet,
            transitions,
            start: DfaStateId(start),
            accept: accept_ids.into_iter().map(|id| (id, String::new())).collect(),
        })
    }
}

/// Assigns a compact integer id to each distinct subset of an id space
/// (NFA state ids for subset construction, Position ids for followpos),
/// keyed by the sorted, deduplicated tuple of members — see §3's DFA
/// state identity rule and §9's "no recursion, frozen set" design note.
pub(crate) struct StateCanonicalizer<K: Ord + Clone + Hash> {
    map: HashMap<Vec<K>, DfaStateId>,
    next: u32,
}

impl<K: Ord + Clone + Hash> StateCanonicalizer<K> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            next: 0,
        }
    }

    /// Canonicalize a subset. Returns the assigned id and `true` if this is
    /// the first time this exact subset has been seen (the worklist should
    /// enqueue it).
    pub fn canonicalize(&mut self, members: impl IntoIterator<Item = K>) -> (DfaStateId, bool) {
        let mut key: Vec<K> = members.into_iter().collect();
        key.sort();
        key.dedup();
        if let Some(&id) = self.map.get(&key) {
            (id, false)
        } else {
            let id = DfaStateId(self.next);
            self.next += 1;
            self.map.insert(key, id);
            (id, true)
        }
    }
}

#[cfg(test)]
mod __tests__ {
    use super::*;

    fn sample() -> Dfa {
        let mut transitions = BTreeMap::new();
        transitions.insert((DfaStateId(0), 'a'), DfaStateId(1));
        let mut accept = BTreeMap::new();
        accept.insert(DfaStateId(1), "ID".to_string());
        Dfa {
            states: [DfaStateId(0), DfaStateId(1)].into_iter().collect(),
            alphabet: ['a'].into_iter().collect(),
            transitions,
            start: DfaStateId(0),
            accept,
        }
    }

    #[test]
    fn compact_roundtrip_preserves_structure() {
        let dfa = sample();
        let text = dfa.to_compact_text();
        let parsed = Dfa::from_compact_text(&text).unwrap();
        assert_eq!(parsed.states.len(), dfa.states.len());
        assert_eq!(parsed.start, dfa.start);
        assert_eq!(parsed.alphabet, dfa.alphabet);
        assert_eq!(parsed.transitions, dfa.transitions);
        assert!(parsed.accept.contains_key(&DfaStateId(1)));
    }
}
