use std::collections::BTreeMap;

use super::nfa::{reachable_alphabet, NfaArena, NfaFragment, StateId};

/// Result of combining per-pattern NFA fragments into one ε-NFA (§4.E).
pub struct CombinedNfa {
    pub start: StateId,
    /// Maps an original component's accept state to its pattern's index in
    /// the caller-supplied declaration order — used by subset construction
    /// (§4.F) to resolve priority.
    pub accept_map: BTreeMap<StateId, usize>,
    pub alphabet: std::collections::BTreeSet<char>,
}

/// Create a fresh start state with an ε-edge to each component's start,
/// retaining each component's accept state tagged with its pattern's
/// declaration index. `patterns` must be given in priority order (highest
/// priority, i.e. lowest index, first).
pub fn combine(arena: &mut NfaArena, patterns: &[NfaFragment]) -> CombinedNfa {
    let start = arena.fresh_state();
    let mut accept_map = BTreeMap::new();
    let mut alphabet = std::collections::BTreeSet::new();
    for (index, fragment) in patterns.iter().enumerate() {
        arena.add_epsilon(start, fragment.start);
        accept_map.insert(fragment.accept, index);
        alphabet.extend(reachable_alphabet(arena, fragment.start));
    }
    CombinedNfa {
        start,
        accept_map,
        alphabet,
    }
}
