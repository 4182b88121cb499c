use std::collections::BTreeSet;

/// Identity of an NFA state: a fresh integer minted by a [`NfaArena`].
///
/// Per §5/§9, the counter backing this id lives in the arena — a per-build
/// construction context — rather than behind a process-global, so two
/// independent builds never collide and never need resetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u32);

/// One NFA state: a mapping from symbol (`Some(c)`) or ε (`None`) to a set
/// of next states. See §3 "NFA state".
#[derive(Debug, Default, Clone)]
pub struct NfaState {
    pub transitions: std::collections::BTreeMap<char, BTreeSet<StateId>>,
    pub epsilon: BTreeSet<StateId>,
}

/// An arena owning every NFA state created during one construction.
/// Thompson's construction (§4.C) and the combiner (§4.E) both append to
/// the same arena so that a combined NFA owns exactly the states its
/// components created, with no copying.
#[derive(Debug, Default)]
pub struct NfaArena {
    states: Vec<NfaState>,
}

impl NfaArena {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn fresh_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(NfaState::default());
        id
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from.0 as usize].epsilon.insert(to);
    }

    pub fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states[from.0 as usize]
            .transitions
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}

/// A single component NFA, identified only by its start and accept state —
/// a fragment of a larger arena, per Thompson's construction.
#[derive(Debug, Clone, Copy)]
pub struct NfaFragment {
    pub start: StateId,
    pub accept: StateId,
}

/// ε-closure(S): states reachable from `states` by any number of
/// ε-transitions, computed with an explicit worklist (§9: "no recursion").
pub fn epsilon_closure(arena: &NfaArena, states: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
    let mut closure: BTreeSet<StateId> = states.into_iter().collect();
    let mut worklist: Vec<StateId> = closure.iter().copied().collect();
    while let Some(s) = worklist.pop() {
        for &next in &arena.state(s).epsilon {
            if closure.insert(next) {
                worklist.push(next);
            }
        }
    }
    closure
}

/// move(S, σ): states reachable from any state in `states` by a single
/// transition on `symbol`.
pub fn r#move(arena: &NfaArena, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
    let mut reachable = BTreeSet::new();
    for &s in states {
        if let Some(targets) = arena.state(s).transitions.get(&symbol) {
            reachable.extend(targets.iter().copied());
        }
    }
    reachable
}

/// Collect the alphabet reachable from `start` by BFS over non-ε edges.
pub fn reachable_alphabet(arena: &NfaArena, start: StateId) -> BTreeSet<char> {
    let mut alphabet = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut worklist = vec![start];
    visited.insert(start);
    while let Some(s) = worklist.pop() {
        let state = arena.state(s);
        for (&symbol, targets) in &state.transitions {
            alphabet.insert(symbol);
            for &t in targets {
                if visited.insert(t) {
                    worklist.push(t);
                }
            }
        }
        for &t in &state.epsilon {
            if visited.insert(t) {
                worklist.push(t);
            }
        }
    }
    alphabet
}
