use std::collections::{BTreeMap, BTreeSet};

use super::combine::CombinedNfa;
use super::dfa::{Dfa, DfaStateId, StateCanonicalizer};
use super::nfa::{epsilon_closure, r#move, NfaArena, StateId};
use crate::util::Log;

/// Subset construction (§4.F): ε-NFA → DFA, resolving accept-state
/// conflicts by declaration priority (lowest pattern index wins).
pub fn build(arena: &NfaArena, combined: &CombinedNfa, pattern_names: &[String], log: Log<&'static str>) -> Dfa {
    let mut canon: StateCanonicalizer<StateId> = StateCanonicalizer::new();
    let mut states = BTreeSet::new();
    let mut transitions = BTreeMap::new();
    let mut accept = BTreeMap::new();

    let q0 = epsilon_closure(arena, [combined.start]);
    let (start_id, _) = canon.canonicalize(q0.iter().copied());
    states.insert(start_id);

    let mut subset_of: BTreeMap<DfaStateId, BTreeSet<StateId>> = BTreeMap::new();
    subset_of.insert(start_id, q0);

    let mut worklist = vec![start_id];
    let mut processed = BTreeSet::new();

    while let Some(current_id) = worklist.pop() {
        if !processed.insert(current_id) {
            continue;
        }
        let current_subset = subset_of.get(&current_id).unwrap().clone();

        if let Some(label) = accept_label(&current_subset, combined, pattern_names) {
            log.trace(|| format!("dfa state {} accepts {}", current_id.0, label));
            accept.insert(current_id, label);
        }

        for &symbol in &combined.alphabet {
            let moved = r#move(arena, &current_subset, symbol);
            if moved.is_empty() {
                continue;
            }
            let closure = epsilon_closure(arena, moved);
            if closure.is_empty() {
                continue;
            }
            let (target_id, is_new) = canon.canonicalize(closure.iter().copied());
            if is_new {
                states.insert(target_id);
                subset_of.insert(target_id, closure);
                worklist.push(target_id);
            }
            transitions.insert((current_id, symbol), target_id);
        }
    }

    Dfa {
        states,
        alphabet: combined.alphabet.clone(),
        transitions,
        start: start_id,
        accept,
    }
}

/// Among the NFA accept states present in `subset`, resolve to the pattern
/// with the lowest declaration index.
fn accept_label(subset: &BTreeSet<StateId>, combined: &CombinedNfa, pattern_names: &[String]) -> Option<String> {
    subset
        .iter()
        .filter_map(|s| combined.accept_map.get(s))
        .min()
        .map(|&index| pattern_names[index].clone())
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::automaton::combine::combine;
    use crate::automaton::nfa::NfaArena;
    use crate::automaton::thompson;
    use crate::regex::compile_postfix;

    #[test]
    fn priority_prefers_earlier_declared_pattern() {
        let mut arena = NfaArena::new();
        let if_postfix = compile_postfix("if").unwrap();
        let id_postfix = compile_postfix("[a-z]+").unwrap();
        let if_frag = thompson::build(&if_postfix, &mut arena).unwrap();
        let id_frag = thompson::build(&id_postfix, &mut arena).unwrap();
        let combined = combine(&mut arena, &[if_frag, id_frag]);
        let names = vec!["IF".to_string(), "ID".to_string()];
        let dfa = build(&arena, &combined, &names, Log::None);

        // Walk "if" through the DFA; the final state must be accepted as IF.
        let mut state = dfa.start;
        for c in "if".chars() {
            state = dfa.transition(state, c).unwrap();
        }
        assert_eq!(dfa.pattern_at(state), Some("IF"));
    }
}
