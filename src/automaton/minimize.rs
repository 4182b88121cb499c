use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;

use super::dfa::{Dfa, DfaStateId};
use crate::util::Log;

/// Hopcroft partition-refinement minimization (§4.G): maintain a partition
/// plus a worklist of splitter blocks, seeded with the whole initial
/// partition. Popping a splitter `A`, for each alphabet symbol `c` compute
/// the preimage `X = { s | δ(s, c) ∈ A }`, then for every current block
/// `Y` with both `Y ∩ X` and `Y \ X` non-empty, replace `Y` by those two
/// pieces — reinserting both into the worklist if `Y` was already queued,
/// otherwise only the smaller piece.
///
/// The initial partition separates states by `(is_accept, pattern_label)`
/// so that two DFAs recognizing different patterns are never merged into
/// one state even if their suffix languages coincide.
pub fn minimize(dfa: &Dfa, log: Log<&'static str>) -> Dfa {
    let mut blocks: BTreeMap<usize, BTreeSet<DfaStateId>> =
        initial_partition(dfa).into_iter().enumerate().collect();
    let mut next_id = blocks.len();
    let mut worklist: VecDeque<usize> = blocks.keys().copied().collect();

    let preimage = build_preimage(dfa);

    while let Some(splitter_id) = worklist.pop_front() {
        let Some(splitter) = blocks.get(&splitter_id).cloned() else {
            continue;
        };
        for &symbol in &dfa.alphabet {
            let x = preimage_of(&preimage, symbol, &splitter);
            if x.is_empty() {
                continue;
            }

            let candidate_ids: Vec<usize> = blocks.keys().copied().collect();
            for y_id in candidate_ids {
                let y = &blocks[&y_id];
                let intersection: BTreeSet<DfaStateId> = y.intersection(&x).copied().collect();
                if intersection.is_empty() || intersection.len() == y.len() {
                    continue;
                }
                let difference: BTreeSet<DfaStateId> = y.difference(&x).copied().collect();
                log.trace(|| {
                    format!(
                        "splitting block {} ({} states) into {} and {} states on '{}'",
                        y_id,
                        y.len(),
                        intersection.len(),
                        difference.len(),
                        symbol
                    )
                });

                let inter_id = next_id;
                next_id += 1;
                blocks.insert(y_id, difference.clone());
                blocks.insert(inter_id, intersection.clone());

                if worklist.contains(&y_id) {
                    worklist.push_back(inter_id);
                } else if intersection.len() <= difference.len() {
                    worklist.push_back(inter_id);
                } else {
                    worklist.push_back(y_id);
                }
            }
        }
    }

    let partition: Vec<BTreeSet<DfaStateId>> = blocks.into_values().collect();
    build_from_partition(dfa, &partition)
}

fn initial_partition(dfa: &Dfa) -> Vec<BTreeSet<DfaStateId>> {
    let mut groups: BTreeMap<Option<&str>, BTreeSet<DfaStateId>> = BTreeMap::new();
    for &state in &dfa.states {
        groups.entry(dfa.pattern_at(state)).or_default().insert(state);
    }
    groups.into_values().collect()
}

fn index_partition(partition: &[BTreeSet<DfaStateId>]) -> BTreeMap<DfaStateId, usize> {
    partition
        .iter()
        .enumerate()
        .flat_map(|(index, block)| block.iter().map(move |&state| (state, index)))
        .collect()
}

/// `preimage[symbol][target]` = every state with a transition on `symbol`
/// landing on `target`, so a splitter's preimage can be read off directly
/// instead of rescanning every transition for each split.
fn build_preimage(dfa: &Dfa) -> BTreeMap<char, BTreeMap<DfaStateId, BTreeSet<DfaStateId>>> {
    let mut preimage: BTreeMap<char, BTreeMap<DfaStateId, BTreeSet<DfaStateId>>> = BTreeMap::new();
    for (&(from, symbol), &to) in &dfa.transitions {
        preimage.entry(symbol).or_default().entry(to).or_default().insert(from);
    }
    preimage
}

fn preimage_of(
    preimage: &BTreeMap<char, BTreeMap<DfaStateId, BTreeSet<DfaStateId>>>,
    symbol: char,
    splitter: &BTreeSet<DfaStateId>,
) -> BTreeSet<DfaStateId> {
    let mut x = BTreeSet::new();
    if let Some(by_target) = preimage.get(&symbol) {
        for state in splitter {
            if let Some(sources) = by_target.get(state) {
                x.extend(sources.iter().copied());
            }
        }
    }
    x
}

fn build_from_partition(dfa: &Dfa, partition: &[BTreeSet<DfaStateId>]) -> Dfa {
    let block_of = index_partition(partition);

    let states: BTreeSet<DfaStateId> = (0..partition.len() as u32).map(DfaStateId).collect();
    let start = DfaStateId(block_of[&dfa.start] as u32);

    let mut transitions = BTreeMap::new();
    for (&(from, symbol), &to) in &dfa.transitions {
        let from_block = DfaStateId(block_of[&from] as u32);
        let to_block = DfaStateId(block_of[&to] as u32);
        transitions.insert((from_block, symbol), to_block);
    }

    let mut accept = BTreeMap::new();
    for (index, block) in partition.iter().enumerate() {
        if let Some(label) = block.iter().find_map(|&state| dfa.pattern_at(state)) {
            accept.insert(DfaStateId(index as u32), label.to_string());
        }
    }

    Dfa {
        states,
        alphabet: dfa.alphabet.clone(),
        transitions,
        start,
        accept,
    }
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::automaton::combine::combine;
    use crate::automaton::nfa::NfaArena;
    use crate::automaton::subset;
    use crate::automaton::syntax_tree;
    use crate::automaton::thompson;
    use crate::regex::compile_postfix;

    fn thompson_dfa(pattern: &str) -> Dfa {
        let mut arena = NfaArena::new();
        let postfix = compile_postfix(pattern).unwrap();
        let frag = thompson::build(&postfix, &mut arena).unwrap();
        let combined = combine(&mut arena, &[frag]);
        subset::build(&arena, &combined, &["MAIN".to_string()], Log::None)
    }

    #[test]
    fn classic_ab_star_abb_minimizes_to_four_states() {
        let dfa = thompson_dfa("(a|b)*abb");
        let minimized = minimize(&dfa, Log::None);
        assert_eq!(minimized.states.len(), 4);
    }

    #[test]
    fn minimizing_a_minimized_dfa_is_a_fixed_point() {
        let dfa = thompson_dfa("(a|b)*abb");
        let once = minimize(&dfa, Log::None);
        let twice = minimize(&once, Log::None);
        assert_eq!(once.states.len(), twice.states.len());
    }

    #[test]
    fn thompson_and_followpos_constructions_minimize_to_the_same_state_count() {
        let thompson_minimized = minimize(&thompson_dfa("(a|b)*abb"), Log::None);
        let followpos = syntax_tree::build(&[("MAIN".to_string(), "(a|b)*abb".to_string())], Log::None).unwrap();
        let followpos_minimized = minimize(&followpos, Log::None);
        assert_eq!(thompson_minimized.states.len(), followpos_minimized.states.len());
    }

    #[test]
    fn distinct_patterns_with_equivalent_suffixes_stay_separate_states() {
        let mut arena = NfaArena::new();
        let if_postfix = compile_postfix("if").unwrap();
        let of_postfix = compile_postfix("of").unwrap();
        let if_frag = thompson::build(&if_postfix, &mut arena).unwrap();
        let of_frag = thompson::build(&of_postfix, &mut arena).unwrap();
        let combined = combine(&mut arena, &[if_frag, of_frag]);
        let names = vec!["IF".to_string(), "OF".to_string()];
        let dfa = subset::build(&arena, &combined, &names, Log::None);
        let minimized = minimize(&dfa, Log::None);

        let mut if_state = minimized.start;
        for c in "if".chars() {
            if_state = minimized.transition(if_state, c).unwrap();
        }
        let mut of_state = minimized.start;
        for c in "of".chars() {
            of_state = minimized.transition(of_state, c).unwrap();
        }
        assert_eq!(minimized.pattern_at(if_state), Some("IF"));
        assert_eq!(minimized.pattern_at(of_state), Some("OF"));
    }
}
