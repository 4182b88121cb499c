use std::collections::BTreeMap;

use super::grammar::{Grammar, END_OF_INPUT};
use crate::error::SLRConflict;

/// One ACTION table entry (§4.L).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "shift {state}"),
            Action::Reduce(production) => write!(f, "reduce by production {production}"),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// The ACTION and GOTO tables an SLR(1) parser drives from (§4.L).
#[derive(Debug, Clone)]
pub struct SlrTable {
    pub action: BTreeMap<(usize, String), Action>,
    pub goto: BTreeMap<(usize, String), usize>,
}

/// Build the SLR(1) ACTION/GOTO tables for `grammar`.
///
/// For each state and each item with the dot before a terminal, shift on
/// goto(state, terminal). For each item with the dot at the end of a
/// production other than the augmenting one, reduce on every terminal in
/// FOLLOW(lhs). The augmenting production `S' -> S.` at the end
/// contributes Accept on end-of-input instead of a reduce. Any two
/// differing entries landing on the same `(state, terminal)` cell — shift
/// vs. reduce, or two different reduces — is reported as an
/// [`SLRConflict`] rather than silently resolved.
pub fn build_slr_table(grammar: &Grammar) -> Result<SlrTable, SLRConflict> {
    let automaton = grammar.build_lr0_automaton();
    let first = grammar.first_sets();
    let follow = grammar.follow_sets(&first);

    let mut action: BTreeMap<(usize, String), Action> = BTreeMap::new();
    let mut goto: BTreeMap<(usize, String), usize> = BTreeMap::new();

    for (state_index, items) in automaton.states.iter().enumerate() {
        for &item in items {
            let production = &grammar.productions[item.production];
            match production.rhs.get(item.dot) {
                Some(symbol) if grammar.terminals.contains(symbol) => {
                    if let Some(&target) = automaton.transitions.get(&(state_index, symbol.clone())) {
                        insert_action(&mut action, state_index, symbol.clone(), Action::Shift(target))?;
                    }
                }
                Some(_) => {}
                None if item.production == 0 => {
                    insert_action(&mut action, state_index, END_OF_INPUT.to_string(), Action::Accept)?;
                }
                None => {
                    for terminal in follow.get(&production.lhs).cloned().unwrap_or_default() {
                        insert_action(&mut action, state_index, terminal, Action::Reduce(item.production))?;
                    }
                }
            }
        }
        for non_terminal in &grammar.non_terminals {
            if let Some(&target) = automaton.transitions.get(&(state_index, non_terminal.clone())) {
                goto.insert((state_index, non_terminal.clone()), target);
            }
        }
    }

    Ok(SlrTable { action, goto })
}

fn insert_action(
    action: &mut BTreeMap<(usize, String), Action>,
    state: usize,
    terminal: String,
    new_action: Action,
) -> Result<(), SLRConflict> {
    match action.get(&(state, terminal.clone())) {
        Some(existing) if existing != &new_action => Err(SLRConflict::new(
            state,
            terminal,
            existing.to_string(),
            new_action.to_string(),
        )),
        Some(_) => Ok(()),
        None => {
            action.insert((state, terminal), new_action);
            Ok(())
        }
    }
}
