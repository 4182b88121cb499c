use std::collections::{BTreeMap, BTreeSet};

use once_cell::unsync::OnceCell;

use crate::error::GrammarError;

/// The epsilon body of a production, written `&` in grammar text — the
/// same glyph the regex front end uses for its own epsilon marker (§9).
pub const EPSILON: &str = "&";

/// The end-of-input terminal every augmented grammar's FOLLOW set and
/// ACTION table reserve a slot for.
pub const END_OF_INPUT: &str = "$";

/// One alternative for a non-terminal: `lhs -> rhs[0] rhs[1] ...`. An
/// empty `rhs` is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<String>,
}

/// A context-free grammar loaded from grammar text (§4.I), always
/// augmented with a synthetic start production `S' -> S` as production 0
/// so the SLR table has a single, unambiguous accept condition.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub start: String,
    pub original_start: String,
    pub productions: Vec<Production>,
    pub non_terminals: BTreeSet<String>,
    pub terminals: BTreeSet<String>,
    /// Lazily computed and cached on first use, the same way the teacher's
    /// production types cache their own `first_set` behind a `OnceCell`
    /// rather than recomputing the fixed point on every lookup.
    first_cache: OnceCell<BTreeMap<String, BTreeSet<String>>>,
}

/// Parse grammar text: one `LHS ::= alt1 | alt2 | ...` declaration per
/// non-blank, non-comment line (`#` starts a comment, `//` starts a
/// trailing comment anywhere on the line), symbols separated by
/// whitespace, `&` alone as an alternative's body means epsilon.
///
/// A symbol is a non-terminal if and only if it appears as some
/// production's left-hand side; every other symbol occurring in a
/// right-hand side is a terminal. The first declared left-hand side is
/// taken as the grammar's start symbol, then augmented: a synthetic
/// `start'` ( `start` with a trailing `'` ) is rejected with a
/// [`GrammarError`] if it collides with a declared non-terminal, since
/// that would make the augmenting production ambiguous with a real one.
pub fn load_grammar(text: &str) -> Result<Grammar, GrammarError> {
    let mut productions = Vec::new();
    let mut non_terminals = BTreeSet::new();
    let mut original_start: Option<String> = None;

    for (line_number, raw_line) in text.lines().enumerate() {
        let line = raw_line.split("//").next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (lhs, rhs_text) = line
            .split_once("::=")
            .ok_or_else(|| GrammarError::new(format!("line {}: expected 'LHS ::= alt1 | alt2'", line_number + 1)))?;
        let lhs = lhs.trim().to_string();
        if lhs.is_empty() {
            return Err(GrammarError::new(format!("line {}: production has no left-hand side", line_number + 1)));
        }
        if original_start.is_none() {
            original_start = Some(lhs.clone());
        }
        non_terminals.insert(lhs.clone());

        for alternative in rhs_text.split('|') {
            let symbols: Vec<String> = alternative.split_whitespace().map(String::from).collect();
            let rhs = match symbols.as_slice() {
                [single] if single == EPSILON => Vec::new(),
                _ => symbols,
            };
            productions.push(Production { lhs: lhs.clone(), rhs });
        }
    }

    let original_start = original_start.ok_or_else(|| GrammarError::new("grammar declares no productions"))?;

    let mut terminals = BTreeSet::new();
    for production in &productions {
        for symbol in &production.rhs {
            if !non_terminals.contains(symbol) {
                terminals.insert(symbol.clone());
            }
        }
    }

    let augmented_start = format!("{original_start}'");
    if non_terminals.contains(&augmented_start) {
        return Err(GrammarError::new(format!(
            "augmented start symbol '{augmented_start}' collides with a declared non-terminal"
        )));
    }

    let mut all_productions = Vec::with_capacity(productions.len() + 1);
    all_productions.push(Production {
        lhs: augmented_start.clone(),
        rhs: vec![original_start.clone()],
    });
    all_productions.extend(productions);
    non_terminals.insert(augmented_start.clone());

    Ok(Grammar {
        start: augmented_start,
        original_start,
        productions: all_productions,
        non_terminals,
        terminals,
        first_cache: OnceCell::new(),
    })
}

impl Grammar {
    /// FIRST(X) for every terminal and non-terminal `X`, by fixed-point
    /// iteration (§4.J). The fixed point is computed once per grammar and
    /// cached; `build_slr_table` and `follow_sets` both need it, and a
    /// grammar's productions never change after [`load_grammar`] returns.
    pub fn first_sets(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.first_cache.get_or_init(|| self.compute_first_sets()).clone()
    }

    fn compute_first_sets(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut first: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for terminal in &self.terminals {
            first.entry(terminal.clone()).or_default().insert(terminal.clone());
        }
        for non_terminal in &self.non_terminals {
            first.entry(non_terminal.clone()).or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let additions = self.first_of_sequence(&production.rhs, &first);
                let entry = first.entry(production.lhs.clone()).or_default();
                for symbol in additions {
                    if entry.insert(symbol) {
                        changed = true;
                    }
                }
            }
        }
        first
    }

    fn first_of_sequence(&self, sequence: &[String], first: &BTreeMap<String, BTreeSet<String>>) -> BTreeSet<String> {
        if sequence.is_empty() {
            return [EPSILON.to_string()].into_iter().collect();
        }
        let mut result = BTreeSet::new();
        for symbol in sequence {
            let symbol_first = first.get(symbol).cloned().unwrap_or_default();
            result.extend(symbol_first.iter().filter(|s| s.as_str() != EPSILON).cloned());
            if !symbol_first.contains(EPSILON) {
                return result;
            }
        }
        result.insert(EPSILON.to_string());
        result
    }

    /// FOLLOW(A) for every non-terminal `A`, by fixed-point iteration over
    /// the already-computed FIRST sets (§4.J).
    pub fn follow_sets(&self, first: &BTreeMap<String, BTreeSet<String>>) -> BTreeMap<String, BTreeSet<String>> {
        let mut follow: BTreeMap<String, BTreeSet<String>> =
            self.non_terminals.iter().map(|nt| (nt.clone(), BTreeSet::new())).collect();
        follow.get_mut(&self.start).unwrap().insert(END_OF_INPUT.to_string());

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for (index, symbol) in production.rhs.iter().enumerate() {
                    if !self.non_terminals.contains(symbol) {
                        continue;
                    }
                    let trailer = self.first_of_sequence(&production.rhs[index + 1..], first);
                    let mut additions: BTreeSet<String> =
                        trailer.iter().filter(|s| s.as_str() != EPSILON).cloned().collect();
                    if trailer.contains(EPSILON) {
                        additions.extend(follow.get(&production.lhs).cloned().unwrap_or_default());
                    }
                    let entry = follow.get_mut(symbol).unwrap();
                    for addition in additions {
                        if entry.insert(addition) {
                            changed = true;
                        }
                    }
                }
            }
        }
        follow
    }

    fn symbol_after_dot(&self, item: Item) -> Option<&str> {
        self.productions[item.production].rhs.get(item.dot).map(String::as_str)
    }

    /// closure(I) (§4.K): add, for every item with the dot before some
    /// non-terminal `A`, every `A -> .β` item, until nothing new appears.
    pub fn closure(&self, items: &BTreeSet<Item>) -> BTreeSet<Item> {
        let mut closure = items.clone();
        let mut worklist: Vec<Item> = closure.iter().copied().collect();
        while let Some(item) = worklist.pop() {
            if let Some(symbol) = self.symbol_after_dot(item) {
                if self.non_terminals.contains(symbol) {
                    for (index, production) in self.productions.iter().enumerate() {
                        if production.lhs == symbol {
                            let new_item = Item { production: index, dot: 0 };
                            if closure.insert(new_item) {
                                worklist.push(new_item);
                            }
                        }
                    }
                }
            }
        }
        closure
    }

    /// goto(I, X) (§4.K): advance the dot past `symbol` in every item of
    /// `items` that has it there, then close the result.
    pub fn goto(&self, items: &BTreeSet<Item>, symbol: &str) -> BTreeSet<Item> {
        let mut moved = BTreeSet::new();
        for &item in items {
            if self.symbol_after_dot(item) == Some(symbol) {
                moved.insert(Item {
                    production: item.production,
                    dot: item.dot + 1,
                });
            }
        }
        self.closure(&moved)
    }

    /// The canonical collection of LR(0) item sets, built with the same
    /// canonicalize-and-worklist shape as subset construction (§4.F) —
    /// here over item sets instead of NFA state sets.
    pub fn build_lr0_automaton(&self) -> Lr0Automaton {
        let start_items: BTreeSet<Item> = [Item { production: 0, dot: 0 }].into_iter().collect();
        let start_state = self.closure(&start_items);

        let mut states = vec![start_state.clone()];
        let mut index_of: BTreeMap<Vec<Item>, usize> = BTreeMap::new();
        index_of.insert(start_state.iter().copied().collect(), 0);
        let mut transitions = BTreeMap::new();

        let all_symbols: Vec<String> = self
            .non_terminals
            .iter()
            .chain(self.terminals.iter())
            .cloned()
            .collect();

        let mut worklist = vec![0usize];
        let mut processed = BTreeSet::new();

        while let Some(state_index) = worklist.pop() {
            if !processed.insert(state_index) {
                continue;
            }
            let items = states[state_index].clone();
            for symbol in &all_symbols {
                let target = self.goto(&items, symbol);
                if target.is_empty() {
                    continue;
                }
                let key: Vec<Item> = target.iter().copied().collect();
                let target_index = if let Some(&existing) = index_of.get(&key) {
                    existing
                } else {
                    let new_index = states.len();
                    states.push(target);
                    index_of.insert(key, new_index);
                    worklist.push(new_index);
                    new_index
                };
                transitions.insert((state_index, symbol.clone()), target_index);
            }
        }

        Lr0Automaton { states, transitions }
    }
}

/// An LR(0) item: a production index together with a dot position in
/// `0..=production.rhs.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

/// The canonical collection of LR(0) states plus the goto function
/// between them, shared by every ACTION/GOTO construction that reads the
/// same underlying grammar (§4.K).
#[derive(Debug, Clone)]
pub struct Lr0Automaton {
    pub states: Vec<BTreeSet<Item>>,
    pub transitions: BTreeMap<(usize, String), usize>,
}

#[cfg(test)]
mod __tests__ {
    use super::*;

    fn arithmetic_grammar() -> Grammar {
        load_grammar("E ::= E + T | T\nT ::= T * F | F\nF ::= ( E ) | id\n").unwrap()
    }

    #[test]
    fn augmented_start_production_is_first() {
        let grammar = arithmetic_grammar();
        assert_eq!(grammar.productions[0].lhs, "E'");
        assert_eq!(grammar.productions[0].rhs, vec!["E".to_string()]);
    }

    #[test]
    fn terminals_are_every_symbol_never_used_as_a_left_hand_side() {
        let grammar = arithmetic_grammar();
        assert!(grammar.terminals.contains("+"));
        assert!(grammar.terminals.contains("id"));
        assert!(!grammar.terminals.contains("E"));
    }

    #[test]
    fn first_of_f_includes_open_paren_and_id() {
        let grammar = arithmetic_grammar();
        let first = grammar.first_sets();
        let first_f = &first["F"];
        assert!(first_f.contains("("));
        assert!(first_f.contains("id"));
        assert_eq!(first_f.len(), 2);
    }

    #[test]
    fn follow_of_e_includes_close_paren_plus_and_end_of_input() {
        let grammar = arithmetic_grammar();
        let first = grammar.first_sets();
        let follow = grammar.follow_sets(&first);
        let follow_e = &follow["E"];
        assert!(follow_e.contains(")"));
        assert!(follow_e.contains("+"));
        assert!(follow_e.contains(END_OF_INPUT));
    }

    #[test]
    fn epsilon_production_is_recorded_as_empty_rhs() {
        let grammar = load_grammar("A ::= a A | &\n").unwrap();
        assert!(grammar.productions.iter().any(|p| p.lhs == "A" && p.rhs.is_empty()));
    }

    #[test]
    fn canonical_collection_has_a_single_start_state_reached_by_nothing() {
        let grammar = arithmetic_grammar();
        let automaton = grammar.build_lr0_automaton();
        assert!(automaton.states.len() > 1);
        assert!(!automaton.transitions.values().any(|&target| target == 0));
    }
}
