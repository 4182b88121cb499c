use super::grammar::{Grammar, END_OF_INPUT};
use super::slr::{Action, SlrTable};
use crate::error::ParseError;
use crate::util::Log;

/// Parse the token-stream text format of §6: one token per non-blank
/// line, `KIND` or `KIND,ATTRIBUTE`. A line that is exactly a single
/// comma is the literal `,` terminal, not an empty kind before a missing
/// attribute — distinguishing the separator from the token it could
/// otherwise be mistaken for.
pub fn parse_token_stream(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line == "," {
                ",".to_string()
            } else {
                match line.split_once(',') {
                    Some((kind, _attribute)) => kind.to_string(),
                    None => line.to_string(),
                }
            }
        })
        .collect()
}

/// One action the shift-reduce driver performed, paired with enough state
/// to reconstruct a human-readable trace line.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Shift { state: usize, symbol: String },
    Reduce { production: usize, lhs: String, rhs_len: usize },
    Accept,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub state_stack: Vec<usize>,
    pub tokens_remaining: usize,
    pub action: StepAction,
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub steps: Vec<Step>,
    pub accepted: bool,
}

/// Drive the shift-reduce parser (§4.M) over `tokens` against `table`.
///
/// Every reduce pushes the production's left-hand side and looks up the
/// resulting GOTO state; a GOTO cell with no entry for the state reached
/// after popping, or an ACTION cell with no entry for the current
/// `(state, lookahead)` pair, is reported as a [`ParseError`] pointing at
/// the offending token position rather than panicking — the table is
/// caller-controlled data, not something the driver can assume is total.
pub fn parse(grammar: &Grammar, table: &SlrTable, tokens: &[String], log: Log<&'static str>) -> Result<ParseOutcome, ParseError> {
    let mut state_stack = vec![0usize];
    let mut symbol_stack: Vec<String> = Vec::new();
    let mut steps = Vec::new();
    let mut pos = 0;

    loop {
        let current_state = *state_stack.last().unwrap();
        let lookahead = tokens.get(pos).cloned().unwrap_or_else(|| END_OF_INPUT.to_string());
        let remaining_text = tokens[pos..].join(" ");

        match table.action.get(&(current_state, lookahead.clone())) {
            Some(Action::Shift(target)) => {
                log.trace_step(&state_stack, &remaining_text, &format!("shift {target}"));
                state_stack.push(*target);
                symbol_stack.push(lookahead.clone());
                steps.push(Step {
                    state_stack: state_stack.clone(),
                    tokens_remaining: tokens.len() - pos,
                    action: StepAction::Shift {
                        state: *target,
                        symbol: lookahead,
                    },
                });
                pos += 1;
            }
            Some(Action::Reduce(production_index)) => {
                let production = &grammar.productions[*production_index];
                log.trace_step(&state_stack, &remaining_text, &format!("reduce by production {production_index}"));
                let rhs_len = production.rhs.len();
                for _ in 0..rhs_len {
                    state_stack.pop();
                    symbol_stack.pop();
                }
                symbol_stack.push(production.lhs.clone());
                let exposed_state = *state_stack.last().unwrap();
                let next_state = *table
                    .goto
                    .get(&(exposed_state, production.lhs.clone()))
                    .ok_or_else(|| {
                        ParseError::new(
                            pos,
                            format!("no GOTO entry for state {exposed_state} on '{}'", production.lhs),
                        )
                    })?;
                state_stack.push(next_state);
                steps.push(Step {
                    state_stack: state_stack.clone(),
                    tokens_remaining: tokens.len() - pos,
                    action: StepAction::Reduce {
                        production: *production_index,
                        lhs: production.lhs.clone(),
                        rhs_len,
                    },
                });
            }
            Some(Action::Accept) => {
                log.trace_step(&state_stack, &remaining_text, "accept");
                steps.push(Step {
                    state_stack: state_stack.clone(),
                    tokens_remaining: tokens.len() - pos,
                    action: StepAction::Accept,
                });
                return Ok(ParseOutcome { steps, accepted: true });
            }
            None => {
                return Err(ParseError::new(
                    pos,
                    format!("no ACTION entry for state {current_state} on '{lookahead}'"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::grammar::grammar::load_grammar;
    use crate::grammar::slr::build_slr_table;

    fn arithmetic() -> (Grammar, SlrTable) {
        let grammar = load_grammar("E ::= E + T | T\nT ::= T * F | F\nF ::= ( E ) | id\n").unwrap();
        let table = build_slr_table(&grammar).unwrap();
        (grammar, table)
    }

    #[test]
    fn id_plus_id_times_id_is_accepted() {
        let (grammar, table) = arithmetic();
        let tokens = parse_token_stream("id\n+\nid\n*\nid\n");
        let outcome = parse(&grammar, &table, &tokens, Log::None).unwrap();
        assert!(outcome.accepted);
        assert!(matches!(outcome.steps.last().unwrap().action, StepAction::Accept));
    }

    #[test]
    fn trailing_operator_is_a_parse_error() {
        let (grammar, table) = arithmetic();
        let tokens = parse_token_stream("id\n+\n");
        assert!(parse(&grammar, &table, &tokens, Log::None).is_err());
    }

    #[test]
    fn literal_comma_line_parses_as_the_comma_terminal() {
        let tokens = parse_token_stream("id\n,\nid\n");
        assert_eq!(tokens, vec!["id".to_string(), ",".to_string(), "id".to_string()]);
    }
}
