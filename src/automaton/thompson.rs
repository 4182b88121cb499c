use super::nfa::{NfaArena, NfaFragment};
use crate::error::ArityError;
use crate::regex::RegexToken;

/// Interpret a postfix regex token stream as a stack machine producing
/// ε-NFA fragments, per §4.C.
///
/// An empty `postfix` (the `&` epsilon marker, see
/// [`crate::regex::compile_postfix`]) builds a direct ε-acceptor: a fresh
/// start with a single ε-edge to a fresh accept, matching the zero-length
/// string at every position.
pub fn build(postfix: &[RegexToken], arena: &mut NfaArena) -> Result<NfaFragment, ArityError> {
    if postfix.is_empty() {
        let start = arena.fresh_state();
        let accept = arena.fresh_state();
        arena.add_epsilon(start, accept);
        return Ok(NfaFragment { start, accept });
    }

    let mut stack: Vec<NfaFragment> = Vec::new();

    for &tok in postfix {
        match tok {
            RegexToken::Literal(c) => {
                let start = arena.fresh_state();
                let accept = arena.fresh_state();
                arena.add_transition(start, c, accept);
                stack.push(NfaFragment { start, accept });
            }
            RegexToken::Concat => {
                let n2 = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("concatenation missing right operand"))?;
                let n1 = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("concatenation missing left operand"))?;
                arena.add_epsilon(n1.accept, n2.start);
                stack.push(NfaFragment {
                    start: n1.start,
                    accept: n2.accept,
                });
            }
            RegexToken::Union => {
                let n2 = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("alternation missing right operand"))?;
                let n1 = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("alternation missing left operand"))?;
                let start = arena.fresh_state();
                let accept = arena.fresh_state();
                arena.add_epsilon(start, n1.start);
                arena.add_epsilon(start, n2.start);
                arena.add_epsilon(n1.accept, accept);
                arena.add_epsilon(n2.accept, accept);
                stack.push(NfaFragment { start, accept });
            }
            RegexToken::Star => {
                let n = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("star missing operand"))?;
                let start = arena.fresh_state();
                let accept = arena.fresh_state();
                arena.add_epsilon(start, n.start);
                arena.add_epsilon(start, accept);
                arena.add_epsilon(n.accept, n.start);
                arena.add_epsilon(n.accept, accept);
                stack.push(NfaFragment { start, accept });
            }
            RegexToken::Plus => {
                let n = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("plus missing operand"))?;
                let start = arena.fresh_state();
                let accept = arena.fresh_state();
                arena.add_epsilon(start, n.start);
                arena.add_epsilon(n.accept, n.start);
                arena.add_epsilon(n.accept, accept);
                stack.push(NfaFragment { start, accept });
            }
            RegexToken::Question => {
                let n = stack
                    .pop()
                    .ok_or_else(|| ArityError::new("optional missing operand"))?;
                let start = arena.fresh_state();
                let accept = arena.fresh_state();
                arena.add_epsilon(start, n.start);
                arena.add_epsilon(start, accept);
                arena.add_epsilon(n.accept, accept);
                stack.push(NfaFragment { start, accept });
            }
            RegexToken::LParen | RegexToken::RParen => {
                return Err(ArityError::new(
                    "unexpected grouping token in postfix stream",
                ))
            }
        }
    }

    if stack.len() != 1 {
        return Err(ArityError::new(format!(
            "malformed postfix expression: stack size is {} at end of construction",
            stack.len()
        )));
    }
    Ok(stack.pop().unwrap())
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::automaton::nfa::epsilon_closure;
    use crate::regex::compile_postfix;

    #[test]
    fn literal_builds_two_state_fragment() {
        let mut arena = NfaArena::new();
        let postfix = compile_postfix("a").unwrap();
        let frag = build(&postfix, &mut arena).unwrap();
        assert_ne!(frag.start, frag.accept);
        assert!(arena.state(frag.start).transitions.contains_key(&'a'));
    }

    #[test]
    fn epsilon_marker_builds_direct_acceptor() {
        let mut arena = NfaArena::new();
        let frag = build(&[], &mut arena).unwrap();
        let closure = epsilon_closure(&arena, [frag.start]);
        assert!(closure.contains(&frag.accept));
    }

    #[test]
    fn star_accept_state_has_no_outgoing_on_empty_stack() {
        let mut arena = NfaArena::new();
        let postfix = compile_postfix("a*").unwrap();
        let frag = build(&postfix, &mut arena).unwrap();
        let closure = epsilon_closure(&arena, [frag.start]);
        assert!(closure.contains(&frag.accept), "a* must be nullable");
    }
}
