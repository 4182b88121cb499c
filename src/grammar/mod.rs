//! SLR(1) grammar generation and the shift-reduce driver (§4.I–§4.M): load
//! a context-free grammar, compute FIRST/FOLLOW, build the canonical
//! LR(0) collection, derive an SLR(1) ACTION/GOTO table, and drive it over
//! a token stream.

pub mod grammar;
pub mod parser;
pub mod slr;

pub use grammar::{load_grammar, Grammar, Item, Lr0Automaton, Production, EPSILON, END_OF_INPUT};
pub use parser::{parse, parse_token_stream, ParseOutcome, Step, StepAction};
pub use slr::{build_slr_table, Action, SlrTable};
