//! A lexical and syntactic analyzer generator.
//!
//! Regex patterns compile down to a minimized DFA by either of two
//! interchangeable routes ([`automaton::Dfa::from_patterns_thompson`],
//! [`automaton::Dfa::from_patterns_followpos`]); a [`scanner::Scanner`]
//! drives that DFA with maximal munch to turn source text into tokens.
//! Independently, [`grammar::Grammar`] loads a context-free grammar,
//! derives its SLR(1) ACTION/GOTO tables, and [`grammar::parse`] drives
//! them over a token stream with a shift-reduce automaton.
//!
//! ```text
//! regex text ──▶ postfix tokens ──▶ NFA/tree ──▶ DFA ──▶ minimized DFA
//!                                                           │
//!                                                     Scanner::tokenize
//!                                                           │
//! grammar text ──▶ Grammar ──▶ SLR(1) table ──▶ parse ◀────┘
//! ```

pub mod automaton;
pub mod error;
#[cfg(test)]
mod examples;
pub mod grammar;
pub mod regex;
pub mod scanner;
mod util;

pub use error::{ArityError, GrammarError, ParseError, RegexError, SLRConflict, SyntaxError, UnbalancedParenError};
pub use util::Log;
