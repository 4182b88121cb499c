//! The regex front end (§4.A–§4.B of the design): translate surface regex
//! syntax into a canonical postfix operator stream that [crate::automaton]
//! can turn into an NFA or an augmented syntax tree.
//!
//! This module owns no automaton state — it is a pure text-to-token
//! pipeline, kept deliberately small so the harder automaton code can stay
//! free of string handling entirely.

mod preprocessor;
mod shunting_yard;
mod token;

pub use token::RegexToken;

use crate::error::RegexError;

/// Compile raw regex text to a postfix token stream, ready for
/// [`crate::automaton::thompson::build`] or
/// [`crate::automaton::syntax_tree::build_augmented_tree`].
///
/// The literal pattern text `&` is recognized as the epsilon acceptor
/// (§9 open question: "treat `&` alone as an acceptor of ε") and compiles
/// to an empty postfix stream; every other empty string is a
/// [`crate::error::SyntaxError`].
pub fn compile_postfix(raw: &str) -> Result<Vec<RegexToken>, RegexError> {
    if raw == "&" {
        return Ok(Vec::new());
    }
    let infix = preprocessor::preprocess(raw)?;
    let postfix = shunting_yard::to_postfix(&infix)?;
    Ok(postfix)
}

#[cfg(test)]
mod __tests__ {
    use super::*;

    #[test]
    fn epsilon_marker_compiles_to_empty_postfix() {
        assert_eq!(compile_postfix("&").unwrap(), Vec::new());
    }

    #[test]
    fn empty_string_is_a_syntax_error() {
        assert!(compile_postfix("").is_err());
    }
}
