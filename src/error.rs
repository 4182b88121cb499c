//! Crate-wide error taxonomy.
//!
//! Each construction phase in [crate::regex], [crate::automaton] and
//! [crate::grammar] fails with its own narrow error struct rather than a
//! single catch-all, so a caller can match on the kind without string
//! parsing. `LexError` from the specification's error table has no type
//! here: a scanner failure is not fatal and surfaces as an `ERR` token in
//! the output stream instead (see [crate::scanner::Scanner::tokenize]).

use std::fmt::{Display, Formatter};

/// A malformed character class or otherwise unparsable regex surface syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyntaxError: {}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Mismatched parentheses discovered during infix-to-postfix conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbalancedParenError {
    pub message: String,
}

impl UnbalancedParenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for UnbalancedParenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnbalancedParenError: {}", self.message)
    }
}

impl std::error::Error for UnbalancedParenError {}

/// An operator was applied with too few operands on the postfix stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityError {
    pub message: String,
}

impl ArityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ArityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArityError: {}", self.message)
    }
}

impl std::error::Error for ArityError {}

/// Aggregate error for the regex front end (§4.A–§4.C of the design).
///
/// Carried as a single type so [`crate::regex::compile_postfix`] and
/// friends can use `?` across preprocessing, shunting-yard and Thompson
/// construction without three separate `Result` signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    Syntax(SyntaxError),
    UnbalancedParen(UnbalancedParenError),
    Arity(ArityError),
}

impl Display for RegexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegexError::Syntax(e) => Display::fmt(e, f),
            RegexError::UnbalancedParen(e) => Display::fmt(e, f),
            RegexError::Arity(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for RegexError {}

impl From<SyntaxError> for RegexError {
    fn from(e: SyntaxError) -> Self {
        RegexError::Syntax(e)
    }
}

impl From<UnbalancedParenError> for RegexError {
    fn from(e: UnbalancedParenError) -> Self {
        RegexError::UnbalancedParen(e)
    }
}

impl From<ArityError> for RegexError {
    fn from(e: ArityError) -> Self {
        RegexError::Arity(e)
    }
}

/// A malformed production-rule grammar: missing `::=`, empty input, or no
/// declared non-terminals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub message: String,
}

impl GrammarError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}", self.message)
    }
}

impl std::error::Error for GrammarError {}

/// A shift-reduce or reduce-reduce conflict found while building the
/// ACTION table, identified by the offending state and lookahead terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SLRConflict {
    pub state: usize,
    pub terminal: String,
    pub existing: String,
    pub attempted: String,
}

impl SLRConflict {
    pub fn new(
        state: usize,
        terminal: impl Into<String>,
        existing: impl Into<String>,
        attempted: impl Into<String>,
    ) -> Self {
        Self {
            state,
            terminal: terminal.into(),
            existing: existing.into(),
            attempted: attempted.into(),
        }
    }
}

impl Display for SLRConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SLRConflict: state {} on '{}': {} conflicts with {}",
            self.state, self.terminal, self.existing, self.attempted
        )
    }
}

impl std::error::Error for SLRConflict {}

/// An undefined ACTION or GOTO entry reached by the shift-reduce driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pointer: usize, message: impl Into<String>) -> Self {
        Self {
            pointer,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseError at token {}: {}", self.pointer, self.message)
    }
}

impl std::error::Error for ParseError {}
