use std::fmt::{self, Display, Formatter};

/// The literal name `Scanner::tokenize` gives to a lexeme it could not
/// match against any pattern — not a Rust error, since one bad character
/// does not abort the whole token stream (§7: "a scanner failure is not
/// fatal").
pub const ERROR_KIND: &str = "ERR";

/// Per-token payload beyond its kind and raw lexeme text.
///
/// `ID` tokens carry their [`crate::scanner::symbol_table::SymbolTable`]
/// index rather than the lexeme itself, so two occurrences of the same
/// identifier compare equal by attribute without a second string
/// comparison. `NUM` tokens carry a parsed numeric value, falling back to
/// `Float` only when the lexeme does not fit in an `i64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    None,
    SymbolIndex(usize),
    Int(i64),
    Float(f64),
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::None => write!(f, "-"),
            Attribute::SymbolIndex(i) => write!(f, "{i}"),
            Attribute::Int(i) => write!(f, "{i}"),
            Attribute::Float(x) => write!(f, "{x}"),
        }
    }
}

/// One scanned token: its kind (a pattern name, a reserved-word name, or
/// [`ERROR_KIND`]), the exact source text it was matched from, and its
/// attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: String,
    pub lexeme: String,
    pub attribute: Attribute,
}

impl Token {
    pub fn new(kind: impl Into<String>, lexeme: impl Into<String>, attribute: Attribute) -> Self {
        Self {
            kind: kind.into(),
            lexeme: lexeme.into(),
            attribute,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ERROR_KIND
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Attribute::None => write!(f, "{}", self.kind),
            attribute => write!(f, "{}({})", self.kind, attribute),
        }
    }
}
