//! Maximal-munch scanning (§4.H): turn a regex-definition file and a
//! source text into a token stream, using whichever DFA construction the
//! caller asks for.

mod definitions;
mod symbol_table;
mod token;

pub use definitions::{load_definitions, LoadedDefinitions};
pub use symbol_table::SymbolTable;
pub use token::{Attribute, Token, ERROR_KIND};

use std::collections::{BTreeMap, BTreeSet};

use crate::automaton::Dfa;
use crate::error::RegexError;
use crate::util::Log;

const ID_KIND: &str = "ID";
const NUM_KIND: &str = "NUM";

/// A compiled scanner: a minimized DFA plus the ambient facts a raw DFA
/// does not carry — which pattern names are swallowed rather than
/// tokenized, and which literal lexemes are reserved words.
#[derive(Debug, Clone)]
pub struct Scanner {
    dfa: Dfa,
    ignore: BTreeSet<String>,
    reserved: BTreeMap<String, String>,
}

impl Scanner {
    pub fn new(dfa: Dfa, ignore: BTreeSet<String>, reserved: BTreeMap<String, String>) -> Self {
        Self { dfa, ignore, reserved }
    }

    /// Parse a regex-definition file and compile it to a minimized DFA via
    /// Thompson's construction, the default front end for definition
    /// files (§4.P).
    pub fn from_definitions(text: &str, log: Log<&'static str>) -> Result<Scanner, RegexError> {
        let loaded = load_definitions(text, log)?;
        let dfa = Dfa::from_patterns_thompson(&loaded.patterns, log)?;
        Ok(Scanner::new(dfa, loaded.ignore, loaded.reserved))
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Scan `source` to completion, returning every token (including
    /// [`ERROR_KIND`] tokens for unmatchable text) alongside the symbol
    /// table built while scanning.
    ///
    /// Each step performs maximal munch with last-accept backtracking: the
    /// DFA is driven as far as it will go, remembering the longest prefix
    /// at which it was in an accepting state, then rewinding to that
    /// prefix. A prefix of length zero — no accepting state was ever
    /// reached, including at the empty prefix — emits a one-character
    /// [`ERROR_KIND`] token and advances by one character so a single bad
    /// byte never stalls the whole scan.
    pub fn tokenize(&self, source: &str) -> (Vec<Token>, SymbolTable) {
        let chars: Vec<char> = source.chars().collect();
        let mut tokens = Vec::new();
        let mut symbols = SymbolTable::new();
        let mut pos = 0;

        while pos < chars.len() {
            match self.longest_match(&chars[pos..]) {
                Some((length, label)) => {
                    let lexeme: String = chars[pos..pos + length].iter().collect();
                    pos += length;
                    if self.ignore.contains(&label) {
                        continue;
                    }
                    tokens.push(self.classify(&label, lexeme, &mut symbols));
                }
                None => {
                    tokens.push(Token::new(ERROR_KIND, chars[pos].to_string(), Attribute::None));
                    pos += 1;
                }
            }
        }

        (tokens, symbols)
    }

    /// Walk the DFA over `chars`, returning the length and pattern label of
    /// the longest accepted prefix, or `None` if even the empty prefix is
    /// not accepting and no transition advances the scan.
    fn longest_match(&self, chars: &[char]) -> Option<(usize, String)> {
        let mut state = self.dfa.start;
        let mut last_accept = self.dfa.pattern_at(state).map(|label| (0usize, label.to_string()));

        for (offset, &c) in chars.iter().enumerate() {
            match self.dfa.transition(state, c) {
                Some(next) => {
                    state = next;
                    if let Some(label) = self.dfa.pattern_at(state) {
                        last_accept = Some((offset + 1, label.to_string()));
                    }
                }
                None => break,
            }
        }

        last_accept
    }

    /// Apply reserved-word promotion and `ID`/`NUM` attribute computation
    /// to a recognized lexeme (§4.H). The reserved-word lookup runs first
    /// and unconditionally, regardless of which pattern label matched —
    /// a catch-all pattern need not be named `ID` for its lexemes to be
    /// eligible for promotion.
    fn classify(&self, label: &str, lexeme: String, symbols: &mut SymbolTable) -> Token {
        if let Some(reserved_kind) = self.reserved.get(&lexeme.to_lowercase()) {
            return Token::new(reserved_kind.clone(), lexeme, Attribute::None);
        }
        if label == ID_KIND {
            let index = symbols.intern(&lexeme);
            return Token::new(ID_KIND, lexeme, Attribute::SymbolIndex(index));
        }
        if label == NUM_KIND {
            let attribute = if lexeme.contains('.') {
                lexeme.parse::<f64>().map(Attribute::Float)
            } else {
                lexeme.parse::<i64>().map(Attribute::Int)
            };
            if let Ok(attribute) = attribute {
                return Token::new(NUM_KIND, lexeme, attribute);
            }
        }
        Token::new(label, lexeme, Attribute::None)
    }
}

#[cfg(test)]
mod __tests__ {
    use super::*;

    fn sample_scanner() -> Scanner {
        Scanner::from_definitions(
            "IF: if\nID: [a-zA-Z_][a-zA-Z0-9_]*\nNUM: [0-9]+\nPLUS: \\+\nWS: [ ]+ %ignore\n",
            Log::None,
        )
        .unwrap()
    }

    #[test]
    fn maximal_munch_prefers_the_longer_identifier_over_the_keyword() {
        let scanner = sample_scanner();
        let (tokens, _) = scanner.tokenize("iffy");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, "ID");
        assert_eq!(tokens[0].lexeme, "iffy");
    }

    #[test]
    fn reserved_word_is_promoted_from_id() {
        let scanner = sample_scanner();
        let (tokens, _) = scanner.tokenize("if");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, "IF");
    }

    #[test]
    fn whitespace_is_swallowed_and_symbols_are_interned_once() {
        let scanner = sample_scanner();
        let (tokens, symbols) = scanner.tokenize("count count total");
        let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["ID", "ID", "ID"]);
        assert_eq!(symbols.len(), 2);
        assert_eq!(tokens[0].attribute, tokens[1].attribute);
        assert_ne!(tokens[1].attribute, tokens[2].attribute);
    }

    #[test]
    fn unmatchable_character_emits_an_error_token_and_advances() {
        let scanner = sample_scanner();
        let (tokens, _) = scanner.tokenize("x @ y");
        let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["ID", "ERR", "ID"]);
        assert_eq!(tokens[1].lexeme, "@");
    }

    #[test]
    fn num_attribute_parses_as_integer() {
        let scanner = sample_scanner();
        let (tokens, _) = scanner.tokenize("42");
        assert_eq!(tokens[0].attribute, Attribute::Int(42));
    }
}
