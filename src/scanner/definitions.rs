use std::collections::{BTreeMap, BTreeSet};

use crate::error::SyntaxError;
use crate::util::Log;

/// The `%ignore` marker that flags a pattern as never reaching the token
/// stream (whitespace and comments, typically).
const IGNORE_FLAG: &str = "%ignore";

/// Everything `load_definitions` extracted from a regex-definition file
/// (§6, §4.P): the patterns to compile into a DFA, the subset of pattern
/// names to discard after matching, and the reserved-word map built by the
/// uppercase-name/lowercase-literal heuristic.
#[derive(Debug, Clone, Default)]
pub struct LoadedDefinitions {
    /// `(name, regex)` pairs in declaration order — declaration order is
    /// priority order (§4.H).
    pub patterns: Vec<(String, String)>,
    pub ignore: BTreeSet<String>,
    /// lexeme → reserved kind name, e.g. `"if" → "IF"`.
    pub reserved: BTreeMap<String, String>,
}

/// Parse a regex-definition file: one `NAME: regex [%ignore]` declaration
/// per non-blank, non-comment line (`#` starts a comment).
///
/// A name declared twice overwrites the earlier regex at its original
/// position in priority order and is reported at `Log::Default` — this is
/// a diagnostic, not a [`SyntaxError`], since the later declaration is
/// well-formed on its own.
///
/// A declaration whose name is all-uppercase ASCII and whose regex is
/// exactly the lowercased name (e.g. `IF: if`) is recognized as a reserved
/// word: it is recorded in `reserved` in addition to being compiled into
/// the DFA like any other declaration, so that it is still a candidate
/// pattern label the scanner can match — the reserved-word map is purely
/// additive metadata a post-classification step (§4.H) consults, never a
/// substitute for the pattern itself.
pub fn load_definitions(text: &str, log: Log<&'static str>) -> Result<LoadedDefinitions, SyntaxError> {
    let mut patterns: Vec<(String, String)> = Vec::new();
    let mut position_of: BTreeMap<String, usize> = BTreeMap::new();
    let mut ignore = BTreeSet::new();
    let mut reserved = BTreeMap::new();

    for (line_number, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, rest) = line.split_once(':').ok_or_else(|| {
            SyntaxError::new(format!("line {}: expected 'NAME: regex'", line_number + 1))
        })?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(SyntaxError::new(format!(
                "line {}: pattern name is empty",
                line_number + 1
            )));
        }

        let mut fields: Vec<&str> = rest.split_whitespace().collect();
        let is_ignored = matches!(fields.last(), Some(&IGNORE_FLAG));
        if is_ignored {
            fields.pop();
        }
        if fields.is_empty() {
            return Err(SyntaxError::new(format!(
                "line {}: pattern '{}' has no regex",
                line_number + 1,
                name
            )));
        }
        let regex = fields.join("");

        if is_reserved_word_literal(&name, &regex) {
            reserved.insert(regex.clone(), name.clone());
        }

        if let Some(&index) = position_of.get(&name) {
            log.trace(|| format!("pattern '{name}' redeclared, overwriting its earlier regex"));
            patterns[index].1 = regex;
        } else {
            position_of.insert(name.clone(), patterns.len());
            patterns.push((name.clone(), regex));
        }
        if is_ignored {
            ignore.insert(name);
        }
    }

    if patterns.is_empty() && reserved.is_empty() {
        return Err(SyntaxError::new("definition file declares no patterns"));
    }

    Ok(LoadedDefinitions {
        patterns,
        ignore,
        reserved,
    })
}

fn is_reserved_word_literal(name: &str, regex: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_uppercase())
        && regex == name.to_ascii_lowercase()
}

#[cfg(test)]
mod __tests__ {
    use super::*;

    #[test]
    fn reserved_word_heuristic_is_additive_metadata_not_a_substitute_for_the_pattern() {
        let loaded = load_definitions(
            "IF: if\nID: [a-z][a-z0-9]*\nNUM: [0-9]+\nWS: [ \\t]+ %ignore\n",
            Log::None,
        )
        .unwrap();
        assert_eq!(loaded.reserved.get("if"), Some(&"IF".to_string()));
        assert!(loaded.patterns.iter().any(|(name, _)| name == "IF"));
        assert!(loaded.ignore.contains("WS"));
    }

    #[test]
    fn a_definition_file_of_only_reserved_words_still_compiles_a_pattern() {
        let loaded = load_definitions("WHILE: while\n", Log::None).unwrap();
        assert_eq!(loaded.reserved.get("while"), Some(&"WHILE".to_string()));
        assert_eq!(loaded.patterns, vec![("WHILE".to_string(), "while".to_string())]);
    }

    #[test]
    fn duplicate_name_overwrites_regex_in_place() {
        let loaded = load_definitions("NUM: [0-9]+\nID: [a-z]+\nNUM: [0-9]+(\\.[0-9]+)?\n", Log::None).unwrap();
        let positions: Vec<&str> = loaded.patterns.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(positions, vec!["NUM", "ID"]);
        let (_, num_regex) = &loaded.patterns[0];
        assert_eq!(num_regex, "[0-9]+(\\.[0-9]+)?");
    }

    #[test]
    fn malformed_line_is_a_syntax_error() {
        assert!(load_definitions("NOT_A_DECLARATION\n", Log::None).is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let loaded = load_definitions("# a comment\n\nID: [a-z]+\n", Log::None).unwrap();
        assert_eq!(loaded.patterns.len(), 1);
    }
}
