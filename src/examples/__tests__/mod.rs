use crate::automaton::Dfa;
use crate::grammar::{build_slr_table, load_grammar, parse, parse_token_stream, StepAction};
use crate::scanner::{Attribute, Scanner};
use crate::util::Log;

fn arithmetic_definitions() -> &'static str {
    "ID: [a-zA-Z_][a-zA-Z0-9_]*\nNUM: [0-9]+\nPLUS: \\+\nSTAR: \\*\nLPAREN: \\(\nRPAREN: \\)\nWS: [ \\t]+ %ignore\n"
}

#[test]
fn lexer_scans_an_arithmetic_expression_into_the_expected_kinds() {
    let scanner = Scanner::from_definitions(arithmetic_definitions(), Log::None).unwrap();
    let (tokens, _) = scanner.tokenize("x1 + 42 * (y)");
    let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ID", "PLUS", "NUM", "STAR", "LPAREN", "ID", "RPAREN"]);
}

#[test]
fn keyword_priority_beats_identifier_on_an_exact_match_but_not_a_prefix() {
    let scanner = Scanner::from_definitions(
        "WHILE: while\nID: [a-z]+\nWS: [ ]+ %ignore\n",
        Log::None,
    )
    .unwrap();

    let (exact, _) = scanner.tokenize("while");
    assert_eq!(exact[0].kind, "WHILE");

    let (prefix, _) = scanner.tokenize("whiley");
    assert_eq!(prefix[0].kind, "ID");
    assert_eq!(prefix[0].lexeme, "whiley");
}

#[test]
fn a_character_outside_every_pattern_becomes_an_error_token_without_stopping_the_scan() {
    let scanner = Scanner::from_definitions(arithmetic_definitions(), Log::None).unwrap();
    let (tokens, _) = scanner.tokenize("a # b");
    let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ID", "ERR", "ID"]);
}

#[test]
fn minimizing_the_classic_dragon_book_pattern_yields_four_states() {
    let dfa = Dfa::from_patterns_thompson(&[("MAIN".to_string(), "(a|b)*abb".to_string())], Log::None).unwrap();
    assert_eq!(dfa.states.len(), 4);
}

#[test]
fn slr_parser_accepts_a_well_formed_arithmetic_expression_and_traces_reductions() {
    let grammar = load_grammar("E ::= E + T | T\nT ::= T * F | F\nF ::= ( E ) | id\n").unwrap();
    let table = build_slr_table(&grammar).unwrap();
    let tokens = parse_token_stream("id\n*\nid\n+\nid\n");
    let outcome = parse(&grammar, &table, &tokens, Log::None).unwrap();

    assert!(outcome.accepted);
    let reduce_count = outcome
        .steps
        .iter()
        .filter(|step| matches!(step.action, StepAction::Reduce { .. }))
        .count();
    assert!(reduce_count >= 5, "expected at least 5 reductions, saw {reduce_count}");
}

#[test]
fn ambiguous_grammar_is_rejected_as_a_conflict_rather_than_silently_resolved() {
    let grammar = load_grammar("S ::= if E then S | if E then S else S | id\nE ::= id\n").unwrap();
    assert!(build_slr_table(&grammar).is_err());
}

#[test]
fn scanning_the_same_source_twice_produces_identical_token_streams() {
    let scanner = Scanner::from_definitions(arithmetic_definitions(), Log::None).unwrap();
    let (first, _) = scanner.tokenize("x + 1 * (y + 2)");
    let (second, _) = scanner.tokenize("x + 1 * (y + 2)");
    assert_eq!(first, second);
}

#[test]
fn maximal_munch_never_stops_at_a_shorter_accepting_prefix_when_a_longer_one_exists() {
    let scanner = Scanner::from_definitions("NUM: [0-9]+\nDOT: \\.\n", Log::None).unwrap();
    let (tokens, _) = scanner.tokenize("1234.5");
    let kinds_and_lexemes: Vec<(&str, &str)> = tokens.iter().map(|t| (t.kind.as_str(), t.lexeme.as_str())).collect();
    assert_eq!(kinds_and_lexemes, vec![("NUM", "1234"), ("DOT", "."), ("NUM", "5")]);
}

#[test]
fn symbol_table_assigns_the_same_index_to_repeated_identifiers_across_the_whole_scan() {
    let scanner = Scanner::from_definitions(arithmetic_definitions(), Log::None).unwrap();
    let (tokens, symbols) = scanner.tokenize("total total count total");
    assert_eq!(symbols.len(), 2);
    let Attribute::SymbolIndex(total_index) = tokens[0].attribute.clone() else {
        panic!("expected a symbol index attribute");
    };
    assert_eq!(tokens[1].attribute, Attribute::SymbolIndex(total_index));
    assert_eq!(tokens[3].attribute, Attribute::SymbolIndex(total_index));
    assert_ne!(tokens[2].attribute, Attribute::SymbolIndex(total_index));
}

#[test]
fn follow_of_the_augmented_start_symbol_is_always_just_end_of_input() {
    let grammar = load_grammar("E ::= E + T | T\nT ::= id\n").unwrap();
    let first = grammar.first_sets();
    let follow = grammar.follow_sets(&first);
    assert_eq!(follow[&grammar.start], [crate::grammar::END_OF_INPUT.to_string()].into_iter().collect());
}

#[test]
fn slr_driver_rejects_a_token_stream_the_grammar_cannot_produce() {
    let grammar = load_grammar("E ::= E + T | T\nT ::= id\n").unwrap();
    let table = build_slr_table(&grammar).unwrap();
    let tokens = parse_token_stream("id\nid\n");
    assert!(parse(&grammar, &table, &tokens, Log::None).is_err());
}
