use super::token::RegexToken;
use crate::error::UnbalancedParenError;

/// Convert an infix operator stream (with implicit concatenation already
/// inserted) to postfix, per §4.B. Standard shunting-yard: unary postfix
/// `* + ?` bind tightest, then concatenation, then alternation;
/// parentheses switch contexts.
pub fn to_postfix(infix: &[RegexToken]) -> Result<Vec<RegexToken>, UnbalancedParenError> {
    let mut output = Vec::with_capacity(infix.len());
    let mut operators: Vec<RegexToken> = Vec::new();

    for &tok in infix {
        match tok {
            RegexToken::Literal(_) => output.push(tok),
            RegexToken::LParen => operators.push(tok),
            RegexToken::RParen => {
                loop {
                    match operators.pop() {
                        Some(RegexToken::LParen) => break,
                        Some(op) => output.push(op),
                        None => {
                            return Err(UnbalancedParenError::new(
                                "unmatched closing parenthesis",
                            ))
                        }
                    }
                }
            }
            RegexToken::Star | RegexToken::Plus | RegexToken::Question | RegexToken::Concat | RegexToken::Union => {
                while let Some(&top) = operators.last() {
                    if matches!(top, RegexToken::LParen) {
                        break;
                    }
                    if top.precedence() >= tok.precedence() {
                        output.push(operators.pop().unwrap());
                    } else {
                        break;
                    }
                }
                operators.push(tok);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if matches!(op, RegexToken::LParen) {
            return Err(UnbalancedParenError::new(
                "unmatched opening parenthesis",
            ));
        }
        output.push(op);
    }

    Ok(output)
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::regex::preprocessor::preprocess;

    fn postfix_of(pattern: &str) -> Vec<RegexToken> {
        let infix = preprocess(pattern).unwrap();
        to_postfix(&infix).unwrap()
    }

    #[test]
    fn concatenation_before_union() {
        // a.b|c  ->  ab.c|
        let postfix = postfix_of("ab|c");
        assert_eq!(
            postfix,
            vec![
                RegexToken::Literal('a'),
                RegexToken::Literal('b'),
                RegexToken::Concat,
                RegexToken::Literal('c'),
                RegexToken::Union,
            ]
        );
    }

    #[test]
    fn star_binds_tighter_than_concat() {
        let postfix = postfix_of("a*b");
        assert_eq!(
            postfix,
            vec![
                RegexToken::Literal('a'),
                RegexToken::Star,
                RegexToken::Literal('b'),
                RegexToken::Concat,
            ]
        );
    }

    #[test]
    fn parens_override_precedence() {
        let postfix = postfix_of("(a|b)c");
        assert_eq!(
            postfix,
            vec![
                RegexToken::Literal('a'),
                RegexToken::Literal('b'),
                RegexToken::Union,
                RegexToken::Literal('c'),
                RegexToken::Concat,
            ]
        );
    }

    #[test]
    fn detects_unmatched_close_paren() {
        let infix = preprocess("a)").unwrap();
        assert!(to_postfix(&infix).is_err());
    }

    #[test]
    fn detects_unmatched_open_paren() {
        let infix = preprocess("(a").unwrap();
        assert!(to_postfix(&infix).is_err());
    }
}
