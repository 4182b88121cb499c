use super::token::RegexToken;
use crate::error::SyntaxError;

/// Expand a `[ ... ]` character class body (the characters strictly between
/// the brackets) into its member characters, per §4.A:
///
/// - `\c` inside the class escapes `c` — it never starts a range.
/// - `x-y` expands to every code point in `[x, y]` when both ends are
///   alphabetic, or both are ASCII digits, and `x <= y`; otherwise the `-`
///   and its neighbours are kept as plain literal members.
fn expand_char_class(content: &[char]) -> Result<Vec<char>, SyntaxError> {
    if content.is_empty() {
        return Err(SyntaxError::new("empty character class `[]`"));
    }
    let mut members = Vec::new();
    let mut i = 0;
    while i < content.len() {
        if content[i] == '\\' {
            if i + 1 >= content.len() {
                return Err(SyntaxError::new(
                    "dangling escape inside character class",
                ));
            }
            members.push(content[i + 1]);
            i += 2;
            continue;
        }
        if i + 2 < content.len() && content[i + 1] == '-' && content[i + 2] != '\\' {
            let start = content[i];
            let end = content[i + 2];
            let is_alpha_range = start.is_alphabetic() && end.is_alphabetic();
            let is_digit_range = start.is_ascii_digit() && end.is_ascii_digit();
            if (is_alpha_range || is_digit_range) && (start as u32) <= (end as u32) {
                for code in (start as u32)..=(end as u32) {
                    if let Some(c) = char::from_u32(code) {
                        members.push(c);
                    }
                }
                i += 3;
                continue;
            }
        }
        members.push(content[i]);
        i += 1;
    }
    Ok(members)
}

/// Locate the `]` matching the `[` at `open`, skipping escaped characters.
fn find_class_close(chars: &[char], open: usize) -> Result<usize, SyntaxError> {
    let mut j = open + 1;
    while j < chars.len() {
        if chars[j] == '\\' {
            j += 2;
            continue;
        }
        if chars[j] == ']' {
            return Ok(j);
        }
        j += 1;
    }
    Err(SyntaxError::new(format!(
        "unterminated character class starting at position {}",
        open
    )))
}

/// Push the expansion of a character class onto the token stream as
/// `(t1|t2|...|tn)`, or as a bare literal when there is a single member.
fn push_class_group(tokens: &mut Vec<RegexToken>, members: &[char]) {
    if members.len() == 1 {
        tokens.push(RegexToken::Literal(members[0]));
        return;
    }
    tokens.push(RegexToken::LParen);
    for (idx, c) in members.iter().enumerate() {
        if idx > 0 {
            tokens.push(RegexToken::Union);
        }
        tokens.push(RegexToken::Literal(*c));
    }
    tokens.push(RegexToken::RParen);
}

/// Tokenize raw regex text into a primary token stream: character classes
/// expanded, escapes resolved to their literal character, grouping and
/// operator symbols kept as-is. No implicit concatenation yet.
fn tokenize(raw: &str) -> Result<Vec<RegexToken>, SyntaxError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                if i + 1 >= chars.len() {
                    return Err(SyntaxError::new("dangling escape at end of pattern"));
                }
                tokens.push(RegexToken::Literal(chars[i + 1]));
                i += 2;
            }
            '[' => {
                let close = find_class_close(&chars, i)?;
                let members = expand_char_class(&chars[i + 1..close])?;
                push_class_group(&mut tokens, &members);
                i = close + 1;
            }
            '(' => {
                tokens.push(RegexToken::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(RegexToken::RParen);
                i += 1;
            }
            '*' => {
                tokens.push(RegexToken::Star);
                i += 1;
            }
            '+' => {
                tokens.push(RegexToken::Plus);
                i += 1;
            }
            '?' => {
                tokens.push(RegexToken::Question);
                i += 1;
            }
            '|' => {
                tokens.push(RegexToken::Union);
                i += 1;
            }
            c => {
                tokens.push(RegexToken::Literal(c));
                i += 1;
            }
        }
    }
    Ok(tokens)
}

/// Insert the implicit concatenation operator between every adjacent pair
/// of tokens `(t, t')` where `t` can end an operand and `t'` can start one.
fn insert_concat(tokens: Vec<RegexToken>) -> Vec<RegexToken> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for (idx, tok) in tokens.iter().enumerate() {
        out.push(*tok);
        if let Some(next) = tokens.get(idx + 1) {
            if tok.can_end_operand() && next.can_start_operand() {
                out.push(RegexToken::Concat);
            }
        }
    }
    out
}

/// Run the full preprocessing pass (§4.A): class expansion, escape
/// preservation, then implicit concatenation insertion.
///
/// An empty pattern is rejected with `SyntaxError` — see the empty-postfix
/// open question in the design notes. Callers that want an explicit
/// epsilon acceptor should special-case the literal text `&` before
/// calling this function, as [`crate::regex::compile_postfix`] does.
pub fn preprocess(raw: &str) -> Result<Vec<RegexToken>, SyntaxError> {
    if raw.is_empty() {
        return Err(SyntaxError::new("regex pattern must not be empty"));
    }
    let tokens = tokenize(raw)?;
    Ok(insert_concat(tokens))
}
