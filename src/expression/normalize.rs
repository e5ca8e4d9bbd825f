//! Normalizer and tokenizer.
//!
//! User notation is lexed into lexemes, rewritten into the canonical form
//! (one symbol per function/operator/constant, explicit `*` for juxtaposition,
//! `~` for unary minus) and then validated or tokenized from that form.
//!
//! Canonical alphabet:
//! * operators `+ - * / ^ m` (`m` is `mod`)
//! * functions `s c t S C T l L Q` for sin/cos/tan/asin/acos/atan/ln/log/sqrt
//! * `~` unary negation, `P` the constant π, `E` Euler's number, `x` the variable
//! * numeric literals `digits[.digits][e[+-]digits]`, where `e` is only ever
//!   the exponent tag of a literal

use crate::errors::{CalcError, Result};
use crate::expression::token::{Constant, Function, Operator, Token, EXPONENT_SYMBOL, VARIABLE_SYMBOL};

/// names recognised in user input, mapped to their canonical symbol
const NAMES: [(&str, char); 13] = [
    ("asin", 'S'),
    ("acos", 'C'),
    ("atan", 'T'),
    ("sqrt", 'Q'),
    ("sin", 's'),
    ("cos", 'c'),
    ("tan", 't'),
    ("log", 'L'),
    ("ln", 'l'),
    ("mod", 'm'),
    ("pi", 'P'),
    ("x", VARIABLE_SYMBOL),
    ("e", 'E'),
];

const PI_GLYPH: char = 'π';
const NEGATE: char = '~';

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Number(String),
    Symbol(char),
}

fn invalid(infix: &str) -> CalcError {
    CalcError::InvalidExpression {
        expression: infix.to_string(),
    }
}

/// Rewrite user input into the canonical single-symbol form.
pub fn normalize(infix: &str) -> Result<String> {
    let lexemes = lex(infix)?;
    let mut out = String::with_capacity(infix.len() * 2);
    let mut prev: Option<char> = None;

    for lexeme in lexemes {
        match lexeme {
            Lexeme::Number(text) => {
                if prev.map_or(false, ends_operand) {
                    out.push('*');
                }
                out.push_str(&text);
                // any digit stands in for "a literal just ended"
                prev = Some('0');
            }
            Lexeme::Symbol(c) => {
                let unary_position = prev.map_or(true, |p| p == '(' || is_operator(p) || p == NEGATE);
                if unary_position && c == '-' {
                    out.push(NEGATE);
                    prev = Some(NEGATE);
                    continue;
                }
                if unary_position && c == '+' {
                    continue;
                }
                if starts_operand(c) && prev.map_or(false, ends_operand) {
                    out.push('*');
                }
                out.push(c);
                prev = Some(c);
            }
        }
    }

    Ok(out)
}

/// Validate user input: it must normalize and pass the canonical checks.
pub fn validate(infix: &str) -> bool {
    normalize(infix).map_or(false, |canonical| validate_canonical(&canonical))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Operand,
    Operator,
    Function { needs_paren: bool },
    Open,
}

/// One left-to-right pass over a canonical string.
pub fn validate_canonical(canonical: &str) -> bool {
    if canonical.is_empty() || canonical.contains("()") {
        return false;
    }

    let chars: Vec<char> = canonical.chars().collect();
    let mut depth: i32 = 0;
    let mut prev = Prev::Start;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let operand_allowed = matches!(prev, Prev::Start | Prev::Operator | Prev::Open)
            || prev == Prev::Function { needs_paren: false };

        if c.is_ascii_digit() || c == '.' {
            match scan_number(&chars, i) {
                Some(end) if operand_allowed => {
                    i = end;
                    prev = Prev::Operand;
                    continue;
                }
                _ => return false,
            }
        }

        match c {
            _ if c == VARIABLE_SYMBOL || Constant::from_symbol(c).is_some() => {
                if !operand_allowed {
                    return false;
                }
                prev = Prev::Operand;
            }
            _ if Operator::from_symbol(c).is_some() => {
                if prev != Prev::Operand {
                    return false;
                }
                prev = Prev::Operator;
            }
            _ if Function::from_symbol(c).is_some() => {
                if !operand_allowed {
                    return false;
                }
                let needs_paren = Function::from_symbol(c).map_or(false, |f| f.requires_parenthesis());
                prev = Prev::Function { needs_paren };
            }
            '(' => {
                if prev == Prev::Operand {
                    return false;
                }
                depth += 1;
                prev = Prev::Open;
            }
            ')' => {
                depth -= 1;
                if depth < 0 || prev != Prev::Operand {
                    return false;
                }
                prev = Prev::Operand;
            }
            _ => return false,
        }
        i += 1;
    }

    depth == 0 && prev == Prev::Operand
}

/// Split a canonical string into tokens.
pub fn tokenize(canonical: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = canonical.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() || c == '.' {
            let end = scan_number(&chars, i).ok_or_else(|| invalid(canonical))?;
            let text: String = chars[i..end].iter().collect();
            let value = text.parse::<f64>().map_err(|_| invalid(canonical))?;
            tokens.push(Token::Number(value));
            i = end;
            continue;
        }

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            _ if c == VARIABLE_SYMBOL => Token::Variable,
            _ => {
                if let Some(op) = Operator::from_symbol(c) {
                    Token::Operator(op)
                } else if let Some(func) = Function::from_symbol(c) {
                    Token::Function(func)
                } else if let Some(constant) = Constant::from_symbol(c) {
                    Token::Constant(constant)
                } else {
                    return Err(invalid(canonical));
                }
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

fn lex(infix: &str) -> Result<Vec<Lexeme>> {
    let text: Vec<char> = infix
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect();
    let mut lexemes = Vec::new();
    let mut i = 0;

    while i < text.len() {
        let c = text[i];

        if c.is_ascii_digit() || c == '.' {
            let mut end = i;
            while end < text.len() && (text[end].is_ascii_digit() || text[end] == '.') {
                end += 1;
            }
            end = exponent_end(&text, end).unwrap_or(end);
            lexemes.push(Lexeme::Number(text[i..end].iter().collect()));
            i = end;
            continue;
        }

        if c == PI_GLYPH {
            lexemes.push(Lexeme::Symbol(Constant::Pi.symbol()));
            i += 1;
            continue;
        }

        if "+-*/^()".contains(c) {
            lexemes.push(Lexeme::Symbol(c));
            i += 1;
            continue;
        }

        let name = NAMES.iter().find(|(name, _)| {
            let len = name.chars().count();
            i + len <= text.len() && text[i..i + len].iter().copied().eq(name.chars())
        });
        match name {
            Some((name, symbol)) => {
                lexemes.push(Lexeme::Symbol(*symbol));
                i += name.len();
            }
            None => return Err(invalid(infix)),
        }
    }

    Ok(lexemes)
}

/// If `text[at..]` is an exponent suffix (`e`, optional sign, digits),
/// return the index just past it.
fn exponent_end(text: &[char], at: usize) -> Option<usize> {
    if text.get(at) != Some(&EXPONENT_SYMBOL) {
        return None;
    }
    let mut j = at + 1;
    if matches!(text.get(j), Some('+') | Some('-')) {
        j += 1;
    }
    let digits_start = j;
    while j < text.len() && text[j].is_ascii_digit() {
        j += 1;
    }
    (j > digits_start).then_some(j)
}

/// Greedy literal scan; `None` if the literal is malformed
/// (no digits, more than one decimal point).
fn scan_number(chars: &[char], start: usize) -> Option<usize> {
    let mut end = start;
    let mut dots = 0;
    let mut digits = 0;
    while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
        if chars[end] == '.' {
            dots += 1;
        } else {
            digits += 1;
        }
        end += 1;
    }
    if dots > 1 || digits == 0 {
        return None;
    }
    if chars.get(end) == Some(&EXPONENT_SYMBOL) {
        return exponent_end(chars, end);
    }
    Some(end)
}

fn is_operator(c: char) -> bool {
    Operator::from_symbol(c).is_some()
}

fn ends_operand(c: char) -> bool {
    c.is_ascii_digit() || c == ')' || c == VARIABLE_SYMBOL || Constant::from_symbol(c).is_some()
}

fn starts_operand(c: char) -> bool {
    c == '(' || c == VARIABLE_SYMBOL || Constant::from_symbol(c).is_some() || Function::from_symbol(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        assert_eq!(normalize("sin(x)+asin(x)").unwrap(), "s(x)+S(x)");
        assert_eq!(normalize("sqrt(4) + log(100) + ln(e)").unwrap(), "Q(4)+L(100)+l(E)");
        assert_eq!(normalize("ACOS(1)*Atan(1)").unwrap(), "C(1)*T(1)");
        assert_eq!(normalize("7 mod 3").unwrap(), "7m3");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(normalize("2x").unwrap(), "2*x");
        assert_eq!(normalize("x2").unwrap(), "x*2");
        assert_eq!(normalize("(1)(2)").unwrap(), "(1)*(2)");
        assert_eq!(normalize("2(3)").unwrap(), "2*(3)");
        assert_eq!(normalize("(3)2").unwrap(), "(3)*2");
        assert_eq!(normalize("2π").unwrap(), "2*P");
        assert_eq!(normalize("3sin(x)").unwrap(), "3*s(x)");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(normalize("-x").unwrap(), "~x");
        assert_eq!(normalize("-(2+3)").unwrap(), "~(2+3)");
        assert_eq!(normalize("2*-3").unwrap(), "2*~3");
        assert_eq!(normalize("(-7) mod 3").unwrap(), "(~7)m3");
        assert_eq!(normalize("2-3").unwrap(), "2-3");
        assert_eq!(normalize("--2").unwrap(), "~~2");
        assert_eq!(normalize("+2").unwrap(), "2");
    }

    #[test]
    fn test_scientific_notation_vs_euler() {
        assert_eq!(normalize("1e-3").unwrap(), "1e-3");
        assert_eq!(normalize("2.5E+4").unwrap(), "2.5e+4");
        assert_eq!(normalize("2e").unwrap(), "2*E");
        assert_eq!(normalize("e-3").unwrap(), "E-3");
        assert_eq!(normalize("2e+x").unwrap(), "2*E+x");
    }

    #[test]
    fn test_unknown_characters() {
        assert!(normalize("2 & 3").is_err());
        assert!(normalize("foo(1)").is_err());
        assert!(normalize("y+1").is_err());
    }

    #[test]
    fn test_validation_rules() {
        assert!(validate("2+3*4"));
        assert!(validate("sin(x)^2 + cos(x)^2"));
        assert!(validate("-(-x)"));
        assert!(validate("2^-2"));

        // alphabet
        assert!(!validate("2#3"));
        // parentheses
        assert!(!validate("(2+3"));
        assert!(!validate(")2+3("));
        assert!(!validate("(2+3))"));
        // adjacent operators
        assert!(!validate("2*/3"));
        assert!(!validate("2+"));
        assert!(!validate("*2"));
        // function without parenthesis
        assert!(!validate("sin x"));
        assert!(!validate("sqrt"));
        // decimal points
        assert!(!validate("1.2.3"));
        assert!(!validate("."));
        // empty
        assert!(!validate(""));
        assert!(!validate("   "));
        assert!(!validate("()"));
        assert!(!validate("2*()"));
    }

    #[test]
    fn test_validation_is_repeatable() {
        for input in ["2+2", "2++", "sin(x", "x^x"] {
            assert_eq!(validate(input), validate(input));
        }
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("2.5*s(x)-~P").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.5),
                Token::Operator(Operator::Mul),
                Token::Function(Function::Sin),
                Token::LeftParen,
                Token::Variable,
                Token::RightParen,
                Token::Operator(Operator::Sub),
                Token::Function(Function::Negate),
                Token::Constant(Constant::Pi),
            ]
        );
        assert_eq!(tokenize("1e-3").unwrap(), vec![Token::Number(0.001)]);
        assert!(tokenize("2#").is_err());
    }
}
