use crate::errors::{CalcError, Result};
use crate::expression::token::{Constant, Function, Operator, Token, VARIABLE_SYMBOL};

fn malformed(message: &str) -> CalcError {
    CalcError::MalformedPostfix {
        message: message.to_string(),
    }
}

/// Shunting-yard conversion of canonical tokens into postfix order.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) | Token::Variable | Token::Constant(_) => output.push(token),
            Token::Function(_) | Token::LeftParen => stack.push(token),
            Token::RightParen => {
                loop {
                    match stack.pop() {
                        Some(Token::LeftParen) => break,
                        Some(t) => output.push(t),
                        None => return Err(malformed("closing parenthesis without opening one")),
                    }
                }
                // a named function owns the group that just closed
                if let Some(&Token::Function(func)) = stack.last() {
                    if func.requires_parenthesis() {
                        stack.pop();
                        output.push(Token::Function(func));
                    }
                }
            }
            Token::Operator(op) => {
                while let Some(&top) = stack.last() {
                    let top_precedence = match top {
                        Token::Operator(o) => o.precedence(),
                        Token::Function(f) => f.precedence(),
                        _ => break,
                    };
                    let pops = if op.is_right_associative() {
                        top_precedence > op.precedence()
                    } else {
                        top_precedence >= op.precedence()
                    };
                    if !pops {
                        break;
                    }
                    stack.pop();
                    output.push(top);
                }
                stack.push(token);
            }
        }
    }

    while let Some(token) = stack.pop() {
        if token == Token::LeftParen {
            return Err(malformed("opening parenthesis without closing one"));
        }
        output.push(token);
    }

    Ok(output)
}

/// Whitespace-separated rendering of a postfix sequence.
pub fn postfix_to_string(postfix: &[Token]) -> String {
    postfix
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read back a whitespace-separated postfix string.
pub fn parse_postfix(text: &str) -> Result<Vec<Token>> {
    text.split_whitespace()
        .map(|part| {
            if let Ok(value) = part.parse::<f64>() {
                return Ok(Token::Number(value));
            }
            let mut chars = part.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(malformed(part));
            };
            if c == VARIABLE_SYMBOL {
                Ok(Token::Variable)
            } else if let Some(op) = Operator::from_symbol(c) {
                Ok(Token::Operator(op))
            } else if let Some(func) = Function::from_symbol(c) {
                Ok(Token::Function(func))
            } else if let Some(constant) = Constant::from_symbol(c) {
                Ok(Token::Constant(constant))
            } else {
                Err(malformed(part))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::normalize::{normalize, tokenize};

    fn postfix_of(infix: &str) -> String {
        let tokens = tokenize(&normalize(infix).unwrap()).unwrap();
        postfix_to_string(&to_postfix(&tokens).unwrap())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix_of("2+3*4"), "2 3 4 * +");
        assert_eq!(postfix_of("(2+3)*4"), "2 3 + 4 *");
        assert_eq!(postfix_of("8 mod 3 + 1"), "8 3 m 1 +");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(postfix_of("2^3^2"), "2 3 2 ^ ^");
        assert_eq!(postfix_of("8-4-2"), "8 4 - 2 -");
        assert_eq!(postfix_of("8/4/2"), "8 4 / 2 /");
    }

    #[test]
    fn test_functions() {
        assert_eq!(postfix_of("sin(x)^2"), "x s 2 ^");
        assert_eq!(postfix_of("sqrt(16)*2"), "16 Q 2 *");
        assert_eq!(postfix_of("log(ln(x))"), "x l L");
    }

    #[test]
    fn test_negation() {
        assert_eq!(postfix_of("-2^2"), "2 2 ^ ~");
        assert_eq!(postfix_of("-2*3"), "2 ~ 3 *");
        assert_eq!(postfix_of("2^-2"), "2 2 ~ ^");
        assert_eq!(postfix_of("-(1+2)"), "1 2 + ~");
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let tokens = [Token::Number(1.0), Token::RightParen];
        assert!(to_postfix(&tokens).is_err());
        let tokens = [Token::LeftParen, Token::Number(1.0)];
        assert!(to_postfix(&tokens).is_err());
    }

    #[test]
    fn test_parse_postfix_string() {
        let text = postfix_of("3*sin(x)-pi");
        let tokens = parse_postfix(&text).unwrap();
        assert_eq!(postfix_to_string(&tokens), text);
        assert!(parse_postfix("2 ab +").is_err());
    }
}
