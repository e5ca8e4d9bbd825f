use crate::errors::{CalcError, Result};
use crate::expression::token::{Function, Operator, Token};

/// results smaller than this in magnitude are clamped to exactly zero
pub const ZERO_SNAP: f64 = 1e-15;

/// digits after the decimal point before trailing zeros are trimmed
pub const DISPLAY_PRECISION: usize = 7;

fn snap(value: f64) -> f64 {
    if value.abs() < ZERO_SNAP {
        0.0
    } else {
        value
    }
}

fn pop(stack: &mut Vec<f64>) -> Result<f64> {
    stack.pop().ok_or_else(|| CalcError::MalformedPostfix {
        message: "operand stack underflow".to_string(),
    })
}

/// Stack-machine evaluation of a postfix sequence with `x` bound to `variable`.
pub fn evaluate_postfix(postfix: &[Token], variable: f64) -> Result<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        let value = match *token {
            Token::Number(v) => v,
            Token::Variable => variable,
            Token::Constant(c) => c.value(),
            Token::Operator(op) => {
                let right = pop(&mut stack)?;
                let left = pop(&mut stack)?;
                apply_operator(op, left, right)?
            }
            Token::Function(func) => {
                let arg = pop(&mut stack)?;
                apply_function(func, arg)?
            }
            Token::LeftParen | Token::RightParen => {
                return Err(CalcError::MalformedPostfix {
                    message: "parenthesis in postfix sequence".to_string(),
                });
            }
        };
        stack.push(snap(value));
    }

    let result = pop(&mut stack)?;
    if !stack.is_empty() {
        return Err(CalcError::MalformedPostfix {
            message: format!("{} operands left on the stack", stack.len()),
        });
    }
    Ok(result)
}

pub fn apply_operator(op: Operator, left: f64, right: f64) -> Result<f64> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div => {
            if right == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            Ok(left / right)
        }
        Operator::Mod => {
            if right == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            let rem = left % right;
            Ok(if rem < 0.0 { rem + right } else { rem })
        }
        Operator::Pow => Ok(left.powf(right)),
    }
}

pub fn apply_function(func: Function, x: f64) -> Result<f64> {
    let domain_error = || CalcError::DomainError {
        function: func.name().to_string(),
        value: x,
    };

    match func {
        Function::Sin => Ok(x.sin()),
        Function::Cos => Ok(x.cos()),
        Function::Tan => Ok(x.tan()),
        Function::Asin | Function::Acos if x.abs() > 1.0 => Err(domain_error()),
        Function::Asin => Ok(x.asin()),
        Function::Acos => Ok(x.acos()),
        Function::Atan => Ok(x.atan()),
        Function::Ln | Function::Log | Function::Sqrt if x < 0.0 => Err(domain_error()),
        Function::Ln => Ok(x.ln()),
        Function::Log => Ok(x.log10()),
        Function::Sqrt => Ok(x.sqrt()),
        Function::Negate => Ok(-x),
    }
}

/// Fixed-precision rendering with trailing zeros and a trailing point removed.
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{:.*}", DISPLAY_PRECISION, value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_binary_pop_order() {
        // 7 2 -  is 7 - 2
        let postfix = [Token::Number(7.0), Token::Number(2.0), Token::Operator(Operator::Sub)];
        assert_eq!(evaluate_postfix(&postfix, 0.0).unwrap(), 5.0);
        let postfix = [Token::Number(8.0), Token::Number(2.0), Token::Operator(Operator::Div)];
        assert_eq!(evaluate_postfix(&postfix, 0.0).unwrap(), 4.0);
    }

    #[test]
    fn test_modulo_is_non_negative() {
        assert_eq!(apply_operator(Operator::Mod, -7.0, 3.0).unwrap(), 2.0);
        assert_eq!(apply_operator(Operator::Mod, 7.0, 3.0).unwrap(), 1.0);
        assert_relative_eq!(apply_operator(Operator::Mod, 5.5, 2.0).unwrap(), 1.5);
        assert_eq!(apply_operator(Operator::Mod, 1.0, 0.0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_domain_errors() {
        for (func, x) in [
            (Function::Sqrt, -1.0),
            (Function::Ln, -1.0),
            (Function::Log, -0.5),
            (Function::Asin, 2.0),
            (Function::Acos, -2.0),
        ] {
            assert!(matches!(
                apply_function(func, x),
                Err(CalcError::DomainError { .. })
            ));
        }
        assert_eq!(apply_operator(Operator::Div, 1.0, 0.0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_snap_to_zero() {
        let postfix = [
            Token::Constant(crate::expression::token::Constant::Pi),
            Token::Function(Function::Sin),
        ];
        assert_eq!(evaluate_postfix(&postfix, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_sequences() {
        assert!(evaluate_postfix(&[], 0.0).is_err());
        let leftover = [Token::Number(1.0), Token::Number(2.0)];
        assert!(evaluate_postfix(&leftover, 0.0).is_err());
        let underflow = [Token::Number(1.0), Token::Operator(Operator::Add)];
        assert!(evaluate_postfix(&underflow, 0.0).is_err());
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(4.0), "4");
        assert_eq!(format_result(0.25), "0.25");
        assert_eq!(format_result(1.0 / 3.0), "0.3333333");
        assert_eq!(format_result(-0.00000001), "0");
        assert_eq!(format_result(-2.5), "-2.5");
        assert_eq!(format_result(f64::INFINITY), "inf");
        assert_eq!(format_result(f64::NAN), "nan");
    }
}
