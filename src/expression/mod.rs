//! Expression engine: normalizer, shunting-yard converter and postfix evaluator.
//!
//! ```
//! use calc_core_rs::expression::{evaluate, evaluate_to_string};
//!
//! assert_eq!(evaluate("2+3*4", 0.0).unwrap(), 14.0);
//! assert_eq!(evaluate_to_string("2x^2", 3.0).unwrap(), "18");
//! ```

pub mod eval;
pub mod normalize;
pub mod postfix;
pub mod token;

use crate::errors::{CalcError, Result};

pub use eval::{evaluate_postfix, format_result, DISPLAY_PRECISION, ZERO_SNAP};
pub use normalize::{normalize, tokenize, validate, validate_canonical};
pub use postfix::{parse_postfix, postfix_to_string, to_postfix};
pub use token::{Constant, Function, Operator, Token};

/// a validated expression compiled to postfix once, evaluable for any `x`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    canonical: String,
    postfix: Vec<Token>,
}

impl Expression {
    /// Normalize, validate and compile; fails with `InvalidExpression`.
    pub fn parse(infix: &str) -> Result<Self> {
        let invalid = || CalcError::InvalidExpression {
            expression: infix.to_string(),
        };

        let canonical = normalize(infix)?;
        if !validate_canonical(&canonical) {
            return Err(invalid());
        }
        let tokens = tokenize(&canonical)?;
        let postfix = to_postfix(&tokens).map_err(|_| invalid())?;
        log::trace!("compiled {:?} into {:?}", infix, postfix_to_string(&postfix));

        Ok(Self {
            source: infix.to_string(),
            canonical,
            postfix,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    pub fn postfix_string(&self) -> String {
        postfix_to_string(&self.postfix)
    }

    pub fn eval(&self, x: f64) -> Result<f64> {
        evaluate_postfix(&self.postfix, x)
    }
}

/// Evaluate an infix expression with the variable `x` bound.
pub fn evaluate(infix: &str, x: f64) -> Result<f64> {
    Expression::parse(infix)?.eval(x)
}

/// Evaluate and render the result for display.
pub fn evaluate_to_string(infix: &str, x: f64) -> Result<String> {
    evaluate(infix, x).map(format_result)
}

/// Display form that never fails: errors become the `nan` sentinel.
pub fn evaluate_or_nan(infix: &str, x: f64) -> String {
    match evaluate(infix, x) {
        Ok(value) => format_result(value),
        Err(err) => {
            log::debug!("evaluation of {:?} failed: {}", infix, err);
            format_result(f64::NAN)
        }
    }
}

/// Sample an expression at `steps + 1` evenly spaced points of `[from, to]`.
/// Points where evaluation fails carry `None`.
pub fn tabulate(infix: &str, from: f64, to: f64, steps: usize) -> Result<Vec<(f64, Option<f64>)>> {
    if steps == 0 || !from.is_finite() || !to.is_finite() || to < from {
        return Err(CalcError::InvalidConfiguration {
            message: format!("cannot sample [{}, {}] in {} steps", from, to, steps),
        });
    }

    let expression = Expression::parse(infix)?;
    let step = (to - from) / steps as f64;
    Ok((0..=steps)
        .map(|i| {
            let x = if i == steps { to } else { from + step * i as f64 };
            (x, expression.eval(x).ok().filter(|y| y.is_finite()))
        })
        .collect())
}
