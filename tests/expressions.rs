use approx::assert_relative_eq;
use calc_core_rs::{
    evaluate_expression, evaluate_expression_to_string, tabulate, validate_expression, CalcError,
    Expression,
};
use proptest::prelude::*;

#[test]
fn precedence_and_associativity() {
    assert_eq!(evaluate_expression("2+3*4", 0.0).unwrap(), 14.0);
    assert_eq!(evaluate_expression("2^3^2", 0.0).unwrap(), 512.0);
    assert_eq!(evaluate_expression("(2*3)-(4/2)", 0.0).unwrap(), 4.0);
    assert_eq!(evaluate_expression("(-7) mod 3", 0.0).unwrap(), 2.0);
}

#[test]
fn implicit_multiplication_and_constants() {
    assert_eq!(evaluate_expression("2x", 4.0).unwrap(), 8.0);
    assert_eq!(evaluate_expression("(1+1)(2+2)", 0.0).unwrap(), 8.0);
    assert_eq!(evaluate_expression("3(x+1)", 1.0).unwrap(), 6.0);
    assert_relative_eq!(evaluate_expression("pi", 0.0).unwrap(), std::f64::consts::PI);
    assert_relative_eq!(evaluate_expression("e^2", 0.0).unwrap(), std::f64::consts::E.powi(2));
    assert_relative_eq!(evaluate_expression("2.5E+2", 0.0).unwrap(), 250.0);
}

#[test]
fn runtime_errors_are_recoverable() {
    for infix in ["sqrt(-1)", "ln(-1)", "asin(2)", "acos(-2)"] {
        let err = evaluate_expression(infix, 0.0).unwrap_err();
        assert!(matches!(err, CalcError::DomainError { .. }), "{}", infix);
        assert!(err.is_runtime());
    }
    assert_eq!(evaluate_expression("1/0", 0.0), Err(CalcError::DivisionByZero));
    assert!(matches!(
        evaluate_expression("sin(", 0.0),
        Err(CalcError::InvalidExpression { .. })
    ));
}

#[test]
fn string_rendering() {
    assert_eq!(evaluate_expression_to_string("1/4", 0.0).unwrap(), "0.25");
    assert_eq!(evaluate_expression_to_string("10/2", 0.0).unwrap(), "5");
    assert_eq!(evaluate_expression_to_string("sin(pi)", 0.0).unwrap(), "0");
}

#[test]
fn validation() {
    assert!(validate_expression("sin(x)+cos(x)"));
    assert!(validate_expression("-x^2"));
    assert!(!validate_expression(""));
    assert!(!validate_expression("()"));
    assert!(!validate_expression("(1+2"));
    assert!(!validate_expression("1+2)"));
    assert!(!validate_expression("1*/2"));
    assert!(!validate_expression("1.2.3"));
    assert!(!validate_expression("sin x"));
    assert!(!validate_expression("2#3"));
}

#[test]
fn compiled_expression_for_plotting() {
    let parabola = Expression::parse("x^2").unwrap();
    let ys: Vec<f64> = (-2..=2).map(|x| parabola.eval(x as f64).unwrap()).collect();
    assert_eq!(ys, vec![4.0, 1.0, 0.0, 1.0, 4.0]);

    let points = tabulate("sqrt(x)", -1.0, 1.0, 2).unwrap();
    assert_eq!(points[0], (-1.0, None));
    assert_eq!(points[2], (1.0, Some(1.0)));
}

proptest! {
    #[test]
    fn validation_is_idempotent(input in "\\PC{0,16}") {
        prop_assert_eq!(validate_expression(&input), validate_expression(&input));
    }

    #[test]
    fn subtraction_is_left_associative(a in -500i32..500, b in -500i32..500, c in -500i32..500) {
        let value = evaluate_expression(&format!("({})-({})-({})", a, b, c), 0.0).unwrap();
        prop_assert_eq!(value, (a - b - c) as f64);
    }
}
