use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid date: {day:02}.{month:02}.{year}")]
    InvalidDate {
        day: u32,
        month: u32,
        year: u32,
    },

    #[error("invalid expression: {expression}")]
    InvalidExpression {
        expression: String,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("domain error: {function} is undefined for {value}")]
    DomainError {
        function: String,
        value: f64,
    },

    #[error("malformed postfix sequence: {message}")]
    MalformedPostfix {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid operation: {message}")]
    InvalidOperation {
        message: String,
    },
}

impl CalcError {
    /// true for errors raised while evaluating a syntactically valid expression
    pub fn is_runtime(&self) -> bool {
        matches!(self, CalcError::DivisionByZero | CalcError::DomainError { .. })
    }

    /// a schedule quantity left the representable decimal range
    pub fn overflow(what: &str) -> Self {
        CalcError::InvalidConfiguration {
            message: format!("{} overflows the decimal range", what),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CalcError::InvalidDate { day: 31, month: 4, year: 2024 };
        assert_eq!(err.to_string(), "invalid date: 31.04.2024");

        let err = CalcError::DomainError { function: "sqrt".to_string(), value: -1.0 };
        assert_eq!(err.to_string(), "domain error: sqrt is undefined for -1");
    }

    #[test]
    fn test_runtime_classification() {
        assert!(CalcError::DivisionByZero.is_runtime());
        assert!(!CalcError::InvalidExpression { expression: "()".to_string() }.is_runtime());
        assert!(!CalcError::overflow("balance").is_runtime());
    }
}
