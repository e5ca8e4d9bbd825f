use std::fmt;

/// binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// prefix functions, including unary negation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Log,
    Sqrt,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    Euler,
}

/// one atomic unit of a canonical expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Variable,
    Constant(Constant),
    Operator(Operator),
    Function(Function),
    LeftParen,
    RightParen,
}

pub(crate) const VARIABLE_SYMBOL: char = 'x';
pub(crate) const EXPONENT_SYMBOL: char = 'e';

impl Operator {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            'm' => Some(Operator::Mod),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Mod => 'm',
            Operator::Pow => '^',
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Mod => 2,
            Operator::Pow => 3,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Pow)
    }
}

impl Function {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            's' => Some(Function::Sin),
            'c' => Some(Function::Cos),
            't' => Some(Function::Tan),
            'S' => Some(Function::Asin),
            'C' => Some(Function::Acos),
            'T' => Some(Function::Atan),
            'l' => Some(Function::Ln),
            'L' => Some(Function::Log),
            'Q' => Some(Function::Sqrt),
            '~' => Some(Function::Negate),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Function::Sin => 's',
            Function::Cos => 'c',
            Function::Tan => 't',
            Function::Asin => 'S',
            Function::Acos => 'C',
            Function::Atan => 'T',
            Function::Ln => 'l',
            Function::Log => 'L',
            Function::Sqrt => 'Q',
            Function::Negate => '~',
        }
    }

    /// name as typed by the user
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Negate => "neg",
        }
    }

    /// Named functions sit just below their `(` on the operator stack.
    /// Negation is a bare prefix and binds looser than `^` but tighter
    /// than `*`, so `-2^2` is `-4` and `-2*3` is `(-2)*3`.
    pub fn precedence(&self) -> u8 {
        match self {
            Function::Negate => 3,
            _ => 4,
        }
    }

    /// whether the function must be followed by `(`
    pub fn requires_parenthesis(&self) -> bool {
        !matches!(self, Function::Negate)
    }
}

impl Constant {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'P' => Some(Constant::Pi),
            'E' => Some(Constant::Euler),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Constant::Pi => 'P',
            Constant::Euler => 'E',
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::Euler => std::f64::consts::E,
        }
    }
}

impl Token {
    /// true for tokens after which an operand has just ended
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Variable | Token::Constant(_) | Token::RightParen
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", v),
            Token::Variable => write!(f, "{}", VARIABLE_SYMBOL),
            Token::Constant(c) => write!(f, "{}", c.symbol()),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Function(func) => write!(f, "{}", func.symbol()),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for c in ['+', '-', '*', '/', 'm', '^'] {
            assert_eq!(Operator::from_symbol(c).map(|op| op.symbol()), Some(c));
        }
        for c in ['s', 'c', 't', 'S', 'C', 'T', 'l', 'L', 'Q', '~'] {
            assert_eq!(Function::from_symbol(c).map(|func| func.symbol()), Some(c));
        }
        assert_eq!(Constant::from_symbol('P'), Some(Constant::Pi));
        assert_eq!(Function::from_symbol('P'), None);
    }

    #[test]
    fn test_precedence_table() {
        assert!(Operator::Add.precedence() < Operator::Mul.precedence());
        assert_eq!(Operator::Mul.precedence(), Operator::Mod.precedence());
        assert!(Operator::Mul.precedence() < Operator::Pow.precedence());
        assert!(Operator::Pow.precedence() < Function::Sin.precedence());
        assert!(Operator::Pow.is_right_associative());
        assert!(!Operator::Sub.is_right_associative());
    }
}
