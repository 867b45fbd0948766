use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Associativity {
    /// The operator is left-associative
    Left,
    /// The operator is right-associative
    Right,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum OperatorKind {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// ^ or **
    Exponent,
    /// %%
    Modulo,
    /// %/%
    IntegerDivide,
    /// %*%
    MatrixProduct,
    /// %o%
    OuterProduct,
    /// %x%
    KroneckerProduct,
    /// %in%
    MatchingOperator,
    /// any other %op%
    CustomInfix,
    /// |>
    Pipe,
    /// >
    GreaterThan,
    /// >=
    GreaterThanOrEquals,
    /// <
    LessThan,
    /// <=
    LessThanOrEquals,
    /// ==
    ConditionalEquals,
    /// !=
    ConditionalNotEquals,
    /// &
    And,
    /// |
    Or,
    /// &&
    ConditionalAnd,
    /// ||
    ConditionalOr,
    /// !
    Not,
    /// :
    Sequence,
    /// ~ (binary formula or one-sided formula)
    Tilde,
    /// ? (binary or unary help)
    Help,
    /// unary -
    UnaryMinus,
    /// unary +
    UnaryPlus,
    /// :: or :::
    Namespace,
    /// $ or @
    ListIndex,
    /// <-, <<- or :=
    LeftAssign,
    /// -> or ->>
    RightAssign,
    /// =
    Equals,
    /// f(...)
    FunctionCall,
    /// x[...] or x[[...]]
    Index,
    /// (...)
    Group,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OperatorKind {
    /// Maps an operator lexeme in infix position.
    pub fn binary(lexeme: &str) -> Option<OperatorKind> {
        Some(match lexeme {
            "+" => OperatorKind::Add,
            "-" => OperatorKind::Subtract,
            "*" => OperatorKind::Multiply,
            "/" => OperatorKind::Divide,
            "^" | "**" => OperatorKind::Exponent,
            "%%" => OperatorKind::Modulo,
            "%/%" => OperatorKind::IntegerDivide,
            "%*%" => OperatorKind::MatrixProduct,
            "%o%" => OperatorKind::OuterProduct,
            "%x%" => OperatorKind::KroneckerProduct,
            "%in%" => OperatorKind::MatchingOperator,
            s if s.len() >= 2 && s.starts_with('%') && s.ends_with('%') => {
                OperatorKind::CustomInfix
            }
            "|>" => OperatorKind::Pipe,
            ">" => OperatorKind::GreaterThan,
            ">=" => OperatorKind::GreaterThanOrEquals,
            "<" => OperatorKind::LessThan,
            "<=" => OperatorKind::LessThanOrEquals,
            "==" => OperatorKind::ConditionalEquals,
            "!=" => OperatorKind::ConditionalNotEquals,
            "&" => OperatorKind::And,
            "|" => OperatorKind::Or,
            "&&" => OperatorKind::ConditionalAnd,
            "||" => OperatorKind::ConditionalOr,
            ":" => OperatorKind::Sequence,
            "~" => OperatorKind::Tilde,
            "?" => OperatorKind::Help,
            "<-" | "<<-" | ":=" => OperatorKind::LeftAssign,
            "->" | "->>" => OperatorKind::RightAssign,
            "=" => OperatorKind::Equals,
            _ => return None,
        })
    }

    /// Maps an operator lexeme in operand position.
    pub fn unary(lexeme: &str) -> Option<OperatorKind> {
        Some(match lexeme {
            "-" => OperatorKind::UnaryMinus,
            "+" => OperatorKind::UnaryPlus,
            "!" => OperatorKind::Not,
            "~" => OperatorKind::Tilde,
            "?" => OperatorKind::Help,
            _ => return None,
        })
    }

    /// Member access operators that bind as postfix on an operand.
    pub fn postfix(lexeme: &str) -> Option<OperatorKind> {
        Some(match lexeme {
            "$" | "@" => OperatorKind::ListIndex,
            "::" | ":::" => OperatorKind::Namespace,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Add | OperatorKind::UnaryPlus => "+",
            OperatorKind::Subtract | OperatorKind::UnaryMinus => "-",
            OperatorKind::Multiply => "*",
            OperatorKind::Divide => "/",
            OperatorKind::Exponent => "^",
            OperatorKind::Modulo => "%%",
            OperatorKind::IntegerDivide => "%/%",
            OperatorKind::MatrixProduct => "%*%",
            OperatorKind::OuterProduct => "%o%",
            OperatorKind::KroneckerProduct => "%x%",
            OperatorKind::MatchingOperator => "%in%",
            OperatorKind::CustomInfix => "%op%",
            OperatorKind::Pipe => "|>",
            OperatorKind::GreaterThan => ">",
            OperatorKind::GreaterThanOrEquals => ">=",
            OperatorKind::LessThan => "<",
            OperatorKind::LessThanOrEquals => "<=",
            OperatorKind::ConditionalEquals => "==",
            OperatorKind::ConditionalNotEquals => "!=",
            OperatorKind::And => "&",
            OperatorKind::Or => "|",
            OperatorKind::ConditionalAnd => "&&",
            OperatorKind::ConditionalOr => "||",
            OperatorKind::Not => "!",
            OperatorKind::Sequence => ":",
            OperatorKind::Tilde => "~",
            OperatorKind::Help => "?",
            OperatorKind::Namespace => "::",
            OperatorKind::ListIndex => "$",
            OperatorKind::LeftAssign => "<-",
            OperatorKind::RightAssign => "->",
            OperatorKind::Equals => "=",
            OperatorKind::FunctionCall => "call",
            OperatorKind::Index => "[",
            OperatorKind::Group => "paren",
        }
    }

    /// Binding strength, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        use OperatorKind::*;
        match self {
            Help => 0,
            Equals => 1,
            LeftAssign | RightAssign => 2,
            Tilde => 3,
            Or | ConditionalOr => 4,
            And | ConditionalAnd => 5,
            Not => 6,
            GreaterThan | GreaterThanOrEquals | LessThan | LessThanOrEquals
            | ConditionalEquals | ConditionalNotEquals => 7,
            Add | Subtract => 8,
            Multiply | Divide => 9,
            Modulo | IntegerDivide | MatrixProduct | OuterProduct | KroneckerProduct
            | MatchingOperator | CustomInfix | Pipe => 10,
            Sequence => 11,
            Exponent => 12,
            UnaryMinus | UnaryPlus => 13,
            FunctionCall | Index | Group => 14,
            ListIndex => 15,
            Namespace => 16,
        }
    }

    /// Gets the associativity of this operator
    pub fn associativity(&self) -> Associativity {
        match self {
            OperatorKind::Exponent | OperatorKind::LeftAssign | OperatorKind::Equals => {
                Associativity::Right
            }
            _ => Associativity::Left,
        }
    }
}

#[cfg(test)]
mod op_tests {
    use super::{Associativity, OperatorKind};

    #[test]
    fn precedence_ladder() {
        let ladder = [
            OperatorKind::Help,
            OperatorKind::Equals,
            OperatorKind::LeftAssign,
            OperatorKind::Tilde,
            OperatorKind::Or,
            OperatorKind::And,
            OperatorKind::Not,
            OperatorKind::LessThan,
            OperatorKind::Add,
            OperatorKind::Multiply,
            OperatorKind::CustomInfix,
            OperatorKind::Sequence,
            OperatorKind::Exponent,
            OperatorKind::UnaryMinus,
            OperatorKind::FunctionCall,
            OperatorKind::ListIndex,
            OperatorKind::Namespace,
        ];
        for pair in ladder.windows(2) {
            assert!(
                pair[0].precedence() < pair[1].precedence(),
                "{:?} should bind looser than {:?}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(
            OperatorKind::RightAssign.precedence(),
            OperatorKind::LeftAssign.precedence()
        );
        assert_eq!(
            OperatorKind::Pipe.precedence(),
            OperatorKind::MatchingOperator.precedence()
        );
    }

    #[test]
    fn right_associative_set() {
        assert_eq!(
            OperatorKind::Exponent.associativity(),
            Associativity::Right
        );
        assert_eq!(
            OperatorKind::LeftAssign.associativity(),
            Associativity::Right
        );
        assert_eq!(OperatorKind::Equals.associativity(), Associativity::Right);
        assert_eq!(
            OperatorKind::RightAssign.associativity(),
            Associativity::Left
        );
        assert_eq!(OperatorKind::Subtract.associativity(), Associativity::Left);
    }

    #[test]
    fn lexemes() {
        assert_eq!(OperatorKind::binary("**"), Some(OperatorKind::Exponent));
        assert_eq!(OperatorKind::binary("<<-"), Some(OperatorKind::LeftAssign));
        assert_eq!(OperatorKind::binary(":="), Some(OperatorKind::LeftAssign));
        assert_eq!(OperatorKind::binary("->>"), Some(OperatorKind::RightAssign));
        assert_eq!(OperatorKind::binary("%in%"), Some(OperatorKind::MatchingOperator));
        assert_eq!(OperatorKind::binary("%between%"), Some(OperatorKind::CustomInfix));
        assert_eq!(OperatorKind::binary("!"), None);
        assert_eq!(OperatorKind::binary("$"), None);
        assert_eq!(OperatorKind::unary("*"), None);
        assert_eq!(OperatorKind::postfix(":::"), Some(OperatorKind::Namespace));
    }
}
