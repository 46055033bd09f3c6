//! Expression node types.
//!
//! A node never owns its operands. Operands are recorded by the owning
//! [`ExprDag`](crate::ExprDag) as an ordered id list, so one node can be
//! shared by any number of parents.

use std::fmt;

use crate::value::Value;

/// Operators understood by the parser and evaluator.
///
/// The declaration order is also the order used when sorting operations
/// structurally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpType {
    /// `a + b + ...`
    Add,
    /// `a - b`
    Sub,
    /// `a * b * ...`
    Mul,
    /// `a / b`
    Div,
    /// `a ^ b`, right-associative.
    Pow,
    /// Unary minus.
    Neg,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Natural logarithm.
    Log,
    /// Natural exponential.
    Exp,
    /// Square root.
    Sqrt,
    /// Absolute value.
    Abs,
}

/// Number of operands an operator takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one.
    Unary,
    /// Exactly two.
    Binary,
    /// Two or more; the result of flattening an associative chain.
    Variadic,
}

impl Arity {
    /// Returns true if `n` operands are acceptable.
    #[must_use]
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Unary => n == 1,
            Arity::Binary => n == 2,
            Arity::Variadic => n >= 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Unary => f.write_str("1"),
            Arity::Binary => f.write_str("2"),
            Arity::Variadic => f.write_str("at least 2"),
        }
    }
}

impl OpType {
    /// Every operator, in declaration order.
    pub const ALL: [OpType; 13] = [
        OpType::Add,
        OpType::Sub,
        OpType::Mul,
        OpType::Div,
        OpType::Pow,
        OpType::Neg,
        OpType::Sin,
        OpType::Cos,
        OpType::Tan,
        OpType::Log,
        OpType::Exp,
        OpType::Sqrt,
        OpType::Abs,
    ];

    /// Maps an operator character or function name to its operator.
    ///
    /// A bare `-` is binary subtraction; the lexer decides when it is a
    /// negation. `neg` names the negation directly.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "+" => OpType::Add,
            "-" => OpType::Sub,
            "*" => OpType::Mul,
            "/" => OpType::Div,
            "^" => OpType::Pow,
            "neg" => OpType::Neg,
            "sin" => OpType::Sin,
            "cos" => OpType::Cos,
            "tan" => OpType::Tan,
            "log" => OpType::Log,
            "exp" => OpType::Exp,
            "sqrt" => OpType::Sqrt,
            "abs" => OpType::Abs,
            _ => return None,
        };
        Some(op)
    }

    /// Maps a function name (`sin`, `sqrt`, ...) to its operator.
    #[must_use]
    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::from_token(name).filter(|op| op.is_function())
    }

    /// The token that names this operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            OpType::Add => "+",
            OpType::Sub => "-",
            OpType::Mul => "*",
            OpType::Div => "/",
            OpType::Pow => "^",
            OpType::Neg => "neg",
            OpType::Sin => "sin",
            OpType::Cos => "cos",
            OpType::Tan => "tan",
            OpType::Log => "log",
            OpType::Exp => "exp",
            OpType::Sqrt => "sqrt",
            OpType::Abs => "abs",
        }
    }

    /// Binding strength: `+ -` 1, `* /` 2, `^` 3, unary operators 4.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            OpType::Add | OpType::Sub => 1,
            OpType::Mul | OpType::Div => 2,
            OpType::Pow => 3,
            _ => 4,
        }
    }

    /// Operand count this operator accepts.
    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            OpType::Add | OpType::Mul => Arity::Variadic,
            OpType::Sub | OpType::Div | OpType::Pow => Arity::Binary,
            _ => Arity::Unary,
        }
    }

    /// Returns true for negation and the named functions.
    #[must_use]
    pub fn is_unary(self) -> bool {
        self.arity() == Arity::Unary
    }

    /// Returns true for the operators written `name(arg)`.
    #[must_use]
    pub fn is_function(self) -> bool {
        self.is_unary() && self != OpType::Neg
    }

    /// `+ - * /` group left to right; `^` and prefix operators do not.
    #[must_use]
    pub fn is_left_assoc(self) -> bool {
        matches!(self, OpType::Add | OpType::Sub | OpType::Mul | OpType::Div)
    }

    /// `+` and `*`.
    #[must_use]
    pub fn is_commutative(self) -> bool {
        matches!(self, OpType::Add | OpType::Mul)
    }

    /// `+` and `*`; chains of these are flattened when interned.
    #[must_use]
    pub fn is_associative(self) -> bool {
        matches!(self, OpType::Add | OpType::Mul)
    }

    /// Returns true if the result is always a float, whatever the operand.
    #[must_use]
    pub fn is_transcendental(self) -> bool {
        matches!(
            self,
            OpType::Sin | OpType::Cos | OpType::Tan | OpType::Log | OpType::Exp | OpType::Sqrt
        )
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Broad category of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A numeric literal.
    Constant,
    /// A named free variable.
    Variable,
    /// An operator application.
    Operation,
}

/// A node stored in an [`ExprDag`](crate::ExprDag).
#[derive(Clone, Debug, PartialEq)]
pub enum ExprNode {
    /// A named free variable, resolved at evaluation time.
    Variable(String),
    /// A numeric literal.
    Constant(Value),
    /// An operator applied to the node's ordered children.
    Operation(OpType),
}

impl ExprNode {
    /// The node's category.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            ExprNode::Variable(_) => NodeKind::Variable,
            ExprNode::Constant(_) => NodeKind::Constant,
            ExprNode::Operation(_) => NodeKind::Operation,
        }
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, ExprNode::Operation(_))
    }

    /// The operator, for operation nodes.
    #[must_use]
    pub fn op(&self) -> Option<OpType> {
        match self {
            ExprNode::Operation(op) => Some(*op),
            _ => None,
        }
    }

    /// The value, for constant nodes.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        match self {
            ExprNode::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// The name, for variable nodes.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            ExprNode::Variable(name) => Some(name),
            _ => None,
        }
    }
}
