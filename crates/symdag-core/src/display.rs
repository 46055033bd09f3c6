//! Infix and LaTeX rendering.
//!
//! The infix form uses the parser's precedence table and only the
//! parentheses it needs, so it parses back to the same structure.

use std::fmt::{self, Write};

use crate::arena::ExprDag;
use crate::expr::{ExprNode, OpType};
use crate::handle::NodeId;
use crate::value::Value;

/// Binding strength of anything self-delimiting: leaves and `f(x)` calls.
const ATOM: u8 = 5;

impl ExprDag {
    fn display_precedence(&self, id: NodeId) -> u8 {
        match self.get_node(id) {
            Some(ExprNode::Operation(op)) if op.is_function() => ATOM,
            Some(ExprNode::Operation(op)) => op.precedence(),
            // Printed as `a/b`
            Some(ExprNode::Constant(Value::Rational(_))) => OpType::Div.precedence(),
            Some(ExprNode::Constant(value)) if value.is_negative() => OpType::Neg.precedence(),
            _ => ATOM,
        }
    }

    // Whether operand `index` of a binary-style `op` needs parentheses.
    fn needs_parens(&self, op: OpType, index: usize, operand: NodeId) -> bool {
        let prec = op.precedence();
        let inner = self.display_precedence(operand);
        match (op, index) {
            // A power's base is wrapped unless it is atomic: `(-x) ^ 2`.
            (OpType::Pow, 0) => inner < ATOM,
            (_, 0) => inner < prec || (inner == prec && !op.is_left_assoc()),
            _ => inner < prec || (inner == prec && op.is_left_assoc()),
        }
    }

    fn write_infix(&self, f: &mut impl Write, id: NodeId) -> fmt::Result {
        let Some(node) = self.get_node(id) else {
            return write!(f, "{id}");
        };
        let operands = self.children(id).unwrap_or_default();

        match node {
            ExprNode::Variable(name) => f.write_str(name),
            ExprNode::Constant(value) => write!(f, "{value}"),
            ExprNode::Operation(op) if op.is_function() => {
                write!(f, "{op}(")?;
                if let Some(&arg) = operands.first() {
                    self.write_infix(f, arg)?;
                }
                f.write_str(")")
            }
            ExprNode::Operation(OpType::Neg) => {
                f.write_char('-')?;
                match operands.first() {
                    Some(&arg) if self.display_precedence(arg) < ATOM => {
                        self.write_parenthesized(f, arg)
                    }
                    Some(&arg) => self.write_infix(f, arg),
                    None => Ok(()),
                }
            }
            ExprNode::Operation(op) => {
                for (i, &operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {op} ")?;
                    }
                    if self.needs_parens(*op, i, operand) {
                        self.write_parenthesized(f, operand)?;
                    } else {
                        self.write_infix(f, operand)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn write_parenthesized(&self, f: &mut impl Write, id: NodeId) -> fmt::Result {
        f.write_char('(')?;
        self.write_infix(f, id)?;
        f.write_char(')')
    }

    /// Renders the expression as LaTeX. Empty before anything is built.
    #[must_use]
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root() {
            // Writing into a `String` cannot fail.
            let _ = self.write_latex(&mut out, root);
        }
        out
    }

    fn write_latex(&self, f: &mut String, id: NodeId) -> fmt::Result {
        let Some(node) = self.get_node(id) else {
            return write!(f, "{id}");
        };
        let operands = self.children(id).unwrap_or_default();

        match node {
            ExprNode::Variable(name) => match name.as_str() {
                "pi" | "PI" => f.write_str(r"\pi"),
                "tau" | "TAU" => f.write_str(r"\tau"),
                _ => f.write_str(name),
            },
            ExprNode::Constant(Value::Rational(r)) => {
                let sign = if r.is_negative() { "-" } else { "" };
                write!(
                    f,
                    r"{sign}\frac{{{}}}{{{}}}",
                    r.numerator().unsigned_abs(),
                    r.denominator()
                )
            }
            ExprNode::Constant(value) => write!(f, "{value}"),
            ExprNode::Operation(op) => {
                let arg = operands.first().copied();
                match op {
                    OpType::Div if operands.len() == 2 => {
                        f.write_str(r"\frac{")?;
                        self.write_latex(f, operands[0])?;
                        f.write_str("}{")?;
                        self.write_latex(f, operands[1])?;
                        f.write_char('}')
                    }
                    OpType::Pow if operands.len() == 2 => {
                        let wrap = self.needs_parens(*op, 0, operands[0]);
                        self.write_latex_operand(f, operands[0], wrap)?;
                        f.write_str("^{")?;
                        self.write_latex(f, operands[1])?;
                        f.write_char('}')
                    }
                    OpType::Neg => {
                        f.write_char('-')?;
                        self.write_latex_arg(f, arg, |dag, a| {
                            dag.display_precedence(a) < OpType::Neg.precedence()
                        })
                    }
                    OpType::Sqrt => {
                        f.write_str(r"\sqrt{")?;
                        self.write_latex_arg(f, arg, |_, _| false)?;
                        f.write_char('}')
                    }
                    OpType::Exp => {
                        f.write_str("e^{")?;
                        self.write_latex_arg(f, arg, |_, _| false)?;
                        f.write_char('}')
                    }
                    OpType::Abs => {
                        f.write_str(r"\left|")?;
                        self.write_latex_arg(f, arg, |_, _| false)?;
                        f.write_str(r"\right|")
                    }
                    OpType::Sin | OpType::Cos | OpType::Tan | OpType::Log => {
                        let name = match op {
                            OpType::Sin => r"\sin",
                            OpType::Cos => r"\cos",
                            OpType::Tan => r"\tan",
                            _ => r"\ln",
                        };
                        f.write_str(name)?;
                        self.write_latex_arg(f, arg, |_, _| true)
                    }
                    _ => {
                        let separator = match op {
                            OpType::Mul => r" \cdot ",
                            OpType::Div => " / ",
                            OpType::Pow => "^",
                            OpType::Sub => " - ",
                            _ => " + ",
                        };
                        for (i, &operand) in operands.iter().enumerate() {
                            if i > 0 {
                                f.write_str(separator)?;
                            }
                            // `\frac` delimits itself inside sums and products.
                            let is_frac =
                                self.get_node(operand).and_then(ExprNode::op) == Some(OpType::Div);
                            let wrap = !is_frac && self.needs_parens(*op, i, operand);
                            self.write_latex_operand(f, operand, wrap)?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    fn write_latex_arg(
        &self,
        f: &mut String,
        arg: Option<NodeId>,
        wrap: impl Fn(&Self, NodeId) -> bool,
    ) -> fmt::Result {
        match arg {
            Some(arg) => self.write_latex_operand(f, arg, wrap(self, arg)),
            None => Ok(()),
        }
    }

    fn write_latex_operand(&self, f: &mut String, id: NodeId, wrap: bool) -> fmt::Result {
        if wrap {
            f.write_str(r"\left(")?;
            self.write_latex(f, id)?;
            f.write_str(r"\right)")
        } else {
            self.write_latex(f, id)
        }
    }
}

/// Infix form of the expression under the root; empty before anything is
/// built.
impl fmt::Display for ExprDag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => self.write_infix(f, root),
            None => Ok(()),
        }
    }
}
