//! # symdag-core
//!
//! Expression compiler and evaluator for symdag.
//!
//! This crate provides:
//! - A tokenizer and shunting-yard converter for infix expressions
//! - `ExprDag`: a hash-consed expression graph where every structurally
//!   unique subexpression is stored exactly once
//! - Float and exact evaluation against variable bindings
//! - Canonicalization, constant-folding simplification and like-term merging
//! - Infix and LaTeX rendering
//!
//! ## Design
//!
//! - **Hash-Consing**: leaves are interned by name or value, operations by
//!   operator and operands, with `+` and `*` operands compared as a multiset
//! - **Flat Chains**: nested `+` and `*` collapse into one n-ary node
//! - **Acyclic by Construction**: every operand edge is mirrored in a
//!   [`symdag_graph::Dag`] that rejects cycles
//!
//! ## Example
//!
//! ```
//! use symdag_core::{Bindings, ExprDag, Value};
//!
//! let mut dag = ExprDag::new();
//! dag.parse("(x + y) * (x + y)").unwrap();
//! assert_eq!(dag.len(), 4);
//!
//! let bindings = Bindings::new().with("x", 2).with("y", 3);
//! assert_eq!(dag.eval(&bindings).unwrap(), Value::Float(25.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod config;
mod display;
pub mod error;
mod eval;
pub mod expr;
pub mod handle;
pub mod intern;
pub mod lexer;
pub mod ordering;
pub mod postfix;
mod transform;
pub mod value;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use arena::ExprDag;
pub use config::DagConfig;
pub use error::{BuildError, EvalError, ParseError};
pub use expr::{Arity, ExprNode, NodeKind, OpType};
pub use handle::NodeId;
pub use lexer::{tokenize, Token};
pub use ordering::compare_nodes;
pub use postfix::to_postfix;
pub use value::{named_constant, Bindings, Value};
