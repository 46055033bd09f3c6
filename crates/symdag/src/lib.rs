//! # symdag
//!
//! Symbolic expressions stored as a hash-consed DAG.
//!
//! Infix text is compiled into a graph in which every distinct
//! subexpression exists once, then evaluated, simplified or rendered.
//!
//! ## Crates
//!
//! - **`symdag-graph`**: generic cycle-safe directed acyclic graph
//! - **`symdag-rational`**: overflow-checked `i64` rationals and
//!   Stern–Brocot approximation
//! - **`symdag-core`**: tokenizer, shunting-yard compiler, interning DAG
//!   builder, evaluator and rewrites
//!
//! ## Quick Start
//!
//! ```
//! use symdag::prelude::*;
//!
//! let mut dag = ExprDag::new();
//! dag.parse("x * 1 + 1/3 + 1/6").unwrap();
//!
//! let simple = dag.simplify().unwrap();
//! assert_eq!(simple.to_string(), "x + 1/2");
//!
//! let value = simple.to_rational(&Bindings::new().with("x", 2)).unwrap();
//! assert_eq!(value, Rational::new(5, 2).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use symdag_core as core;
pub use symdag_graph as graph;
pub use symdag_rational as rational;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use symdag_core::{
        Bindings, BuildError, DagConfig, EvalError, ExprDag, ExprNode, NodeId, OpType,
        ParseError, Value,
    };
    pub use symdag_graph::{Dag, GraphError};
    pub use symdag_rational::{ApproxConfig, Rational, RationalError};
}
