//! Hash-consing keys and tables.
//!
//! Leaves are keyed by name or value, operations by their operator and
//! operand ids. Operand ids of commutative operators are sorted before
//! keying, so `a + b` and `b + a` share one key.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use symdag_rational::Rational;

use crate::expr::OpType;
use crate::handle::NodeId;
use crate::value::Value;

/// Operand list stored per operation node.
pub type Operands = SmallVec<[NodeId; 4]>;

/// Identity of a leaf node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LeafKey {
    /// A variable, by name.
    Variable(String),
    /// An exact constant, by normalized value.
    Exact(Rational),
    /// A float constant, by bit pattern (`-0.0` folded into `0.0`).
    Float(u64),
}

impl LeafKey {
    /// Key for the variable `name`.
    #[must_use]
    pub fn variable(name: &str) -> Self {
        LeafKey::Variable(name.to_owned())
    }

    /// Key for a constant.
    #[must_use]
    pub fn constant(value: Value) -> Self {
        match value {
            Value::Int(n) => LeafKey::Exact(Rational::from_integer(n)),
            Value::Rational(r) => LeafKey::Exact(r),
            Value::Float(x) if x == 0.0 => LeafKey::Float(0.0_f64.to_bits()),
            Value::Float(x) => LeafKey::Float(x.to_bits()),
        }
    }
}

/// Identity of an operation node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpKey {
    op: OpType,
    operands: Operands,
}

impl OpKey {
    /// Builds the key for `op` applied to (already flattened) `operands`.
    #[must_use]
    pub fn new(op: OpType, operands: &[NodeId]) -> Self {
        let mut operands: Operands = operands.iter().copied().collect();
        if op.is_commutative() {
            operands.sort_unstable();
        }
        Self { op, operands }
    }

    /// The operator.
    #[must_use]
    pub fn op(&self) -> OpType {
        self.op
    }
}

/// Maps structural keys to the node that owns them.
#[derive(Clone, Debug)]
pub struct InternTable<K> {
    map: FxHashMap<K, NodeId>,
}

impl<K: Eq + Hash> Default for InternTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> InternTable<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// The node registered under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<NodeId> {
        self.map.get(key).copied()
    }

    /// Registers `id` under `key`.
    pub fn insert(&mut self, key: K, id: NodeId) {
        self.map.insert(key, id);
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
