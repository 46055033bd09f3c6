//! The expression DAG: node storage, hash-consing and parsing.
//!
//! Nodes live contiguously in a `Vec`, with their ordered operand lists
//! and heights in parallel `Vec`s. A [`NodeId`] is the slot index offset
//! by `base`, the first id handed out since the last `clear()`. The wrapped
//! [`Dag`] mirrors every operand edge and is the structural view used for
//! validity checks; the ordered operand lists are what evaluation and
//! printing follow.

use symdag_graph::Dag;
use tracing::{debug, trace};

use crate::config::DagConfig;
use crate::error::{BuildError, ParseError};
use crate::expr::{ExprNode, NodeKind, OpType};
use crate::handle::NodeId;
use crate::intern::{InternTable, LeafKey, OpKey, Operands};
use crate::lexer::{tokenize, Token};
use crate::postfix::to_postfix;
use crate::value::Value;

/// A hash-consed expression DAG.
///
/// Structurally identical sub-expressions are stored once: building the
/// same leaf or the same operator application twice returns the same id.
#[derive(Clone, Debug)]
pub struct ExprDag {
    config: DagConfig,
    graph: Dag<NodeId>,
    nodes: Vec<ExprNode>,
    operands: Vec<Operands>,
    heights: Vec<usize>,
    /// Id of `nodes[0]`.
    base: u32,
    leaf_intern: InternTable<LeafKey>,
    op_intern: InternTable<OpKey>,
    root: Option<NodeId>,
}

impl Default for ExprDag {
    fn default() -> Self {
        Self::with_config(DagConfig::default())
    }
}

impl ExprDag {
    /// Creates an empty DAG with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty DAG with the given configuration.
    #[must_use]
    pub fn with_config(config: DagConfig) -> Self {
        Self {
            config,
            graph: Dag::new(),
            nodes: Vec::new(),
            operands: Vec::new(),
            heights: Vec::new(),
            base: 0,
            leaf_intern: InternTable::new(),
            op_intern: InternTable::new(),
            root: None,
        }
    }

    /// The configuration this DAG was created with.
    #[must_use]
    pub fn config(&self) -> &DagConfig {
        &self.config
    }

    /// Parses infix `input`, replacing the current contents, and returns
    /// the new root.
    ///
    /// On failure the DAG is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown tokens, unbalanced parentheses,
    /// operator/operand mismatches, or nesting beyond `max_depth`.
    pub fn parse(&mut self, input: &str) -> Result<NodeId, ParseError> {
        let tokens = tokenize(input)?;
        let token_count = tokens.len();
        let postfix = to_postfix(tokens)?;

        let mut fresh = self.successor();
        let root = fresh.build(postfix)?;
        fresh.root = Some(root);

        debug!(
            tokens = token_count,
            nodes = fresh.len(),
            %root,
            "parsed expression"
        );
        *self = fresh;
        Ok(root)
    }

    fn build(&mut self, postfix: Vec<Token>) -> Result<NodeId, ParseError> {
        const MISSING: ParseError = ParseError::InvalidExpression("operator is missing an operand");

        let mut stack: Vec<NodeId> = Vec::new();
        for token in postfix {
            let id = match token {
                Token::Number(value) => self.add_const(value)?,
                Token::Ident(name) => self.add_var(&name)?,
                Token::Op(op) if op.is_unary() => {
                    let arg = stack.pop().ok_or(MISSING)?;
                    self.add_op(op, &[arg])?
                }
                Token::Op(op) => {
                    let right = stack.pop().ok_or(MISSING)?;
                    let left = stack.pop().ok_or(MISSING)?;
                    self.add_op(op, &[left, right])?
                }
                Token::LParen | Token::RParen => return Err(ParseError::UnbalancedParens),
            };
            stack.push(id);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(root), true) => Ok(root),
            (None, _) => Err(ParseError::InvalidExpression("empty expression")),
            (Some(_), false) => Err(ParseError::InvalidExpression(
                "operands left over without an operator",
            )),
        }
    }

    /// Interns a variable leaf.
    ///
    /// # Errors
    ///
    /// Fails only if the id space or `max_depth` is exhausted.
    pub fn add_var(&mut self, name: &str) -> Result<NodeId, BuildError> {
        self.intern_leaf(LeafKey::variable(name), || ExprNode::Variable(name.to_owned()))
    }

    /// Interns a constant leaf.
    ///
    /// # Errors
    ///
    /// Fails only if the id space or `max_depth` is exhausted.
    pub fn add_const(&mut self, value: impl Into<Value>) -> Result<NodeId, BuildError> {
        let value = match value.into() {
            Value::Rational(r) => Value::from_rational(r),
            other => other,
        };
        self.intern_leaf(LeafKey::constant(value), || ExprNode::Constant(value))
    }

    /// Interns `op` applied to `children`, in order.
    ///
    /// Same-operator operands of `+` and `*` are flattened into the new
    /// node, so `(a + b) + c` and `a + (b + c)` are the same three-operand
    /// sum. Operands of `+` and `*` are compared as a multiset.
    ///
    /// # Errors
    ///
    /// Fails for an unknown child, the wrong operand count, or a node
    /// taller than `max_depth`.
    pub fn add_op(&mut self, op: OpType, children: &[NodeId]) -> Result<NodeId, BuildError> {
        if !op.arity().accepts(children.len()) {
            return Err(BuildError::Arity {
                op,
                expected: op.arity(),
                found: children.len(),
            });
        }

        let mut flat = Operands::new();
        for &child in children {
            let node = self.get_node(child).ok_or(BuildError::NodeNotFound(child))?;
            match self.children(child) {
                Some(inner) if op.is_associative() && node.op() == Some(op) => {
                    flat.extend_from_slice(inner);
                }
                _ => flat.push(child),
            }
        }

        let key = OpKey::new(op, &flat);
        if let Some(id) = self.op_intern.get(&key) {
            trace!(%id, %op, "operation intern hit");
            return Ok(id);
        }

        let height = 1 + flat
            .iter()
            .filter_map(|&child| self.height(child))
            .max()
            .unwrap_or(0);
        let id = self.push_node(ExprNode::Operation(op), flat, height)?;
        self.op_intern.insert(key, id);
        trace!(%id, %op, height, "operation intern miss");
        Ok(id)
    }

    /// Makes `id` the root.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NodeNotFound`] for an unknown id.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), BuildError> {
        if self.slot(id).is_none() {
            return Err(BuildError::NodeNotFound(id));
        }
        self.root = Some(id);
        Ok(())
    }

    fn intern_leaf(
        &mut self,
        key: LeafKey,
        make: impl FnOnce() -> ExprNode,
    ) -> Result<NodeId, BuildError> {
        if let Some(id) = self.leaf_intern.get(&key) {
            trace!(%id, "leaf intern hit");
            return Ok(id);
        }

        let id = self.push_node(make(), Operands::new(), 1)?;
        self.leaf_intern.insert(key, id);
        trace!(%id, "leaf intern miss");
        Ok(id)
    }

    fn push_node(
        &mut self,
        node: ExprNode,
        operands: Operands,
        height: usize,
    ) -> Result<NodeId, BuildError> {
        if height > self.config.max_depth {
            return Err(BuildError::DepthExceeded {
                depth: height,
                limit: self.config.max_depth,
            });
        }

        let id = self.next_id().ok_or(BuildError::CapacityExceeded)?;
        self.graph.add_node(id);
        for &child in &operands {
            self.graph.add_edge(id, child)?;
        }

        self.nodes.push(node);
        self.operands.push(operands);
        self.heights.push(height);
        Ok(id)
    }

    fn next_id(&self) -> Option<NodeId> {
        let len = u32::try_from(self.nodes.len()).ok()?;
        self.base
            .checked_add(len)
            .filter(|&index| index < u32::MAX)
            .map(NodeId::new)
    }

    // First id after every id this DAG has handed out.
    fn end(&self) -> u32 {
        let len = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.base.saturating_add(len)
    }

    /// An empty DAG with the same configuration whose ids continue after
    /// this one's.
    pub(crate) fn successor(&self) -> Self {
        let mut next = Self::with_config(self.config);
        next.base = self.end();
        next
    }

    fn slot(&self, id: NodeId) -> Option<usize> {
        let offset = usize::try_from(id.index().checked_sub(self.base)?).ok()?;
        (offset < self.nodes.len()).then_some(offset)
    }

    /// The root, if an expression has been built.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks up a node.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&ExprNode> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// The ordered operands of a node; empty for leaves.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.slot(id).map(|slot| self.operands[slot].as_slice())
    }

    /// Height of the sub-expression rooted at `id`; leaves have height 1.
    #[must_use]
    pub fn height(&self, id: NodeId) -> Option<usize> {
        self.slot(id).map(|slot| self.heights[slot])
    }

    /// Every live id, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (self.base..self.end()).map(NodeId::new)
    }

    fn ids_of(&self, kind: NodeKind) -> Vec<NodeId> {
        self.node_ids()
            .zip(&self.nodes)
            .filter(|(_, node)| node.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of the variable nodes, in creation order.
    #[must_use]
    pub fn vars(&self) -> Vec<NodeId> {
        self.ids_of(NodeKind::Variable)
    }

    /// Ids of the constant nodes, in creation order.
    #[must_use]
    pub fn consts(&self) -> Vec<NodeId> {
        self.ids_of(NodeKind::Constant)
    }

    /// Ids of the operation nodes, in creation order.
    #[must_use]
    pub fn ops(&self) -> Vec<NodeId> {
        self.ids_of(NodeKind::Operation)
    }

    /// The structural graph: one edge from each operation to each operand.
    #[must_use]
    pub fn graph(&self) -> &Dag<NodeId> {
        &self.graph
    }

    /// Number of unique nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true if no node has been built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// A root exists, the graph is non-empty and acyclic.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.root.is_some() && !self.graph.is_empty() && !self.graph.has_cycle()
    }

    /// Removes every node. Ids handed out before are never reused.
    pub fn clear(&mut self) {
        self.base = self.end();
        self.graph.clear();
        self.nodes.clear();
        self.operands.clear();
        self.heights.clear();
        self.leaf_intern.clear();
        self.op_intern.clear();
        self.root = None;
    }
}
