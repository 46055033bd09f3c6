//! The generic DAG store.
//!
//! Nodes and edges live in a single adjacency map; there is no reverse
//! index, so predecessor and in-degree queries scan every adjacency set.

use hashbrown::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::GraphError;

type Successors<'a, T> = std::iter::Flatten<std::option::IntoIter<&'a HashSet<T>>>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// A directed acyclic graph over keys of type `T`.
///
/// Every mutation keeps the edge relation acyclic: [`Dag::add_edge`]
/// rejects (and fully rolls back) any edge that would close a cycle.
#[derive(Clone, Debug)]
pub struct Dag<T> {
    /// Outgoing adjacency; every node has an entry, possibly empty.
    adj: HashMap<T, HashSet<T>>,
}

impl<T> Default for Dag<T> {
    fn default() -> Self {
        Self {
            adj: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Dag<T> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            adj: HashMap::with_capacity(capacity),
        }
    }

    /// Adds a node. Idempotent.
    pub fn add_node(&mut self, node: T) {
        self.adj.entry(node).or_default();
    }

    /// Removes a node together with its outgoing and incoming edges.
    pub fn remove_node(&mut self, node: &T) {
        if self.adj.remove(node).is_none() {
            return;
        }
        for targets in self.adj.values_mut() {
            targets.remove(node);
        }
    }

    /// Adds the edge `src -> dst`, creating missing endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the edge would close a
    /// cycle. In that case the edge and any endpoint created by this call
    /// are removed again, leaving the graph exactly as it was.
    pub fn add_edge(&mut self, src: T, dst: T) -> Result<(), GraphError> {
        let src_is_new = !self.adj.contains_key(&src);
        let dst_is_new = !self.adj.contains_key(&dst);

        let inserted = self.adj.entry(src.clone()).or_default().insert(dst.clone());
        self.adj.entry(dst.clone()).or_default();

        // An edge that was already present cannot introduce a cycle.
        if !inserted || !self.has_cycle() {
            return Ok(());
        }

        if let Some(targets) = self.adj.get_mut(&src) {
            targets.remove(&dst);
        }
        if src_is_new {
            self.adj.remove(&src);
        }
        if dst_is_new {
            self.adj.remove(&dst);
        }

        debug!(nodes = self.adj.len(), "rejected edge that closes a cycle");
        Err(GraphError::CycleDetected)
    }

    /// Removes the edge `src -> dst` if present.
    pub fn remove_edge(&mut self, src: &T, dst: &T) {
        if let Some(targets) = self.adj.get_mut(src) {
            targets.remove(dst);
        }
    }

    /// Returns true if the edge `src -> dst` exists.
    #[must_use]
    pub fn has_edge(&self, src: &T, dst: &T) -> bool {
        self.adj.get(src).is_some_and(|targets| targets.contains(dst))
    }

    /// Returns true if the node exists.
    #[must_use]
    pub fn has_node(&self, node: &T) -> bool {
        self.adj.contains_key(node)
    }

    /// Iterates over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> + '_ {
        self.adj.keys()
    }

    /// Iterates over all edges `(src, dst)` in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        self.adj
            .iter()
            .flat_map(|(src, targets)| targets.iter().map(move |dst| (src, dst)))
    }

    /// Outgoing neighbors of `node`; empty for a missing node.
    pub fn neighbors<'a>(&'a self, node: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.successors(node)
    }

    /// Incoming neighbors of `node`. O(V): scans every adjacency set.
    pub fn predecessors<'a>(&'a self, node: &'a T) -> impl Iterator<Item = &'a T> + 'a {
        self.adj
            .iter()
            .filter(move |(_, targets)| targets.contains(node))
            .map(|(src, _)| src)
    }

    /// Number of incoming edges. O(V).
    #[must_use]
    pub fn indegree(&self, node: &T) -> usize {
        self.adj.values().filter(|targets| targets.contains(node)).count()
    }

    /// Number of outgoing edges.
    #[must_use]
    pub fn outdegree(&self, node: &T) -> usize {
        self.adj.get(node).map_or(0, HashSet::len)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.adj.clear();
    }

    /// Three-color depth-first search over the whole graph.
    ///
    /// Uses an explicit stack, so arbitrarily deep graphs are safe.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        let mut marks: HashMap<&T, Mark> = HashMap::with_capacity(self.adj.len());

        for start in self.adj.keys() {
            if marks.contains_key(start) {
                continue;
            }

            marks.insert(start, Mark::InProgress);
            let mut stack: Vec<(&T, Successors<'_, T>)> = vec![(start, self.successors(start))];

            loop {
                let Some((node, children)) = stack.last_mut() else {
                    break;
                };
                let node = *node;

                match children.next() {
                    Some(child) => match marks.get(child) {
                        Some(Mark::InProgress) => return true,
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(child, Mark::InProgress);
                            stack.push((child, self.successors(child)));
                        }
                    },
                    None => {
                        marks.insert(node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    /// Kahn's algorithm.
    ///
    /// Every edge `(u, v)` places `u` before `v`, and each node appears
    /// exactly once. The ready set is a stack, so nodes that become ready
    /// together come out most-recently-pushed first; combined with hash-map
    /// iteration order, the order among independent nodes is unspecified
    /// and may differ between logically equal graphs.
    #[must_use]
    pub fn topological_sort(&self) -> Vec<T> {
        let mut indegree: HashMap<&T, usize> = self.adj.keys().map(|node| (node, 0)).collect();
        for targets in self.adj.values() {
            for target in targets {
                *indegree.entry(target).or_insert(0) += 1;
            }
        }

        let mut ready: Vec<&T> = indegree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&node, _)| node)
            .collect();
        let mut order = Vec::with_capacity(self.adj.len());

        while let Some(node) = ready.pop() {
            order.push(node.clone());
            for next in self.successors(node) {
                if let Some(degree) = indegree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(next);
                    }
                }
            }
        }

        trace!(nodes = order.len(), "topological sort complete");
        order
    }

    fn successors<'a>(&'a self, node: &T) -> Successors<'a, T> {
        self.adj.get(node).into_iter().flatten()
    }
}
