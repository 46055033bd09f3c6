//! # symdag-graph
//!
//! A generic directed acyclic graph for symdag.
//!
//! This crate provides:
//! - `Dag<T>`: a node/edge store over any hashable key type
//! - Cycle-preventing edge insertion with transactional rollback
//! - Degree queries and Kahn topological ordering
//!
//! Graphs here are expected to be small (expression trees), so every edge
//! insertion re-checks the whole graph for cycles in O(V + E).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dag;
pub mod error;

#[cfg(test)]
mod proptests;

pub use dag::Dag;
pub use error::GraphError;
