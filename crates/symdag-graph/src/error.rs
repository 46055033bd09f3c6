//! Error type for graph mutation.

use thiserror::Error;

/// Errors that can occur while mutating a [`Dag`](crate::Dag).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The requested edge would close a cycle; the graph was left unchanged.
    #[error("adding edge creates a cycle in the DAG")]
    CycleDetected,
}
