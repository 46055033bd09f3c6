//! Property-based tests for the DAG store.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Dag, GraphError};

    fn edge_list() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..24, 0u8..24), 0..80)
    }

    fn build(edges: &[(u8, u8)]) -> Dag<u8> {
        let mut graph = Dag::new();
        for &(src, dst) in edges {
            let _ = graph.add_edge(src, dst);
        }
        graph
    }

    fn snapshot(graph: &Dag<u8>) -> (Vec<u8>, Vec<(u8, u8)>) {
        let mut nodes: Vec<u8> = graph.nodes().copied().collect();
        nodes.sort_unstable();
        let mut edges: Vec<(u8, u8)> = graph.edges().map(|(a, b)| (*a, *b)).collect();
        edges.sort_unstable();
        (nodes, edges)
    }

    proptest! {
        #[test]
        fn never_contains_a_cycle(edges in edge_list()) {
            let graph = build(&edges);
            prop_assert!(!graph.has_cycle());
        }

        #[test]
        fn rejected_edge_leaves_graph_unchanged(edges in edge_list(), src in 0u8..30, dst in 0u8..30) {
            let mut graph = build(&edges);
            let before = snapshot(&graph);
            match graph.add_edge(src, dst) {
                Ok(()) => prop_assert!(graph.has_edge(&src, &dst)),
                Err(e) => {
                    prop_assert_eq!(e, GraphError::CycleDetected);
                    prop_assert_eq!(snapshot(&graph), before);
                }
            }
        }

        #[test]
        fn topological_order_respects_edges(edges in edge_list()) {
            let graph = build(&edges);
            let order = graph.topological_sort();
            prop_assert_eq!(order.len(), graph.len());

            let mut position = [usize::MAX; 24];
            for (i, node) in order.iter().enumerate() {
                prop_assert_eq!(position[usize::from(*node)], usize::MAX, "node listed twice");
                position[usize::from(*node)] = i;
            }
            for (src, dst) in graph.edges() {
                prop_assert!(position[usize::from(*src)] < position[usize::from(*dst)]);
            }
        }

        #[test]
        fn removing_a_node_removes_its_edges(edges in edge_list(), victim in 0u8..24) {
            let mut graph = build(&edges);
            graph.remove_node(&victim);
            prop_assert!(!graph.has_node(&victim));
            prop_assert!(graph.edges().all(|(a, b)| *a != victim && *b != victim));
        }
    }
}
