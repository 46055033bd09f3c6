//! Property-based tests for the expression DAG.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Bindings, ExprDag};

    fn leaf() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec!["x", "y", "z"]).prop_map(str::to_owned),
            (0i64..20).prop_map(|n| n.to_string()),
        ]
    }

    fn binary(ops: Vec<&'static str>) -> impl Strategy<Value = String> {
        leaf().prop_recursive(4, 32, 2, move |inner| {
            let ops = ops.clone();
            prop_oneof![
                3 => (inner.clone(), prop::sample::select(ops), inner.clone())
                    .prop_map(|(a, op, b)| format!("({a} {op} {b})")),
                1 => inner.prop_map(|a| format!("-({a})")),
            ]
        })
    }

    /// Expressions over every operator and function.
    fn expression() -> impl Strategy<Value = String> {
        leaf().prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                3 => (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "^"]), inner.clone())
                    .prop_map(|(a, op, b)| format!("({a} {op} {b})")),
                1 => inner.clone().prop_map(|a| format!("-({a})")),
                1 => (prop::sample::select(vec!["sin", "cos", "exp", "log", "sqrt", "abs"]), inner)
                    .prop_map(|(f, a)| format!("{f}({a})")),
            ]
        })
    }

    /// Expressions whose exact evaluation never leaves the rationals.
    fn rational_expression() -> impl Strategy<Value = String> {
        binary(vec!["+", "-", "*", "/"])
    }

    fn parse(input: &str) -> ExprDag {
        let mut dag = ExprDag::new();
        dag.parse(input).unwrap();
        dag
    }

    proptest! {
        #[test]
        fn repeated_subexpression_is_stored_once(input in expression()) {
            let single = parse(&input);
            let mut twice = ExprDag::new();
            let root = twice.parse(&format!("({input}) - ({input})")).unwrap();
            let operands = twice.children(root).unwrap();
            prop_assert_eq!(operands[0], operands[1]);
            prop_assert_eq!(twice.len(), single.len() + 1);
        }

        #[test]
        fn sums_and_products_ignore_operand_order(a in expression(), b in expression()) {
            for (op, inverse) in [("+", "-"), ("*", "/")] {
                let mut dag = ExprDag::new();
                let root = dag
                    .parse(&format!("(({a}) {op} ({b})) {inverse} (({b}) {op} ({a}))"))
                    .unwrap();
                let operands = dag.children(root).unwrap();
                prop_assert_eq!(operands[0], operands[1]);
            }
        }

        #[test]
        fn display_parses_back_to_same_structure(input in expression()) {
            let dag = parse(&input);
            let shown = dag.to_string();
            let reparsed = parse(&shown);
            prop_assert!(dag.structural_eq(&reparsed), "{} -> {}", input, shown);
        }

        #[test]
        fn graph_stays_acyclic(input in expression()) {
            let dag = parse(&input);
            prop_assert!(dag.is_valid());
            prop_assert!(!dag.graph().has_cycle());
            prop_assert_eq!(dag.graph().topological_sort().len(), dag.len());
        }

        #[test]
        fn simplify_reaches_a_fixed_point(input in expression()) {
            let once = parse(&input).simplify().unwrap();
            let twice = once.simplify().unwrap();
            prop_assert!(once.structural_eq(&twice), "{} -> {} -> {}", input, once, twice);
        }

        #[test]
        fn simplify_exact_preserves_exact_value(input in rational_expression()) {
            let dag = parse(&input);
            let simple = dag.simplify_exact().unwrap();
            let bindings = Bindings::new().with("x", 2).with("y", -3).with("z", 5);
            if let (Ok(before), Ok(after)) = (dag.eval_exact(&bindings), simple.eval_exact(&bindings)) {
                prop_assert!(before.is_exact());
                prop_assert_eq!(before, after, "{} vs {}", input, simple);
            }
        }

        #[test]
        fn canonical_form_ignores_operand_order(a in expression(), b in expression()) {
            for op in ["+", "*"] {
                let left = parse(&format!("({a}) {op} ({b})")).canonicalize().unwrap();
                let right = parse(&format!("({b}) {op} ({a})")).canonicalize().unwrap();
                prop_assert!(left.structural_eq(&right), "{} vs {}", left, right);
            }
        }

        #[test]
        fn canonicalize_is_idempotent(input in expression()) {
            let once = parse(&input).canonicalize().unwrap();
            let twice = once.canonicalize().unwrap();
            prop_assert!(once.structural_eq(&twice));
        }
    }
}
