//! Integration tests for symdag-core.

#[cfg(test)]
mod integration_tests {
    use crate::{
        Bindings, BuildError, DagConfig, EvalError, ExprDag, ExprNode, NodeKind, OpType,
        ParseError, Value,
    };
    use symdag_rational::Rational;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_parse_simplify_eval_pipeline() {
        init_tracing();

        let mut dag = ExprDag::new();
        dag.parse("(x + 0) * (1 * y) + 2 ^ 3 - x * y").unwrap();
        let simple = dag.simplify().unwrap();
        assert_eq!(simple.to_string(), "x * y + 8 - x * y");

        // `x * y` appears twice but is stored once.
        let products = simple
            .ops()
            .into_iter()
            .filter(|&id| simple.get_node(id).and_then(ExprNode::op) == Some(OpType::Mul))
            .count();
        assert_eq!(products, 1);

        let b = Bindings::new().with("x", 3).with("y", 4);
        assert_eq!(dag.eval(&b), simple.eval(&b));
        assert_eq!(simple.eval_exact(&b), Ok(Value::Int(8)));
    }

    #[test]
    fn test_builder_api_matches_parser() {
        let mut built = ExprDag::new();
        let x = built.add_var("x").unwrap();
        let two = built.add_const(2).unwrap();
        let square = built.add_op(OpType::Pow, &[x, two]).unwrap();
        let sin = built.add_op(OpType::Sin, &[square]).unwrap();
        let root = built.add_op(OpType::Add, &[sin, x]).unwrap();
        built.set_root(root).unwrap();

        let mut parsed = ExprDag::new();
        parsed.parse("sin(x ^ 2) + x").unwrap();

        assert!(built.structural_eq(&parsed));
        assert_eq!(built.len(), parsed.len());
        assert_eq!(built.to_string(), "sin(x ^ 2) + x");
    }

    #[test]
    fn test_node_inventory() {
        let mut dag = ExprDag::new();
        dag.parse("a * b + a * 3 + 3").unwrap();

        assert_eq!(dag.vars().len(), 2);
        assert_eq!(dag.consts().len(), 1);
        for id in dag.node_ids() {
            let node = dag.get_node(id).unwrap();
            assert_eq!(node.is_leaf(), node.kind() != NodeKind::Operation);
            assert_eq!(node.is_leaf(), dag.children(id).unwrap().is_empty());
        }
    }

    #[test]
    fn test_errors_surface_at_each_stage() {
        let mut dag = ExprDag::new();
        assert_eq!(
            dag.parse("2 $ 3"),
            Err(ParseError::UnknownToken("$".into()))
        );
        assert_eq!(dag.parse("(1 + 2"), Err(ParseError::UnbalancedParens));
        assert!(matches!(
            dag.parse("1 +"),
            Err(ParseError::InvalidExpression(_))
        ));
        assert!(dag.is_empty());

        let shallow = DagConfig::default().with_max_depth(3);
        let mut dag = ExprDag::with_config(shallow);
        assert!(matches!(
            dag.parse("sin(cos(tan(x)))"),
            Err(ParseError::Build(BuildError::DepthExceeded { limit: 3, .. }))
        ));

        let mut dag = ExprDag::new();
        dag.parse("y / (x - x)").unwrap();
        let b = Bindings::new().with("x", 1).with("y", 1);
        assert_eq!(dag.eval(&b), Err(EvalError::DivisionByZero));
        assert_eq!(dag.eval_exact(&b), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_exact_and_approximate_rationals() {
        let mut dag = ExprDag::new();
        dag.parse("x / 3 + 0.25").unwrap();
        let b = Bindings::new().with("x", 2);

        assert_eq!(dag.to_rational(&b), Ok(Rational::new(11, 12).unwrap()));
        assert!((dag.eval(&b).unwrap().to_f64() - 11.0 / 12.0).abs() < 1e-12);

        dag.parse("sqrt(2)").unwrap();
        let approx = dag.to_rational(&Bindings::new()).unwrap();
        assert!((approx.to_f64() - std::f64::consts::SQRT_2).abs() < 1e-6);
        assert!(approx.denominator() > 1);
    }

    #[test]
    fn test_canonical_forms_compare_equal() {
        let inputs = ["b * a + c", "c + a * b", "(b * a) + c", "c + (a * b)"];
        let canonical: Vec<ExprDag> = inputs
            .iter()
            .map(|input| {
                let mut dag = ExprDag::new();
                dag.parse(input).unwrap();
                dag.canonicalize().unwrap()
            })
            .collect();

        for other in &canonical[1..] {
            assert!(canonical[0].structural_eq(other));
        }
        assert_eq!(canonical[0].to_string(), "c + a * b");
    }

    #[test]
    fn test_combine_then_render_latex() {
        let mut dag = ExprDag::new();
        dag.parse("x / 2 + x / 2 + 3 * y + y").unwrap();
        let combined = dag.combine_like_terms().unwrap();
        assert_eq!(combined.to_string(), "x / 2 * 2 + y * 4");
        assert_eq!(combined.to_latex(), r"\frac{x}{2} \cdot 2 + y \cdot 4");
    }
}
