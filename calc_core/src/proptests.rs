//! Property-based tests for the expression evaluator.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::expression::{BinaryOp, Expr};
    use crate::{evaluate, CalcError};

    // Non-negative literals; negative values come from `Negate` nodes
    fn literal() -> impl Strategy<Value = f64> {
        prop_oneof![
            (0u32..1000).prop_map(f64::from),
            (0u32..100_000).prop_map(|n| f64::from(n) / 100.0),
            Just(0.0),
        ]
    }

    fn binary_op() -> impl Strategy<Value = BinaryOp> {
        prop_oneof![
            Just(BinaryOp::Add),
            Just(BinaryOp::Subtract),
            Just(BinaryOp::Multiply),
            Just(BinaryOp::Divide),
        ]
    }

    fn expr_tree() -> impl Strategy<Value = Expr> {
        let leaf = literal().prop_map(|value| Expr::Number { value });
        leaf.prop_recursive(6, 64, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|operand| Expr::Negate {
                    operand: Box::new(operand)
                }),
                (binary_op(), inner.clone(), inner).prop_map(|(op, lhs, rhs)| Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }),
            ]
        })
    }

    // Straightforward evaluation of the tree with plain f64 operators
    fn reference(expr: &Expr) -> f64 {
        match expr {
            Expr::Number { value } => *value,
            Expr::Negate { operand } => -reference(operand),
            Expr::Binary { op, lhs, rhs } => {
                let (a, b) = (reference(lhs), reference(rhs));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide => a / b,
                }
            }
        }
    }

    fn with_glyphs(text: &str) -> String {
        text.replace('*', "×").replace('/', "÷").replace('-', "−")
    }

    // A flat `a op b op c ...` chain without parentheses
    fn flat_chain() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<BinaryOp>, Vec<Vec<BinaryOp>>)> {
        (1usize..6).prop_flat_map(|terms| {
            (
                prop::collection::vec(prop::collection::vec(literal(), 1..5), terms),
                prop::collection::vec(prop_oneof![Just(BinaryOp::Add), Just(BinaryOp::Subtract)], terms),
                prop::collection::vec(
                    prop::collection::vec(prop_oneof![Just(BinaryOp::Multiply), Just(BinaryOp::Divide)], 4),
                    terms,
                ),
            )
        })
    }

    proptest! {
        #[test]
        fn evaluate_matches_tree_evaluation(tree in expr_tree()) {
            let text = tree.to_string();
            let expected = reference(&tree);

            if expected.is_finite() {
                prop_assert_eq!(evaluate(&text).unwrap(), expected);
            } else {
                let is_invalid = matches!(evaluate(&text), Err(CalcError::InvalidExpression { .. }));
                prop_assert!(is_invalid);
            }
        }

        #[test]
        fn display_glyphs_evaluate_like_ascii(tree in expr_tree()) {
            let text = tree.to_string();
            prop_assert_eq!(evaluate(&with_glyphs(&text)).ok(), evaluate(&text).ok());
        }

        #[test]
        fn flat_chains_follow_precedence((factors, add_ops, mul_ops) in flat_chain()) {
            let mut text = String::new();
            let mut expected = 0.0;

            for (t, term) in factors.iter().enumerate() {
                let mut product = term[0];
                let mut term_text = term[0].to_string();
                for (k, factor) in term.iter().enumerate().skip(1) {
                    let op = mul_ops[t][k - 1];
                    product = if op == BinaryOp::Multiply { product * factor } else { product / factor };
                    term_text.push_str(&format!(" {} {}", op.symbol(), factor));
                }

                if t == 0 {
                    expected = product;
                    text = term_text;
                } else {
                    let op = add_ops[t];
                    expected = if op == BinaryOp::Add { expected + product } else { expected - product };
                    text.push_str(&format!(" {} {}", op.symbol(), term_text));
                }
            }

            match evaluate(&text) {
                Ok(value) => prop_assert_eq!(value, expected),
                Err(_) => prop_assert!(!expected.is_finite()),
            }
        }
    }
}
