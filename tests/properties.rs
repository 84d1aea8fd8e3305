//! Universal laws from the testable-properties table, exercised directly
//! against the public API rather than through hand-built trees where a
//! direct call reads clearer (laws 1-6); laws 7-9 need evaluation to
//! observe short-circuiting and const-rejection, so those build `Expr`
//! trees.

use xb::{evaluate, Block, Environment, Expr, Number, Pair, Value};

fn num(n: i64) -> Value {
    Value::Number(Number::Int(n))
}

// --- Law 1: Op.eq(v, v) is reflexive for every variant. ---------------

#[test]
fn law1_eq_is_reflexive() {
    let values = vec![
        Value::Empty,
        Value::Boolean(true),
        num(5),
        Value::from("hi"),
        Value::array(vec![num(1), num(2)]),
        Value::object(Default::default()),
    ];
    for v in values {
        assert_eq!(v.eq(&v), Value::Boolean(true), "{v:?} is not reflexive");
    }
}

// --- Law 2: neq(a, b) == not eq(a, b). ---------------------------------

#[test]
fn law2_neq_is_not_eq() {
    let pairs = [(num(1), num(1)), (num(1), num(2)), (num(1), Value::Empty)];
    for (a, b) in pairs {
        let env = Environment::new();
        let eq_expr = Expr::Equal(Box::new(literal(&a)), Box::new(literal(&b)));
        let neq_expr = Expr::NotEqual(Box::new(literal(&a)), Box::new(literal(&b)));
        let eq_result = eq_expr.evaluate_for_test(&env);
        let neq_result = neq_expr.evaluate_for_test(&env);
        assert_ne!(eq_result, neq_result);
    }
}

// --- Law 3: differing variants never error and are unequal. -----------

#[test]
fn law3_cross_variant_eq_is_false_and_infallible() {
    assert_eq!(xb_op_eq(&num(1), &Value::from("1")), Value::Boolean(false));
    assert_eq!(xb_op_eq(&Value::Empty, &Value::Boolean(false)), Value::Boolean(false));
}

// --- Law 4: Number display round-trips the canonical decimal. ---------

#[test]
fn law4_number_literal_displays_canonically() {
    let env = Environment::new();
    let block = Block::new(vec![Expr::NumberLiteral("0xFF".to_string())]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "255");

    let block = Block::new(vec![Expr::NumberLiteral("1e3".to_string())]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "1000");

    let block = Block::new(vec![Expr::NumberLiteral("5.5".to_string())]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "5.5");
}

// --- Law 5: display order matches textual construction order. ---------

#[test]
fn law5_array_and_object_preserve_construction_order() {
    let env = Environment::new();
    let block = Block::new(vec![Expr::ArrayLiteral(vec![
        Expr::NumberLiteral("3".to_string()),
        Expr::NumberLiteral("1".to_string()),
        Expr::NumberLiteral("2".to_string()),
    ])]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "[3, 1, 2]");

    let block = Block::new(vec![Expr::ObjectLiteral(vec![
        Pair::Const("z".to_string(), Expr::NumberLiteral("1".to_string())),
        Pair::Const("a".to_string(), Expr::NumberLiteral("2".to_string())),
    ])]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "{z : 1, a : 2}");
}

// --- Law 6: mutation through one aliased binding is visible through another.

#[test]
fn law6_array_mutation_visible_through_alias() {
    let env = Environment::new();
    let block = Block::new(vec![
        Expr::VarDecl {
            name: "a".to_string(),
            value: Box::new(Expr::ArrayLiteral(vec![Expr::NumberLiteral("1".to_string())])),
        },
        Expr::ConstDecl {
            name: "b".to_string(),
            value: Box::new(Expr::Identifier("a".to_string())),
        },
        Expr::Assign {
            target: Box::new(Expr::IndexAccess {
                object: Box::new(Expr::Identifier("a".to_string())),
                index: Box::new(Expr::NumberLiteral("0".to_string())),
            }),
            value: Box::new(Expr::NumberLiteral("9".to_string())),
        },
        Expr::Identifier("b".to_string()),
    ]);
    assert_eq!(evaluate(&block, &env).unwrap().display(), "[9]");
}

// --- Law 7: const bindings reject assignment from every path. ---------

#[test]
fn law7_const_rejects_direct_reassignment() {
    let env = Environment::new();
    env.declare_const("x", num(1)).unwrap();
    assert!(env.assign("x", num(2)).is_err());
}

#[test]
fn law7_const_rejects_field_reassignment() {
    let env = Environment::new();
    let block = Block::new(vec![
        Expr::ConstDecl {
            name: "o".to_string(),
            value: Box::new(Expr::ObjectLiteral(vec![Pair::Const(
                "x".to_string(),
                Expr::NumberLiteral("1".to_string()),
            )])),
        },
        Expr::Assign {
            target: Box::new(Expr::KeyAccess {
                object: Box::new(Expr::Identifier("o".to_string())),
                key: "x".to_string(),
            }),
            value: Box::new(Expr::NumberLiteral("2".to_string())),
        },
    ]);
    assert!(evaluate(&block, &env).is_err());
}

#[test]
fn law7_const_rejects_redeclaration() {
    let env = Environment::new();
    env.declare_const("x", num(1)).unwrap();
    assert!(env.declare_var("x", num(2)).is_err());
}

// --- Law 8: if evaluates exactly one branch. ---------------------------

#[test]
fn law8_if_evaluates_exactly_one_branch() {
    let env = Environment::new();

    // There is no host-function-call mechanism in this crate's value model
    // to register a side-effecting callback, so "the other branch is never
    // evaluated" is observed by making the untaken branch an expression
    // that would error if evaluated (redeclaring an already-bound name),
    // and asserting evaluation still succeeds.
    let block = Block::new(vec![
        Expr::ConstDecl {
            name: "guard".to_string(),
            value: Box::new(Expr::BoolLiteral(true)),
        },
        Expr::If {
            condition: Box::new(Expr::Identifier("guard".to_string())),
            then_branch: Box::new(Expr::NumberLiteral("1".to_string())),
            else_branch: Some(Box::new(Expr::ConstDecl {
                name: "guard".to_string(),
                value: Box::new(Expr::NumberLiteral("2".to_string())),
            })),
        },
    ]);
    // If the else branch were evaluated, `ConstDecl` would error on the
    // already-bound name `guard`; it isn't, so this succeeds.
    assert_eq!(evaluate(&block, &env).unwrap().display(), "1");
}

// --- Law 9: && / || / ?? only evaluate their right side when needed. ---

#[test]
fn law9_and_skips_right_when_left_is_falsy() {
    let env = Environment::new();
    let block = Block::new(vec![Expr::And(
        Box::new(Expr::BoolLiteral(false)),
        Box::new(Expr::Identifier("undeclared".to_string())),
    )]);
    assert_eq!(evaluate(&block, &env).unwrap(), Value::Boolean(false));
}

#[test]
fn law9_or_skips_right_when_left_is_truthy() {
    let env = Environment::new();
    let block = Block::new(vec![Expr::Or(
        Box::new(Expr::BoolLiteral(true)),
        Box::new(Expr::Identifier("undeclared".to_string())),
    )]);
    assert_eq!(evaluate(&block, &env).unwrap(), Value::Boolean(true));
}

#[test]
fn law9_coalesce_skips_right_unless_left_is_empty() {
    let env = Environment::new();
    let block = Block::new(vec![Expr::Coalesce(
        Box::new(Expr::NumberLiteral("1".to_string())),
        Box::new(Expr::Identifier("undeclared".to_string())),
    )]);
    assert_eq!(evaluate(&block, &env).unwrap(), num(1));
}

// -- helpers -------------------------------------------------------------

fn literal(value: &Value) -> Expr {
    match value {
        Value::Empty => Expr::EmptyLiteral,
        Value::Boolean(b) => Expr::BoolLiteral(*b),
        Value::Number(Number::Int(i)) => Expr::NumberLiteral(i.to_string()),
        Value::Number(Number::Float(f)) => Expr::NumberLiteral(f.to_string()),
        Value::String(s) => Expr::StringLiteral(s.to_string()),
        _ => panic!("literal() helper does not support this variant in these tests"),
    }
}

fn xb_op_eq(a: &Value, b: &Value) -> Value {
    // Exercises the same cross-variant rule through the public `Equal`
    // node rather than reaching into a private module.
    let env = Environment::new();
    let block = Block::new(vec![Expr::Equal(
        Box::new(literal(a)),
        Box::new(literal(b)),
    )]);
    evaluate(&block, &env).unwrap()
}

trait EvalForTest {
    fn evaluate_for_test(&self, env: &Environment) -> Value;
}

impl EvalForTest for Expr {
    fn evaluate_for_test(&self, env: &Environment) -> Value {
        let block = Block::new(vec![self.clone()]);
        evaluate(&block, env).unwrap()
    }
}
