//! Unit tests for the reference layer.

use crate::{
    convert::{to_raw_space, to_reference_space},
    evaluation::{
        evaluation_from_fact, evaluations_from_init, state_from_evaluations, Evaluation, Head,
    },
    expr::{Expr, Operator, Param},
    flatten::flatten_conjunction,
    session::Session,
    stream::{placeholders_for, resolve_with_stream, StreamCall},
    substitution::{substitute, substitute_all_facts, Mapping},
    term::Term,
    value::Value,
    IrError,
};

#[test]
fn test_interning_idempotence() {
    let mut session = Session::new();
    let pose = Value::from(vec![0.5, -0.25, 1.0]);
    let a = session.intern_object(pose.clone());
    let b = session.intern_object(pose);
    assert_eq!(a, b);
    assert_eq!(session.objects().len(), 1);
}

#[test]
fn test_scalar_round_trip() {
    let mut session = Session::new();
    let raw = Expr::pred("p", vec![Value::Int(5)]);
    let wrapped = to_reference_space(&mut session, &raw).unwrap();
    assert_eq!(to_raw_space(&session, &wrapped).unwrap(), raw);
}

#[test]
fn test_operator_classification() {
    for op in Operator::ALL {
        assert_eq!(Operator::parse(op.keyword()), Some(op));
    }
    assert_eq!(Operator::parse("On"), None);
    assert_eq!(Operator::parse("AND"), None);
    assert!(Operator::Not.is_connective());
    assert!(Operator::Forall.is_quantifier());
    assert!(!Operator::Equal.is_connective());
}

#[test]
fn test_flatten_properties() {
    let f = |name: &str| Expr::pred(name, vec![Value::str("a")]);
    assert_eq!(
        flatten_conjunction(&Expr::and(vec![f("f1"), f("f2"), f("f3")])).unwrap(),
        vec![f("f1"), f("f2"), f("f3")]
    );
    assert!(flatten_conjunction(&Expr::<Value>::and(vec![]))
        .unwrap()
        .is_empty());
    assert!(matches!(
        flatten_conjunction(&Expr::or(vec![f("f1"), f("f2")])),
        Err(IrError::UnsupportedGoalForm { .. })
    ));
}

#[test]
fn test_evaluation_classification() {
    let mut session = Session::new();
    let a = Term::Object(session.intern_object("a"));
    let b = Term::Object(session.intern_object("b"));

    let positive =
        to_reference_space(&mut session, &Expr::pred("P", vec![Value::str("a"), Value::str("b")]))
            .unwrap();
    assert_eq!(
        evaluation_from_fact(&positive).unwrap(),
        Evaluation::atom(Head::new("p", vec![a.clone(), b]))
    );

    let negative = to_reference_space(
        &mut session,
        &Expr::negate(Expr::pred("P", vec![Value::str("a")])),
    )
    .unwrap();
    assert_eq!(
        evaluation_from_fact(&negative).unwrap(),
        Evaluation::negated_atom(Head::new("p", vec![a.clone()]))
    );

    let fluent = to_reference_space(
        &mut session,
        &Expr::equal(Expr::pred("F", vec![Value::str("a")]), 5),
    )
    .unwrap();
    assert_eq!(
        evaluation_from_fact(&fluent).unwrap(),
        Evaluation::new(Head::new("f", vec![a]), 5)
    );
}

#[test]
fn test_substitution_properties() {
    let mut session = Session::new();
    let a = Term::Object(session.intern_object("a"));
    let b = Term::Object(session.intern_object("b"));
    let x = Term::var("X");
    let y = Term::var("Y");

    let mapping: Mapping = [(x.clone(), a.clone()), (y.clone(), b.clone())]
        .into_iter()
        .collect();
    assert_eq!(
        substitute(&Expr::pred("On", vec![x, y]), &mapping),
        Expr::pred("On", vec![a, b])
    );
}

#[test]
fn test_placeholder_replaced_across_facts() {
    let mut session = Session::new();
    let cup = Term::Object(session.intern_object("cup"));
    let opt = session.intern_optimistic("grasp");
    let g = Term::Optimistic(opt);

    let facts = vec![
        Expr::pred("grasp", vec![cup.clone(), g.clone()]),
        Expr::pred("kin", vec![g.clone()]),
        Expr::negate(Expr::pred("unsafe", vec![g.clone()])),
    ];
    let mapping = session
        .resolve_outputs(&[opt], &[Value::from(vec![0.0, 0.0, 0.1])])
        .unwrap();
    let resolved = substitute_all_facts(&facts, &mapping);

    assert_eq!(resolved.len(), 3);
    for fact in &resolved {
        assert!(!fact.references().contains(&g));
    }
    let grasp = mapping[&g].clone();
    assert_eq!(resolved[1], Expr::pred("kin", vec![grasp]));
}

#[test]
fn test_state_contradiction() {
    let head = Head::new("holding", vec![]);
    let evaluations = vec![Evaluation::atom(head.clone()), Evaluation::negated_atom(head)];
    assert!(matches!(
        state_from_evaluations(&evaluations),
        Err(IrError::StateInconsistency { .. })
    ));
}

#[test]
fn test_end_to_end_identity() {
    let mut session = Session::new();
    let conf_raw = Value::from(vec![0.0, 0.4, -1.2]);
    let init = vec![
        Expr::pred("CanMove", vec![]),
        Expr::pred("Conf", vec![conf_raw.clone()]),
    ];
    let evaluations = evaluations_from_init(&mut session, &init).unwrap();

    assert_eq!(evaluations.len(), 2);
    assert!(evaluations.iter().all(Evaluation::is_atom));
    let conf = session.intern_object(conf_raw);
    assert_eq!(evaluations[1].head.args, vec![Term::Object(conf)]);
}

#[test]
fn test_free_vars_and_predicates() {
    let expr: Expr<Term> = Expr::and(vec![
        Expr::pred("at", vec![Term::var("?r"), Term::var("?q")]),
        Expr::exists(
            vec![Param::typed("?q", "conf")],
            Expr::pred("reach", vec![Term::var("?q")]),
        ),
    ]);
    let free = expr.free_vars();
    assert_eq!(free.len(), 2);
    assert!(free.contains("?r"));

    let body_free = Expr::exists(
        vec![Param::new("?q")],
        Expr::pred("reach", vec![Term::var("?q")]),
    )
    .free_vars();
    assert!(body_free.is_empty());

    let preds = expr.all_predicates();
    assert_eq!(preds.get("at"), Some(&2));
    assert_eq!(preds.get("reach"), Some(&1));
}

#[test]
fn test_stream_placeholder_resolution() {
    let mut session = Session::new();
    let block = Term::Object(session.intern_object("block"));
    let placeholders = placeholders_for(&mut session, "sample-grasp", &[block.clone()], 2);
    assert_eq!(
        session.provenance(placeholders[1]).unwrap(),
        Some(&StreamCall::new("sample-grasp", vec![block], 1))
    );

    let sampler = |inputs: &[Value]| {
        assert_eq!(inputs, &[Value::str("block")]);
        vec![vec![Value::str("top"), Value::float(0.2)]]
    };
    let mapping = resolve_with_stream(&mut session, &sampler, &placeholders)
        .unwrap()
        .unwrap();
    let top = session.intern_object("top");
    assert_eq!(
        mapping[&Term::Optimistic(placeholders[0])],
        Term::Object(top)
    );
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_stream_without_outputs() {
    let mut session = Session::new();
    let placeholders = placeholders_for(&mut session, "empty", &[], 1);
    let sampler = |_: &[Value]| -> Vec<Vec<Value>> { Vec::new() };
    assert_eq!(
        resolve_with_stream(&mut session, &sampler, &placeholders).unwrap(),
        None
    );
}
