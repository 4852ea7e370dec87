//! # StreamLogic IR
//!
//! **Object indirection and expression conversion for stream-based task and motion planning**
//!
//! **Version**: 0.1.0
//!
//! A hybrid planner searches over discrete facts while the values those facts
//! talk about are continuous: poses, grasps, joint configurations, costs. This
//! crate is the layer that keeps the two worlds consistent. Every raw value
//! that appears in a fact is interned into a stable reference with a
//! solver-legal name, so the discrete search and the external classical
//! planner only ever see names like `v3`, while the caller keeps working with
//! raw values.
//!
//! ## Core Components
//!
//! ### References ([`Object`], [`OptimisticObject`])
//! - **Objects** stand for resolved raw values. Equal values always intern to
//!   the same object.
//! - **Optimistic objects** stand for stream outputs that have not been
//!   computed yet. Their names live in a disjoint namespace (`#o0`, `#o1`, ...)
//!   and each one can record the [`StreamCall`] that will produce it.
//!
//! ### Sessions ([`Session`])
//! Both registries are owned by an explicit session created per planning run.
//! Nothing is global: two sessions never share identities, and a session can
//! be [`reset`](Session::reset) or snapshotted to JSON and restored elsewhere.
//!
//! ### Expressions ([`Expr`])
//! A tagged expression tree generic over its leaves: `Expr<Value>` in raw
//! space, `Expr<Term>` in reference space. The reserved operators are
//! `and`, `or`, `not`, `=`, `exists`, `forall`, `implies` and `when`; any other
//! prefix is a predicate application.
//!
//! ### Evaluations ([`Evaluation`])
//! The flattened internal state: `(Head, value)` pairs where `true` is a
//! positive atom, `false` a negated atom and anything else a fluent value.
//!
//! ## Quick Start
//!
//! ```rust
//! use streamlogic_ir::{
//!     evaluations_from_init, render_surface, to_reference_space, Expr, Session, Term, Value,
//! };
//!
//! let mut session = Session::new();
//! let conf = Value::from(vec![0.0, 1.5]);
//!
//! let init = vec![
//!     Expr::pred("CanMove", vec![]),
//!     Expr::pred("Conf", vec![conf.clone()]),
//! ];
//! let evaluations = evaluations_from_init(&mut session, &init).unwrap();
//!
//! // The same value always maps to the same object
//! let q = session.intern_object(conf);
//! assert_eq!(evaluations[1].head.args, vec![Term::Object(q)]);
//!
//! let fact = to_reference_space(&mut session, &init[1]).unwrap();
//! assert_eq!(render_surface(&session, &fact).unwrap().to_string(), "(conf v0)");
//! ```
//!
//! ## Architecture
//!
//! - **value**: raw domain values
//! - **object**: references and the append-only registries
//! - **[`session`]**: registry ownership and name lookup
//! - **expr**: expression tree, builders and analysis
//! - **[`convert`]**: raw space ↔ reference space
//! - **[`evaluation`]**: heads, evaluations and states
//! - **[`substitution`]**: structural rewriting with a reference mapping
//! - **[`flatten`]**: conjunction flattening
//! - **[`surface`]**: s-expression parsing and printing
//! - **[`render`]**: solver input text
//! - **[`plan`]**: solver output decoding
//! - **[`stream`]**: sampler seam and placeholder provenance
//! - **[`serialization`]**: versioned session snapshots
//! - **error**: error types

mod config;
pub mod convert;
mod display;
mod error;
pub mod evaluation;
mod expr;
pub mod flatten;
mod object;
pub mod plan;
mod problem;
pub mod render;
pub mod serialization;
pub mod session;
pub mod stream;
pub mod substitution;
pub mod surface;
mod term;
mod value;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use convert::{
    facts_to_reference_space, normalize_name, to_raw_space, to_reference_space, value_of_term,
    values_from_terms,
};
pub use error::{IrError, IrResult};
pub use evaluation::{
    evaluation_from_fact, evaluations_from_init, fact_from_evaluation, head_from_fact,
    init_from_evaluations, objects_from_evaluations, raw_fact_from_evaluation,
    state_from_evaluations, Evaluation, Head, State,
};
pub use expr::{Expr, Operator, Param, Rhs};
pub use flatten::flatten_conjunction;
pub use object::{
    Object, ObjectRegistry, OptimisticObject, OptimisticRegistry, Placeholder, Reference, Registry,
};
pub use plan::{
    decode_plan, parse_plan, parse_plan_cost, revert_solution, value_plan, PlanStep, Solution,
};
pub use problem::{Problem, ReferenceProblem};
pub use render::{render_problem, render_raw, render_surface};
pub use serialization::{SessionSnapshot, FORMAT_VERSION};
pub use session::Session;
pub use stream::{invoke_stream, placeholders_for, resolve_with_stream, StreamCall, StreamFn};
pub use substitution::{
    substitute, substitute_all_facts, substitute_evaluation, substitute_evaluations,
    substitute_head, substitute_plan, substitute_term, Mapping,
};
pub use surface::{params_from_surface, Surface};
pub use term::Term;
pub use value::Value;
