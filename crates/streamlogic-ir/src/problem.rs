//! The problem bundle handed to the solver front end.

use std::fmt;

use indexmap::IndexMap;

use crate::convert::to_reference_space;
use crate::error::IrResult;
use crate::evaluation::{
    evaluations_from_init, fact_from_evaluation, state_from_evaluations, Evaluation, State,
};
use crate::expr::Expr;
use crate::flatten::flatten_conjunction;
use crate::object::Object;
use crate::render::render_problem;
use crate::session::Session;
use crate::stream::StreamFn;
use crate::term::Term;
use crate::value::Value;

/// Raw-space planning problem.
///
/// `streams` maps each stream name to the sampler that evaluates it;
/// `constants` maps domain constant names to raw values.
pub struct Problem {
    pub init: Vec<Expr<Value>>,
    pub goal: Expr<Value>,
    pub domain: String,
    pub streams: IndexMap<String, Box<dyn StreamFn>>,
    pub constants: IndexMap<String, Value>,
}

impl Problem {
    pub fn new(init: Vec<Expr<Value>>, goal: Expr<Value>, domain: impl Into<String>) -> Self {
        Problem {
            init,
            goal,
            domain: domain.into(),
            streams: IndexMap::new(),
            constants: IndexMap::new(),
        }
    }

    pub fn with_stream(mut self, name: impl Into<String>, stream: impl StreamFn + 'static) -> Self {
        self.streams.insert(name.into(), Box::new(stream));
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn stream(&self, name: &str) -> Option<&dyn StreamFn> {
        self.streams.get(name).map(|stream| stream.as_ref())
    }

    /// Convert init and goal into reference space.
    ///
    /// Init facts become evaluations; the goal is flattened into its conjuncts.
    pub fn to_reference_space(&self, session: &mut Session) -> IrResult<ReferenceProblem> {
        let constants = self
            .constants
            .iter()
            .map(|(name, value)| (name.clone(), session.intern_object(value.clone())))
            .collect();
        let evaluations = evaluations_from_init(session, &self.init)?;
        let goal = flatten_conjunction(&to_reference_space(session, &self.goal)?)?;
        tracing::debug!(
            evaluations = evaluations.len(),
            goals = goal.len(),
            objects = session.objects().len(),
            "converted problem"
        );
        Ok(ReferenceProblem {
            evaluations,
            goal,
            constants,
        })
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("init", &self.init)
            .field("goal", &self.goal)
            .field("domain", &self.domain)
            .field("streams", &self.streams.keys().collect::<Vec<_>>())
            .field("constants", &self.constants)
            .finish()
    }
}

/// A problem after conversion into reference space.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceProblem {
    pub evaluations: Vec<Evaluation>,
    /// Goal conjuncts
    pub goal: Vec<Expr<Term>>,
    pub constants: IndexMap<String, Object>,
}

impl ReferenceProblem {
    pub fn state(&self) -> IrResult<State> {
        state_from_evaluations(&self.evaluations)
    }

    pub fn init_facts(&self) -> Vec<Expr<Term>> {
        self.evaluations
            .iter()
            .map(fact_from_evaluation)
            .collect()
    }

    /// Render as solver input text.
    pub fn render(&self, session: &Session, name: &str, domain: &str) -> IrResult<String> {
        render_problem(
            session,
            name,
            domain,
            &self.init_facts(),
            &Expr::and(self.goal.clone()),
        )
    }
}
