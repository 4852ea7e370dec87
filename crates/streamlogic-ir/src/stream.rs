//! Seam between the reference layer and stream samplers.
//!
//! A stream is an external generator: given raw input values it yields tuples
//! of raw output values. Before a stream is evaluated, each of its outputs is
//! represented by an [`OptimisticObject`] whose provenance is the
//! [`StreamCall`] that will eventually produce it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::values_from_terms;
use crate::error::{IrError, IrResult};
use crate::object::{Object, OptimisticObject};
use crate::session::Session;
use crate::substitution::Mapping;
use crate::term::Term;
use crate::value::Value;

/// A pending stream invocation and the output slot a placeholder stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamCall {
    pub stream: String,
    pub inputs: Vec<Term>,
    pub output_index: usize,
}

impl StreamCall {
    pub fn new(stream: impl Into<String>, inputs: Vec<Term>, output_index: usize) -> Self {
        StreamCall {
            stream: stream.into(),
            inputs,
            output_index,
        }
    }
}

impl fmt::Display for StreamCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}](", self.stream, self.output_index)?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", input)?;
        }
        write!(f, ")")
    }
}

/// A sampler producing raw output tuples from raw inputs.
pub trait StreamFn: Send + Sync {
    fn sample(&self, inputs: &[Value]) -> Vec<Vec<Value>>;
}

impl<F> StreamFn for F
where
    F: Fn(&[Value]) -> Vec<Vec<Value>> + Send + Sync,
{
    fn sample(&self, inputs: &[Value]) -> Vec<Vec<Value>> {
        self(inputs)
    }
}

/// Evaluate a stream on reference-space inputs and intern every output.
///
/// Fails with [`IrError::Unresolved`](crate::IrError::Unresolved) if an input
/// is still a placeholder.
pub fn invoke_stream(
    session: &mut Session,
    stream: &dyn StreamFn,
    inputs: &[Term],
) -> IrResult<Vec<Vec<Object>>> {
    let raw_inputs = values_from_terms(session, inputs)?;
    let outputs = stream.sample(&raw_inputs);
    tracing::debug!(outputs = outputs.len(), "stream produced output tuples");
    Ok(outputs
        .iter()
        .map(|tuple| session.objects_from_values(tuple.iter().cloned()))
        .collect())
}

/// Placeholders standing for every output slot of one stream call.
pub fn placeholders_for(
    session: &mut Session,
    stream: &str,
    inputs: &[Term],
    num_outputs: usize,
) -> Vec<OptimisticObject> {
    (0..num_outputs)
        .map(|output_index| {
            session.intern_optimistic_for(StreamCall::new(stream, inputs.to_vec(), output_index))
        })
        .collect()
}

/// Invoke the stream behind `placeholders` and map each placeholder to the
/// object interned for its output slot of the first output tuple.
///
/// All placeholders must come from the same stream call. Returns `None` when
/// the stream produced nothing.
pub fn resolve_with_stream(
    session: &mut Session,
    stream: &dyn StreamFn,
    placeholders: &[OptimisticObject],
) -> IrResult<Option<Mapping>> {
    let mut calls = Vec::with_capacity(placeholders.len());
    for placeholder in placeholders {
        let call = session
            .provenance(*placeholder)?
            .cloned()
            .ok_or_else(|| IrError::structural("placeholder has no recorded stream call"))?;
        calls.push(call);
    }
    let Some(first) = calls.first() else {
        return Ok(Some(Mapping::new()));
    };
    if calls
        .iter()
        .any(|call| call.stream != first.stream || call.inputs != first.inputs)
    {
        return Err(IrError::structural(
            "placeholders resolved together must share one stream call",
        ));
    }

    let raw_inputs = values_from_terms(session, &first.inputs)?;
    let Some(outputs) = stream.sample(&raw_inputs).into_iter().next() else {
        return Ok(None);
    };

    let mut mapping = Mapping::new();
    for (placeholder, call) in placeholders.iter().zip(&calls) {
        let value = outputs.get(call.output_index).ok_or_else(|| {
            IrError::structural(format!(
                "stream '{}' produced {} outputs, placeholder needs output {}",
                call.stream,
                outputs.len(),
                call.output_index
            ))
        })?;
        let obj = session.intern_object(value.clone());
        mapping.insert(Term::Optimistic(*placeholder), Term::Object(obj));
    }
    tracing::debug!(resolved = mapping.len(), stream = %first.stream, "resolved placeholders");
    Ok(Some(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_stream_interns_outputs() {
        let mut session = Session::new();
        let block = session.intern_object("block");
        let top = session.intern_object("top");

        let grasps = |inputs: &[Value]| {
            assert_eq!(inputs, &[Value::str("block")]);
            vec![
                vec![Value::str("top"), Value::float(0.1)],
                vec![Value::str("side"), Value::float(0.1)],
            ]
        };
        let outputs = invoke_stream(&mut session, &grasps, &[Term::Object(block)]).unwrap();

        assert_eq!(outputs.len(), 2);
        // An output equal to a known value reuses its object
        assert_eq!(outputs[0][0], top);
        assert_eq!(outputs[0][1], outputs[1][1]);
        assert_eq!(session.value_of(outputs[1][0]).unwrap(), &Value::str("side"));
        assert_eq!(session.objects().len(), 4);
    }

    #[test]
    fn test_invoke_stream_rejects_placeholder_inputs() {
        let mut session = Session::new();
        let pending = session.intern_optimistic("pose");
        let stream = |_: &[Value]| vec![vec![Value::Int(1)]];

        assert!(matches!(
            invoke_stream(&mut session, &stream, &[Term::Optimistic(pending)]),
            Err(IrError::Unresolved { .. })
        ));
        assert!(session.objects().is_empty());
    }

    #[test]
    fn test_invoke_stream_without_outputs() {
        let mut session = Session::new();
        let stream = |_: &[Value]| -> Vec<Vec<Value>> { Vec::new() };
        assert!(invoke_stream(&mut session, &stream, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_stream_call_display() {
        let mut session = Session::new();
        let q = Term::Object(session.intern_object(vec![0.0]));
        let call = StreamCall::new("sample-ik", vec![q], 1);
        assert_eq!(call.to_string(), "sample-ik[1](@0)");
    }
}
