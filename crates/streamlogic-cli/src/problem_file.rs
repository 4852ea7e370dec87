//! Raw problem files
//!
//! A problem file uses the solver's own layout, except that facts mention raw
//! values instead of object names:
//!
//! ```text
//! (define (problem kitchen)
//!   (:domain pick-and-place)
//!   (:init (Conf (0 0.5)) (AtConf (0 0.5)) (HandEmpty))
//!   (:goal (and (Holding cup))))
//! ```

use anyhow::{anyhow, bail, Context, Result};
use streamlogic_ir::{Expr, Problem, Surface, Value};

/// A parsed problem file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemFile {
    pub name: Option<String>,
    pub domain: String,
    pub init: Vec<Expr<Value>>,
    pub goal: Expr<Value>,
}

impl ProblemFile {
    pub fn parse(text: &str) -> Result<Self> {
        let surface = Surface::parse(text).context("Failed to read problem file")?;
        let items = surface
            .as_list()
            .ok_or_else(|| anyhow!("Problem file must be a (define ...) form"))?;

        match items.first().and_then(Surface::as_atom) {
            Some(head) if head.eq_ignore_ascii_case("define") => {}
            _ => bail!("Problem file must start with (define ...)"),
        }

        let mut name = None;
        let mut domain = None;
        let mut init = None;
        let mut goal = None;

        for section in &items[1..] {
            let parts = section
                .as_list()
                .ok_or_else(|| anyhow!("Unexpected atom '{}' in problem file", section))?;
            let keyword = parts
                .first()
                .and_then(Surface::as_atom)
                .ok_or_else(|| anyhow!("Section {} has no keyword", section))?;

            match keyword.to_ascii_lowercase().as_str() {
                "problem" => name = Some(single_atom(parts, "problem")?),
                ":domain" => domain = Some(single_atom(parts, ":domain")?),
                ":init" => {
                    let facts = parts[1..]
                        .iter()
                        .map(Expr::<Value>::from_surface)
                        .collect::<Result<Vec<_>, _>>()
                        .context("Invalid fact in :init")?;
                    init = Some(facts);
                }
                ":goal" => {
                    if parts.len() != 2 {
                        bail!(":goal takes exactly one expression");
                    }
                    let expr =
                        Expr::<Value>::from_surface(&parts[1]).context("Invalid :goal expression")?;
                    goal = Some(expr);
                }
                // Raw values are listed by the facts themselves
                ":objects" => {}
                other => bail!("Unknown problem section '{}'", other),
            }
        }

        Ok(ProblemFile {
            name,
            domain: domain.ok_or_else(|| anyhow!("Problem file has no (:domain ...) section"))?,
            init: init.unwrap_or_default(),
            goal: goal.ok_or_else(|| anyhow!("Problem file has no (:goal ...) section"))?,
        })
    }

    pub fn into_problem(self) -> Problem {
        Problem::new(self.init, self.goal, self.domain)
    }
}

fn single_atom(parts: &[Surface], keyword: &str) -> Result<String> {
    match parts {
        [_, Surface::Atom(value)] => Ok(value.clone()),
        _ => bail!("({} ...) takes exactly one name", keyword),
    }
}
