//! Parenthesized surface syntax shared with the external solver.
//!
//! ## Supported Syntax
//!
//! - **Predicates**: `(on cup table)`, list arguments such as `(conf (0.1 0.2))`
//! - **Connectives**: `(and e1 e2 ...)`, `(or e1 e2 ...)`, `(not e)`
//! - **Fluents**: `(= (cost a) 5)`, `(= (owner cup) (agent robot))`
//! - **Quantifiers**: `(exists (?p ?q - pose) e)`, `(forall (?o) e)`
//! - **Conditionals**: `(implies e1 e2)`, `(when e1 e2)`
//! - **Comments**: `;` to end of line
//!
//! ## Examples
//!
//! ```
//! use streamlogic_ir::{Expr, Surface, Value};
//!
//! let surface = Surface::parse("(and (CanMove) (Conf (0 1.5)))").unwrap();
//! let expr = Expr::<Value>::from_surface(&surface).unwrap();
//! assert_eq!(
//!     expr,
//!     Expr::and(vec![
//!         Expr::pred("CanMove", vec![]),
//!         Expr::pred("Conf", vec![Value::list([Value::Int(0), Value::float(1.5)])]),
//!     ])
//! );
//! ```

use std::fmt;

use crate::error::{IrError, IrResult};
use crate::expr::{Expr, Operator, Param, Rhs};
use crate::value::Value;

/// Untyped s-expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Atom(String),
    List(Vec<Surface>),
}

impl Surface {
    pub fn atom(text: impl Into<String>) -> Self {
        Surface::Atom(text.into())
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Surface::Atom(text) => Some(text),
            Surface::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Surface]> {
        match self {
            Surface::List(items) => Some(items),
            Surface::Atom(_) => None,
        }
    }

    /// Parse exactly one top-level form.
    pub fn parse(input: &str) -> IrResult<Surface> {
        let mut forms = Self::parse_all(input)?;
        match forms.len() {
            1 => Ok(forms.remove(0)),
            n => Err(IrError::Parse {
                offset: 0,
                message: format!("expected exactly one form, found {}", n),
            }),
        }
    }

    /// Parse every top-level form in `input`.
    pub fn parse_all(input: &str) -> IrResult<Vec<Surface>> {
        let tokens = tokenize(input);
        let mut pos = 0;
        let mut forms = Vec::new();
        while pos < tokens.len() {
            let (form, next) = parse_form(&tokens, pos)?;
            forms.push(form);
            pos = next;
        }
        Ok(forms)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Atom(text) => write!(f, "{}", text),
            Surface::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Symbol(String),
}

/// Tokens paired with their byte offset.
fn tokenize(input: &str) -> Vec<(usize, Token)> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut in_comment = false;

    for (offset, ch) in input.char_indices() {
        if in_comment {
            in_comment = ch != '\n';
            continue;
        }
        let delimiter = ch.is_whitespace() || matches!(ch, '(' | ')' | ';');
        if delimiter && !current.is_empty() {
            tokens.push((start, Token::Symbol(std::mem::take(&mut current))));
        }
        match ch {
            '(' => tokens.push((offset, Token::LParen)),
            ')' => tokens.push((offset, Token::RParen)),
            ';' => in_comment = true,
            c if c.is_whitespace() => {}
            c => {
                if current.is_empty() {
                    start = offset;
                }
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        tokens.push((start, Token::Symbol(current)));
    }
    tokens
}

fn parse_form(tokens: &[(usize, Token)], pos: usize) -> IrResult<(Surface, usize)> {
    let Some((offset, token)) = tokens.get(pos) else {
        return Err(IrError::Parse {
            offset: tokens.last().map(|(o, _)| o + 1).unwrap_or(0),
            message: "unexpected end of input".to_string(),
        });
    };
    match token {
        Token::Symbol(text) => Ok((Surface::Atom(text.clone()), pos + 1)),
        Token::RParen => Err(IrError::Parse {
            offset: *offset,
            message: "unexpected ')'".to_string(),
        }),
        Token::LParen => {
            let mut items = Vec::new();
            let mut pos = pos + 1;
            loop {
                match tokens.get(pos) {
                    Some((_, Token::RParen)) => return Ok((Surface::List(items), pos + 1)),
                    Some(_) => {
                        let (item, next) = parse_form(tokens, pos)?;
                        items.push(item);
                        pos = next;
                    }
                    None => {
                        return Err(IrError::Parse {
                            offset: *offset,
                            message: "unclosed '('".to_string(),
                        })
                    }
                }
            }
        }
    }
}

impl Value {
    /// Surface form of a raw value; lists become nested lists.
    pub fn to_surface(&self) -> Surface {
        match self {
            Value::List(items) => Surface::List(items.iter().map(Value::to_surface).collect()),
            scalar => Surface::Atom(scalar.to_string()),
        }
    }

    /// Read a value from its surface form.
    pub fn from_surface(surface: &Surface) -> Value {
        match surface {
            Surface::Atom(text) => Value::parse_atom(text),
            Surface::List(items) => Value::List(items.iter().map(Value::from_surface).collect()),
        }
    }
}

impl Expr<Value> {
    /// Read a raw-space expression, dispatching on the prefix.
    ///
    /// `()` is the empty expression. A bare atom is a nullary predicate.
    pub fn from_surface(surface: &Surface) -> IrResult<Self> {
        let items = match surface {
            Surface::Atom(name) => return Ok(Expr::pred(name.clone(), vec![])),
            Surface::List(items) => items,
        };
        let Some((first, rest)) = items.split_first() else {
            return Ok(Expr::empty());
        };
        let Some(prefix) = first.as_atom() else {
            return Err(IrError::structural(format!(
                "expression must start with an operator or predicate name, found {}",
                first
            )));
        };

        let Some(operator) = Operator::parse(prefix) else {
            return Ok(Expr::pred(prefix, rest.iter().map(Value::from_surface).collect()));
        };
        match operator {
            Operator::And => Ok(Expr::And(children(rest)?)),
            Operator::Or => Ok(Expr::Or(children(rest)?)),
            Operator::Not => {
                let [inner] = expect_arity::<1>(operator, rest)?;
                Ok(Expr::negate(Self::from_surface(inner)?))
            }
            Operator::Equal => {
                let [head, value] = expect_arity::<2>(operator, rest)?;
                let head = Self::from_surface(head)?;
                Ok(match value {
                    Surface::List(_) => Expr::equal_expr(head, Self::from_surface(value)?),
                    Surface::Atom(text) => Expr::Equal {
                        head: Box::new(head),
                        value: Rhs::Scalar(Value::parse_atom(text)),
                    },
                })
            }
            Operator::Exists | Operator::Forall => {
                let [params, body] = expect_arity::<2>(operator, rest)?;
                let params = params_from_surface(params)?;
                let body = Self::from_surface(body)?;
                Ok(if operator == Operator::Exists {
                    Expr::exists(params, body)
                } else {
                    Expr::forall(params, body)
                })
            }
            Operator::Implies | Operator::When => {
                let [l, r] = expect_arity::<2>(operator, rest)?;
                let (l, r) = (Self::from_surface(l)?, Self::from_surface(r)?);
                Ok(if operator == Operator::Implies {
                    Expr::implies(l, r)
                } else {
                    Expr::when(l, r)
                })
            }
        }
    }
}

fn children(items: &[Surface]) -> IrResult<Vec<Expr<Value>>> {
    items.iter().map(Expr::<Value>::from_surface).collect()
}

fn expect_arity<'a, const N: usize>(
    operator: Operator,
    items: &'a [Surface],
) -> IrResult<&'a [Surface; N]> {
    items.try_into().map_err(|_| {
        IrError::structural(format!(
            "'{}' takes {} operand(s), found {}",
            operator,
            N,
            items.len()
        ))
    })
}

/// Read a typed parameter list such as `(?p ?q - pose ?o)`.
pub fn params_from_surface(surface: &Surface) -> IrResult<Vec<Param>> {
    let Some(items) = surface.as_list() else {
        return Err(IrError::structural(format!(
            "quantifier parameters must be a list, found {}",
            surface
        )));
    };

    let mut params: Vec<Param> = Vec::new();
    let mut untyped = 0;
    let mut iter = items.iter();
    while let Some(item) = iter.next() {
        let Some(text) = item.as_atom() else {
            return Err(IrError::structural(format!("invalid parameter {}", item)));
        };
        if text == "-" {
            let ty = iter.next().and_then(Surface::as_atom).ok_or_else(|| {
                IrError::structural("'-' in a parameter list must be followed by a type name")
            })?;
            if untyped == params.len() {
                return Err(IrError::structural(format!("type '{}' has no parameters", ty)));
            }
            for param in &mut params[untyped..] {
                param.ty = Some(ty.to_string());
            }
            untyped = params.len();
        } else if text.starts_with('?') {
            params.push(Param::new(text));
        } else {
            return Err(IrError::structural(format!(
                "parameter '{}' must start with '?'",
                text
            )));
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_lists() {
        let surface = Surface::parse("(on cup (0 1))").unwrap();
        assert_eq!(
            surface,
            Surface::List(vec![
                Surface::atom("on"),
                Surface::atom("cup"),
                Surface::List(vec![Surface::atom("0"), Surface::atom("1")]),
            ])
        );
        assert_eq!(surface.to_string(), "(on cup (0 1))");
    }

    #[test]
    fn test_comments_skipped() {
        let forms = Surface::parse_all("; header\n(a b) ; trailing\n(c)\n").unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[1], Surface::List(vec![Surface::atom("c")]));
    }

    #[test]
    fn test_parse_errors_carry_offset() {
        assert!(matches!(
            Surface::parse_all("(a (b)"),
            Err(IrError::Parse { offset: 0, .. })
        ));
        assert!(matches!(
            Surface::parse_all("(a) )"),
            Err(IrError::Parse { offset: 4, .. })
        ));
    }

    #[test]
    fn test_fluent_forms() {
        let scalar =
            Expr::<Value>::from_surface(&Surface::parse("(= (cost a) 5)").unwrap()).unwrap();
        assert_eq!(scalar, Expr::equal(Expr::pred("cost", vec![Value::str("a")]), 5));

        let compound = Expr::<Value>::from_surface(
            &Surface::parse("(= (owner cup) (agent robot))").unwrap(),
        )
        .unwrap();
        assert_eq!(
            compound,
            Expr::equal_expr(
                Expr::pred("owner", vec![Value::str("cup")]),
                Expr::pred("agent", vec![Value::str("robot")]),
            )
        );
    }

    #[test]
    fn test_typed_params() {
        let params = params_from_surface(&Surface::parse("(?p ?q - pose ?o)").unwrap()).unwrap();
        assert_eq!(
            params,
            vec![
                Param::typed("?p", "pose"),
                Param::typed("?q", "pose"),
                Param::new("?o"),
            ]
        );
        assert!(params_from_surface(&Surface::parse("(- pose)").unwrap()).is_err());
        assert!(params_from_surface(&Surface::parse("(p)").unwrap()).is_err());
    }

    #[test]
    fn test_operator_arity_checked() {
        let surface = Surface::parse("(not (p) (q))").unwrap();
        assert!(matches!(
            Expr::<Value>::from_surface(&surface),
            Err(IrError::Structural { .. })
        ));
    }

    #[test]
    fn test_unknown_prefix_is_predicate() {
        let expr = Expr::<Value>::from_surface(&Surface::parse("(xor a b)").unwrap()).unwrap();
        assert_eq!(expr, Expr::pred("xor", vec![Value::str("a"), Value::str("b")]));
        assert_eq!(
            Expr::<Value>::from_surface(&Surface::List(vec![])).unwrap(),
            Expr::empty()
        );
    }
}
