// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Parsing of JsonLogic documents into [`UnitRule`] trees.

use serde_json::Value;

use super::{ArithmeticOp, CompareOp, RuleValue, UnitRule};
use crate::Error;

impl UnitRule {
    /// Parses a JsonLogic document into a `UnitRule`.
    ///
    /// Returns an error for unknown operators, for objects that don't have
    /// exactly one operator key, and for operators given the wrong number of
    /// arguments.
    pub fn parse(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::literal(RuleValue::Null)),
            Value::Bool(b) => Ok(Self::literal(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(Self::literal)
                .ok_or_else(|| Error::invalid_unit_rule(format!("Unsupported number: {n}"))),
            Value::String(s) => Ok(Self::literal(s.as_str())),
            Value::Array(items) => Ok(Self::List {
                params: Self::parse_all(items)?,
            }),
            Value::Object(map) => {
                let mut entries = map.iter();
                let (Some((op, args)), None) = (entries.next(), entries.next()) else {
                    return Err(Error::invalid_unit_rule(format!(
                        "Expected exactly one operator, found {} in: {value}",
                        map.len()
                    )));
                };
                Self::parse_operation(op, args)
            }
        }
    }

    fn parse_all(items: &[Value]) -> Result<Vec<Self>, Error> {
        items.iter().map(Self::parse).collect()
    }

    fn parse_operation(op: &str, args: &Value) -> Result<Self, Error> {
        // Unary operations may be written without the argument array.
        let mut params = match args {
            Value::Array(items) => Self::parse_all(items)?,
            other => vec![Self::parse(other)?],
        };

        let rule = match op {
            "var" => {
                check_arity(op, params.len(), 1, Some(2))?;
                let default = if params.len() == 2 { params.pop() } else { None };
                let name = match params.pop() {
                    Some(Self::Literal { value }) => value.as_text(),
                    other => {
                        return Err(Error::invalid_unit_rule(format!(
                            "Variable names must be literals, found: {other:?}"
                        )))
                    }
                };
                Self::Var {
                    name,
                    default: default.map(Box::new),
                }
            }
            "cat" => Self::Cat { params },
            "if" | "?:" => {
                check_arity(op, params.len(), 1, None)?;
                Self::If { params }
            }
            "!" | "!!" => {
                check_arity(op, params.len(), 1, Some(1))?;
                let param = Box::new(params.remove(0));
                if op == "!" {
                    Self::Not { param }
                } else {
                    Self::Truthy { param }
                }
            }
            "and" => {
                check_arity(op, params.len(), 1, None)?;
                Self::And { params }
            }
            "or" => {
                check_arity(op, params.len(), 1, None)?;
                Self::Or { params }
            }
            "==" | "===" | "!=" | "!==" | "<" | "<=" | ">" | ">=" => {
                check_arity(op, params.len(), 2, Some(2))?;
                let op = match op {
                    "==" => CompareOp::Eq,
                    "===" => CompareOp::StrictEq,
                    "!=" => CompareOp::NotEq,
                    "!==" => CompareOp::StrictNotEq,
                    "<" => CompareOp::Lt,
                    "<=" => CompareOp::Le,
                    ">" => CompareOp::Gt,
                    _ => CompareOp::Ge,
                };
                let rhs = Box::new(params.remove(1));
                let lhs = Box::new(params.remove(0));
                Self::Compare { op, lhs, rhs }
            }
            "+" => {
                check_arity(op, params.len(), 1, None)?;
                Self::Arithmetic {
                    op: ArithmeticOp::Add,
                    params,
                }
            }
            "*" => {
                check_arity(op, params.len(), 1, None)?;
                Self::Arithmetic {
                    op: ArithmeticOp::Mul,
                    params,
                }
            }
            "-" => {
                check_arity(op, params.len(), 1, Some(2))?;
                Self::Arithmetic {
                    op: ArithmeticOp::Sub,
                    params,
                }
            }
            "/" => {
                check_arity(op, params.len(), 2, Some(2))?;
                Self::Arithmetic {
                    op: ArithmeticOp::Div,
                    params,
                }
            }
            "%" => {
                check_arity(op, params.len(), 2, Some(2))?;
                Self::Arithmetic {
                    op: ArithmeticOp::Rem,
                    params,
                }
            }
            "min" => {
                check_arity(op, params.len(), 1, None)?;
                Self::Min { params }
            }
            "max" => {
                check_arity(op, params.len(), 1, None)?;
                Self::Max { params }
            }
            "in" => {
                check_arity(op, params.len(), 2, Some(2))?;
                let haystack = Box::new(params.remove(1));
                let needle = Box::new(params.remove(0));
                Self::In { needle, haystack }
            }
            _ => {
                return Err(Error::invalid_unit_rule(format!(
                    "Unknown operator: `{op}`"
                )))
            }
        };

        Ok(rule)
    }
}

fn check_arity(op: &str, n: usize, min: usize, max: Option<usize>) -> Result<(), Error> {
    if n < min || max.is_some_and(|max| n > max) {
        return Err(Error::invalid_unit_rule(format!(
            "Operator `{op}` can't take {n} arguments."
        )));
    }
    Ok(())
}
