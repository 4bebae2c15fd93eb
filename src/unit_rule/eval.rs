// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Evaluation of [`UnitRule`] trees against a [`UnitContext`].

use super::{ArithmeticOp, CompareOp, UnitRule};
use crate::UnitContext;

/// The value a unit rule, or a part of one, evaluates to.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<RuleValue>),
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl std::fmt::Display for RuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(items) => write!(
                f,
                "{}",
                items
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}

/// Conversions following JsonLogic's loose typing.
impl RuleValue {
    /// Returns the text form of the value, with `null` as the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::List(items) => items
                .iter()
                .map(|i| i.as_text())
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }

    /// Returns the numeric form of the value, or NaN if there is none.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) if s.trim().is_empty() => 0.0,
            Self::String(s) => s.trim().parse().unwrap_or(f64::NAN),
            Self::List(_) => f64::NAN,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(_), _) | (_, Self::List(_)) => self.as_text() == other.as_text(),
            (a, b) => a.as_number() == b.as_number(),
        }
    }

    fn compare(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (a, b) => a.as_number().partial_cmp(&b.as_number()),
        }
    }
}

impl UnitRule {
    /// Evaluates the rule against the given context.
    ///
    /// Evaluation never fails: unknown variables are `null`, and invalid
    /// arithmetic yields NaN, as in JsonLogic.
    pub fn evaluate(&self, context: &UnitContext) -> RuleValue {
        match self {
            Self::Literal { value } => value.clone(),
            Self::List { params } => {
                RuleValue::List(params.iter().map(|p| p.evaluate(context)).collect())
            }
            Self::Var { name, default } => match context.get(name) {
                Some(value) => RuleValue::from(value),
                None => default
                    .as_ref()
                    .map(|d| d.evaluate(context))
                    .unwrap_or(RuleValue::Null),
            },
            Self::Cat { params } => RuleValue::String(
                params
                    .iter()
                    .map(|p| p.evaluate(context).as_text())
                    .collect(),
            ),
            Self::If { params } => {
                for chunk in params.chunks(2) {
                    match chunk {
                        [condition, then] => {
                            if condition.evaluate(context).is_truthy() {
                                return then.evaluate(context);
                            }
                        }
                        [otherwise] => return otherwise.evaluate(context),
                        _ => {}
                    }
                }
                RuleValue::Null
            }
            Self::Not { param } => RuleValue::Bool(!param.evaluate(context).is_truthy()),
            Self::Truthy { param } => RuleValue::Bool(param.evaluate(context).is_truthy()),
            Self::And { params } => {
                let mut last = RuleValue::Null;
                for param in params {
                    last = param.evaluate(context);
                    if !last.is_truthy() {
                        break;
                    }
                }
                last
            }
            Self::Or { params } => {
                let mut last = RuleValue::Null;
                for param in params {
                    last = param.evaluate(context);
                    if last.is_truthy() {
                        break;
                    }
                }
                last
            }
            Self::Compare { op, lhs, rhs } => {
                let (lhs, rhs) = (lhs.evaluate(context), rhs.evaluate(context));
                RuleValue::Bool(match op {
                    CompareOp::Eq => lhs.loose_eq(&rhs),
                    CompareOp::NotEq => !lhs.loose_eq(&rhs),
                    CompareOp::StrictEq => lhs == rhs,
                    CompareOp::StrictNotEq => lhs != rhs,
                    CompareOp::Lt => lhs.compare(&rhs).is_some_and(|o| o.is_lt()),
                    CompareOp::Le => lhs.compare(&rhs).is_some_and(|o| o.is_le()),
                    CompareOp::Gt => lhs.compare(&rhs).is_some_and(|o| o.is_gt()),
                    CompareOp::Ge => lhs.compare(&rhs).is_some_and(|o| o.is_ge()),
                })
            }
            Self::Arithmetic { op, params } => {
                let mut values = params.iter().map(|p| p.evaluate(context).as_number());
                let first = values.next().unwrap_or(0.0);
                let result = match op {
                    ArithmeticOp::Sub if params.len() == 1 => -first,
                    ArithmeticOp::Add => first + values.sum::<f64>(),
                    ArithmeticOp::Mul => values.fold(first, |acc, v| acc * v),
                    ArithmeticOp::Sub => values.fold(first, |acc, v| acc - v),
                    ArithmeticOp::Div => values.fold(first, |acc, v| acc / v),
                    ArithmeticOp::Rem => values.fold(first, |acc, v| acc % v),
                };
                RuleValue::Number(result)
            }
            Self::Min { params } => RuleValue::Number(
                params
                    .iter()
                    .map(|p| p.evaluate(context).as_number())
                    .fold(f64::INFINITY, f64::min),
            ),
            Self::Max { params } => RuleValue::Number(
                params
                    .iter()
                    .map(|p| p.evaluate(context).as_number())
                    .fold(f64::NEG_INFINITY, f64::max),
            ),
            Self::In { needle, haystack } => {
                let needle = needle.evaluate(context);
                RuleValue::Bool(match haystack.evaluate(context) {
                    RuleValue::List(items) => items.iter().any(|i| i.loose_eq(&needle)),
                    RuleValue::String(s) => s.contains(&needle.as_text()),
                    _ => false,
                })
            }
        }
    }

    /// Evaluates the rule and returns its result as a unit label.
    pub fn render(&self, context: &UnitContext) -> String {
        self.evaluate(context).as_text()
    }
}

#[cfg(test)]
mod tests {
    use crate::unit_rule::{RuleValue, UnitRule};
    use crate::{Error, UnitContext};
    use serde_json::json;

    fn context() -> UnitContext {
        let mut context = UnitContext::with_markers("MUSD");
        context.insert("CapUnitId", "GW");
        context.insert("ActUnitId", "PJ");
        context
    }

    #[track_caller]
    fn assert_render(rule: serde_json::Value, expected: &str) -> Result<(), Error> {
        assert_eq!(UnitRule::parse(&rule)?.render(&context()), expected);
        Ok(())
    }

    #[test]
    fn test_cat() -> Result<(), Error> {
        assert_render(
            json!({"cat": [{"var": "Currency"}, {"var": "divide"}, {"var": "CapUnitId"}]}),
            "MUSD/GW",
        )?;
        assert_render(
            json!({"cat": [{"var": "thousand"}, {"var": "ActUnitId"}]}),
            "10<sup>3</sup>PJ",
        )?;
        assert_render(json!({"cat": [{"var": "percent"}]}), "%")?;
        assert_render(json!({"cat": []}), "")?;
        assert_render(json!({"cat": ["(", {"var": "missing"}, ")"]}), "()")?;
        Ok(())
    }

    #[test]
    fn test_var() -> Result<(), Error> {
        assert_render(json!({"var": "years"}), "years")?;
        assert_render(json!({"var": ["CommUnit", "n/a"]}), "n/a")?;
        assert_render(json!({"var": "CommUnit"}), "")?;
        Ok(())
    }

    #[test]
    fn test_logic() -> Result<(), Error> {
        assert_render(
            json!({"if": [{"==": [{"var": "CapUnitId"}, "GW"]}, "gigawatt", "other"]}),
            "gigawatt",
        )?;
        assert_render(
            json!({"if": [
                {"===": [{"var": "CapUnitId"}, "MW"]}, "megawatt",
                {"!=": [{"var": "ActUnitId"}, "TWh"]}, "not twh",
                "other"
            ]}),
            "not twh",
        )?;
        assert_render(json!({"if": [false, "a"]}), "")?;
        assert_render(json!({"and": [true, "x", {"var": "CapUnitId"}]}), "GW")?;
        assert_render(json!({"and": [true, "", "x"]}), "")?;
        assert_render(json!({"or": [false, {"var": "nope"}, "fallback"]}), "fallback")?;
        assert_render(json!({"!": {"var": "nope"}}), "true")?;
        assert_render(json!({"!!": [{"var": "CapUnitId"}]}), "true")?;
        assert_render(json!({"in": [{"var": "CapUnitId"}, ["MW", "GW"]]}), "true")?;
        assert_render(json!({"in": ["W", {"var": "CapUnitId"}]}), "true")?;
        assert_render(json!({"<": ["a", "b"]}), "true")?;
        assert_render(json!({">=": [1, "2"]}), "false")?;
        Ok(())
    }

    #[test]
    fn test_arithmetic() -> Result<(), Error> {
        let ctx = context();
        let eval = |rule: serde_json::Value| -> Result<RuleValue, Error> {
            Ok(UnitRule::parse(&rule)?.evaluate(&ctx))
        };

        assert_eq!(eval(json!({"+": [1, "2", 3.5]}))?, RuleValue::Number(6.5));
        assert_eq!(eval(json!({"*": [{"var": "hundert"}, 2]}))?, RuleValue::Number(200.0));
        assert_eq!(eval(json!({"-": [5]}))?, RuleValue::Number(-5.0));
        assert_eq!(eval(json!({"-": [5, 7]}))?, RuleValue::Number(-2.0));
        assert_eq!(eval(json!({"/": [9, 3]}))?, RuleValue::Number(3.0));
        assert_eq!(eval(json!({"%": [9, 4]}))?, RuleValue::Number(1.0));
        assert_eq!(eval(json!({"min": [4, 2, 9]}))?, RuleValue::Number(2.0));
        assert_eq!(eval(json!({"max": [4, 2, 9]}))?, RuleValue::Number(9.0));
        assert!(eval(json!({"+": [1, {"var": "CapUnitId"}]}))?
            .as_number()
            .is_nan());
        assert_eq!(
            UnitRule::parse(&json!({"*": [{"var": "hundert"}, 1]}))?.render(&ctx),
            "100"
        );
        Ok(())
    }
}
