// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Unit rules compute the display unit of a parameter from the unit codes of
//! the entities a result row refers to.
//!
//! Rules are stored as JsonLogic-style documents, for example:
//!
//! ```json
//! {"cat": [{"var": "Currency"}, {"var": "divide"}, {"var": "CapUnitId"}]}
//! ```
//!
//! They are parsed once into a [`UnitRule`] tree, and evaluated against a
//! [`UnitContext`][crate::UnitContext] for every row.

mod eval;
mod parse;

pub use eval::RuleValue;

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompareOp {
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// A parsed unit rule.
#[derive(Clone, Debug, PartialEq)]
pub enum UnitRule {
    Literal {
        value: RuleValue,
    },
    List {
        params: Vec<UnitRule>,
    },
    Var {
        name: String,
        default: Option<Box<UnitRule>>,
    },
    Cat {
        params: Vec<UnitRule>,
    },
    /// Condition/value pairs, with an optional trailing else value.
    If {
        params: Vec<UnitRule>,
    },
    Not {
        param: Box<UnitRule>,
    },
    Truthy {
        param: Box<UnitRule>,
    },
    And {
        params: Vec<UnitRule>,
    },
    Or {
        params: Vec<UnitRule>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<UnitRule>,
        rhs: Box<UnitRule>,
    },
    Arithmetic {
        op: ArithmeticOp,
        params: Vec<UnitRule>,
    },
    Min {
        params: Vec<UnitRule>,
    },
    Max {
        params: Vec<UnitRule>,
    },
    In {
        needle: Box<UnitRule>,
        haystack: Box<UnitRule>,
    },
}

/// Constructors for `UnitRule`.
impl UnitRule {
    pub fn literal(value: impl Into<RuleValue>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Var {
            name: name.into(),
            default: None,
        }
    }

    pub fn cat(params: Vec<UnitRule>) -> Self {
        Self::Cat { params }
    }

    /// A rule that concatenates the context values of the given variables.
    ///
    /// This is the shape of nearly all stored unit rules.
    pub fn cat_vars<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::cat(names.into_iter().map(Self::var).collect())
    }
}

impl std::fmt::Display for UnitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.generate_string())
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            CompareOp::Eq => "==",
            CompareOp::StrictEq => "===",
            CompareOp::NotEq => "!=",
            CompareOp::StrictNotEq => "!==",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        write!(f, "{op}")
    }
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Rem => "%",
        };
        write!(f, "{op}")
    }
}

/// Display helpers for `UnitRule`.
impl UnitRule {
    fn join(params: &[UnitRule], separator: &str) -> String {
        params
            .iter()
            .map(|p| p.generate_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn join_params(params: &[UnitRule], separator: &str, prefix: Option<&str>) -> String {
        let joined = Self::join(params, separator);
        match prefix {
            Some(prefix) => format!("{prefix}({joined})"),
            None => format!("({joined})"),
        }
    }

    fn generate_string(&self) -> String {
        match self {
            Self::Literal { value } => match value {
                RuleValue::String(s) => format!("{s:?}"),
                other => other.to_string(),
            },
            Self::List { params } => format!("[{}]", Self::join(params, ", ")),
            Self::Var { name, default } => match default {
                Some(default) => format!("${name}?{}", default.generate_string()),
                None => format!("${name}"),
            },
            Self::Cat { params } => Self::join_params(params, ", ", Some("CAT")),
            Self::If { params } => Self::join_params(params, ", ", Some("IF")),
            Self::Not { param } => format!("!{}", param.generate_string()),
            Self::Truthy { param } => format!("!!{}", param.generate_string()),
            Self::And { params } => Self::join_params(params, " && ", None),
            Self::Or { params } => Self::join_params(params, " || ", None),
            Self::Compare { op, lhs, rhs } => {
                format!("({} {op} {})", lhs.generate_string(), rhs.generate_string())
            }
            Self::Arithmetic { op, params } => match params.as_slice() {
                [param] => format!("{op}{}", param.generate_string()),
                _ => Self::join_params(params, &format!(" {op} "), None),
            },
            Self::Min { params } => Self::join_params(params, ", ", Some("MIN")),
            Self::Max { params } => Self::join_params(params, ", ", Some("MAX")),
            Self::In { needle, haystack } => {
                format!("({} in {})", needle.generate_string(), haystack.generate_string())
            }
        }
    }
}
