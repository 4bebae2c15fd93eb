// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Raw optimizer results, as stored per parameter and case.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::Error;

/// One row of raw optimizer output for a case and a parameter.
///
/// Dimension references hold display names, as they were when the case was
/// run.  They may no longer exist in the current reference tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultRecord {
    pub tech: Option<String>,
    pub comm: Option<String>,
    pub emi: Option<String>,
    pub stg: Option<String>,
    pub con: Option<String>,
    pub mode: Option<String>,
    pub time_slice: Option<String>,
    /// Set only on objective value records, which have no year values.
    pub objective_value: Option<f64>,
    /// Values by year label.
    pub values: BTreeMap<String, Option<f64>>,
}

impl ResultRecord {
    /// Creates a record without dimensions or values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an objective value record.
    pub fn objective(value: f64) -> Self {
        Self {
            objective_value: Some(value),
            ..Self::default()
        }
    }

    pub fn with_tech(mut self, tech: impl Into<String>) -> Self {
        self.tech = Some(tech.into());
        self
    }

    pub fn with_comm(mut self, comm: impl Into<String>) -> Self {
        self.comm = Some(comm.into());
        self
    }

    pub fn with_emi(mut self, emi: impl Into<String>) -> Self {
        self.emi = Some(emi.into());
        self
    }

    pub fn with_stg(mut self, stg: impl Into<String>) -> Self {
        self.stg = Some(stg.into());
        self
    }

    pub fn with_con(mut self, con: impl Into<String>) -> Self {
        self.con = Some(con.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_time_slice(mut self, time_slice: impl Into<String>) -> Self {
        self.time_slice = Some(time_slice.into());
        self
    }

    pub fn with_value(mut self, year: impl Into<String>, value: f64) -> Self {
        self.values.insert(year.into(), Some(value));
        self
    }

    /// Returns the value for the given year, or `None` if there is none.
    pub fn value(&self, year: &str) -> Option<f64> {
        self.values.get(year).copied().flatten()
    }

    pub fn is_objective(&self) -> bool {
        self.objective_value.is_some()
    }

    /// Reads a record from a JSON object.
    ///
    /// The keys `Tech`, `Comm`, `Emi`, `Stg`, `Con`, `MoId`, `Ts` and
    /// `ObjectiveValue` are recognised.  Every other key holding a number or
    /// `null` is taken to be a year value; other fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let Value::Object(fields) = value else {
            return Err(Error::invalid_result_data(format!(
                "Result records must be objects, found: {value}"
            )));
        };

        let mut record = Self::new();
        for (key, field) in fields {
            match key.as_str() {
                "Tech" => record.tech = label(key, field)?,
                "Comm" => record.comm = label(key, field)?,
                "Emi" => record.emi = label(key, field)?,
                "Stg" => record.stg = label(key, field)?,
                "Con" => record.con = label(key, field)?,
                "MoId" => record.mode = label(key, field)?,
                "Ts" => record.time_slice = label(key, field)?,
                "ObjectiveValue" => record.objective_value = number(key, field)?,
                year => match field {
                    Value::Null => {
                        record.values.insert(year.to_string(), None);
                    }
                    Value::Number(n) => {
                        record.values.insert(year.to_string(), n.as_f64());
                    }
                    other => tracing::debug!("Ignoring result field {key}: {other}"),
                },
            }
        }
        Ok(record)
    }
}

/// Reads a dimension label.  Mode ids are often stored as numbers, and empty
/// labels are treated as absent.
fn label(key: &str, field: &Value) -> Result<Option<String>, Error> {
    match field {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(Error::invalid_result_data(format!(
            "Field {key} must be a string, found: {other}"
        ))),
    }
}

fn number(key: &str, field: &Value) -> Result<Option<f64>, Error> {
    match field {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(Error::invalid_result_data(format!(
            "Field {key} must be a number, found: {other}"
        ))),
    }
}

/// The records of a single case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaseResults {
    pub case: String,
    pub records: Vec<ResultRecord>,
}

/// Result records by parameter id and case.  Cases keep the order in which
/// they were added.
#[derive(Clone, Debug, Default)]
pub struct ResultData {
    params: HashMap<String, Vec<CaseResults>>,
}

impl ResultData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a result document of the form
    /// `{ param: { case: [ record, .. ] } }`, keeping document order.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let params = object(value, "Result data")?;
        let mut data = Self::new();
        for (param, cases) in params {
            for (case, records) in object(cases, &format!("Results of parameter {param}"))? {
                let Value::Array(records) = records else {
                    return Err(Error::invalid_result_data(format!(
                        "Results of parameter {param} for case {case} must be an array."
                    )));
                };
                let records = records
                    .iter()
                    .map(ResultRecord::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                data.insert(param, case, records);
            }
            // Parameters without cases are still known.
            data.params.entry(param.clone()).or_default();
        }
        Ok(data)
    }

    /// Appends records to the given parameter and case.
    pub fn insert(
        &mut self,
        param: &str,
        case: &str,
        records: impl IntoIterator<Item = ResultRecord>,
    ) -> &mut Self {
        let cases = self.params.entry(param.to_string()).or_default();
        match cases.iter_mut().find(|c| c.case == case) {
            Some(existing) => existing.records.extend(records),
            None => cases.push(CaseResults {
                case: case.to_string(),
                records: records.into_iter().collect(),
            }),
        }
        self
    }

    /// Returns the results of a parameter by case, or `None` if the
    /// parameter is unknown.
    pub fn cases(&self, param: &str) -> Option<&[CaseResults]> {
        self.params.get(param).map(Vec::as_slice)
    }

    /// Returns true if the first case of the parameter has no records.
    ///
    /// This is how a run without any activity for a parameter shows up.
    pub fn is_empty_for(&self, param: &str) -> bool {
        self.cases(param)
            .and_then(|cases| cases.first())
            .map_or(true, |first| first.records.is_empty())
    }
}

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_result_data(format!(
            "{what} must be an object, found: {other}"
        ))),
    }
}
