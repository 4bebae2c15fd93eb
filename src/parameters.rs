// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Definitions of the result parameters, grouped by the sets they are
//! indexed over, together with their unit rules.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::{Error, UnitRule};

/// A result parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDefinition {
    pub id: String,
    /// The display name of the parameter.
    pub name: String,
    pub unit_rule: Option<UnitRule>,
}

impl ParameterDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_rule: Option<UnitRule>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_rule,
        }
    }
}

#[derive(Deserialize)]
struct RawParameter {
    id: String,
    #[serde(default)]
    value: String,
    #[serde(rename = "unitRule", default)]
    unit_rule: Option<Value>,
}

/// All result parameters, by group, in definition order.
#[derive(Clone, Debug, Default)]
pub struct ParameterDefinitions {
    groups: Vec<(String, Vec<ParameterDefinition>)>,
    group_indices: HashMap<String, usize>,
}

impl ParameterDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a `ResultParameters.json` style document, of the form
    /// `{ group: [ { "id": .., "value": .., "unitRule": .. }, .. ] }`.
    ///
    /// Unit rules are parsed eagerly, so that an invalid rule is reported
    /// here rather than while building a pivot.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let Value::Object(groups) = value else {
            return Err(Error::invalid_parameter_data(
                "Parameter definitions must be an object of groups.",
            ));
        };

        let mut definitions = Self::new();
        for (group, parameters) in groups {
            let parameters = Vec::<RawParameter>::deserialize(parameters).map_err(|e| {
                Error::invalid_parameter_data(format!(
                    "Can't read parameters of group {group}: {e}"
                ))
            })?;
            for parameter in parameters {
                let unit_rule = match parameter.unit_rule {
                    Some(Value::Null) | None => None,
                    Some(rule) => Some(UnitRule::parse(&rule).map_err(|e| {
                        Error::invalid_unit_rule(format!(
                            "Unit rule of parameter {} in group {group}: {}",
                            parameter.id,
                            e.description()
                        ))
                    })?),
                };
                definitions.insert(
                    group,
                    ParameterDefinition::new(parameter.id, parameter.value, unit_rule),
                );
            }
        }

        Ok(definitions)
    }

    /// Adds a parameter definition to the given group.
    pub fn insert(&mut self, group: &str, definition: ParameterDefinition) -> &mut Self {
        let idx = match self.group_indices.get(group) {
            Some(idx) => *idx,
            None => {
                self.groups.push((group.to_string(), vec![]));
                self.group_indices
                    .insert(group.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].1.push(definition);
        self
    }

    /// Returns the definition of `param` in `group`.
    pub fn definition(&self, group: &str, param: &str) -> Result<&ParameterDefinition, Error> {
        let parameters = self.group(group).ok_or_else(|| {
            Error::parameter_not_found(format!("Parameter group {group} not found."))
        })?;
        parameters.iter().find(|p| p.id == param).ok_or_else(|| {
            Error::parameter_not_found(format!("Parameter {param} not found in group {group}."))
        })
    }

    /// Returns the first group containing a parameter with the given id,
    /// along with its definition.
    pub fn find_by_id(&self, param: &str) -> Option<(&str, &ParameterDefinition)> {
        self.groups().find_map(|(group, parameters)| {
            parameters
                .iter()
                .find(|p| p.id == param)
                .map(|p| (group, p))
        })
    }

    /// Returns the parameters of a group, if it exists.
    pub fn group(&self, group: &str) -> Option<&[ParameterDefinition]> {
        self.group_indices
            .get(group)
            .map(|idx| self.groups[*idx].1.as_slice())
    }

    /// Returns an iterator over the `(id, display name)` pairs of the
    /// parameters of a group.
    pub fn parameter_names<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.group(group)
            .into_iter()
            .flatten()
            .map(|p| (p.id.as_str(), p.name.as_str()))
    }

    /// Returns an iterator over all groups and their parameters.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ParameterDefinition])> {
        self.groups
            .iter()
            .map(|(group, parameters)| (group.as_str(), parameters.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "R": [
                {"id": "OV", "value": "Objective Value", "unitRule": {"cat": []}}
            ],
            "RYT": [
                {"id": "NC", "value": "New Capacity",
                 "unitRule": {"cat": [{"var": "CapUnitId"}]}},
                {"id": "AC", "value": "Annual Cost"}
            ],
            "RYTC": [
                {"id": "IAR", "value": "Input Activity Ratio",
                 "unitRule": {"cat": [{"var": "CommUnit"}, {"var": "divide"}, {"var": "ActUnitId"}]}}
            ]
        })
    }

    #[test]
    fn test_from_json() -> Result<(), Error> {
        let definitions = ParameterDefinitions::from_json(&document())?;

        assert_eq!(
            definitions.groups().map(|(g, _)| g).collect::<Vec<_>>(),
            vec!["R", "RYT", "RYTC"]
        );

        let nc = definitions.definition("RYT", "NC")?;
        assert_eq!(nc.name, "New Capacity");
        assert_eq!(nc.unit_rule, Some(UnitRule::cat_vars(["CapUnitId"])));
        assert_eq!(definitions.definition("RYT", "AC")?.unit_rule, None);

        assert!(definitions
            .definition("RYT", "IAR")
            .is_err_and(|e| e == Error::parameter_not_found("Parameter IAR not found in group RYT.")));
        assert!(definitions
            .definition("RYS", "IAR")
            .is_err_and(|e| e == Error::parameter_not_found("Parameter group RYS not found.")));

        assert_eq!(
            definitions.find_by_id("IAR").map(|(g, p)| (g, p.name.as_str())),
            Some(("RYTC", "Input Activity Ratio"))
        );
        assert!(definitions.find_by_id("XYZ").is_none());

        assert_eq!(
            definitions.parameter_names("RYT").collect::<Vec<_>>(),
            vec![("NC", "New Capacity"), ("AC", "Annual Cost")]
        );
        assert_eq!(definitions.parameter_names("RYS").count(), 0);

        Ok(())
    }

    #[test]
    fn test_invalid_documents() {
        assert!(ParameterDefinitions::from_json(&json!([])).is_err_and(|e| e
            == Error::invalid_parameter_data(
                "Parameter definitions must be an object of groups."
            )));
        assert!(ParameterDefinitions::from_json(&json!({"RYT": [{"value": "no id"}]}))
            .is_err_and(|e| e.is_configuration_error()
                && e.to_string()
                    .starts_with("InvalidParameterData: Can't read parameters of group RYT")));
        assert!(ParameterDefinitions::from_json(&json!({"RYT": {"id": "NC"}}))
            .is_err_and(|e| e.to_string().starts_with("InvalidParameterData")));
        assert!(ParameterDefinitions::from_json(&json!({
            "RYT": [{"id": "NC", "unitRule": {"concat": []}}]
        }))
        .is_err_and(|e| e
            == Error::invalid_unit_rule(
                "Unit rule of parameter NC in group RYT: Unknown operator: `concat`"
            )));
    }
}
