// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the pivot transform, which turns stored result
//! records into flat rows for display.

mod builder;
mod row;

pub use builder::ResultPivotBuilder;
pub use row::{Description, Label, PivotRow, Unit, WARNING_ICON};

use serde_json::Value;

use crate::{Error, ParameterDefinitions, PivotConfig, ReferenceTables, ResultData};

/// Builds the pivot rows of the parameter `param` of the group `group`, for
/// the years of the model.
///
/// This is a shorthand for creating a [`ResultPivotBuilder`] and calling
/// [`build`][ResultPivotBuilder::build] on it.
pub fn pivot(
    reference: &ReferenceTables,
    definitions: &ParameterDefinitions,
    data: &ResultData,
    group: &str,
    param: &str,
    config: PivotConfig,
) -> Result<Vec<PivotRow>, Error> {
    let builder = ResultPivotBuilder::try_new(reference, definitions, group, param, config)?;
    builder.build(data)
}

/// Converts pivot rows to a JSON array of objects, keyed by the field names
/// of the result grid.
pub fn rows_to_json(rows: &[PivotRow]) -> Result<Value, Error> {
    serde_json::to_value(rows)
        .map_err(|e| Error::internal(format!("Can't serialize pivot rows: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelData;
    use serde_json::json;

    #[test]
    fn test_pivot_documents() -> Result<(), Error> {
        let model: ModelData = serde_json::from_value(json!({
            "osy-currency": "MUSD",
            "osy-years": ["2030"],
            "osy-tech": [{
                "TechId": "TEC_0", "Tech": "COAL_PP", "Desc": "Coal plant",
                "CapUnitId": "GW", "ActUnitId": "PJ", "TG": ["TG_0"]
            }],
            "osy-techGroups": [
                {"TechGroupId": "TG_0", "TechGroup": "Thermal", "Desc": "Thermal plants"}
            ]
        }))
        .map_err(|e| Error::invalid_reference_data(e.to_string()))?;
        let reference = ReferenceTables::try_new(model)?;
        let definitions = ParameterDefinitions::from_json(&json!({
            "RYT": [{"id": "IC", "value": "Investment cost",
                     "unitRule": {"cat": [{"var": "Currency"}, {"var": "divide"}, {"var": "CapUnitId"}]}}]
        }))?;
        let data = ResultData::from_json(&json!({
            "IC": {
                "CS_0": [{"Tech": "COAL_PP", "2030": 1.5}, {"Tech": "TEC_9", "2030": null}]
            }
        }))?;

        let rows = pivot(&reference, &definitions, &data, "RYT", "IC", PivotConfig::default())?;
        assert_eq!(
            rows_to_json(&rows)?,
            json!([
                {
                    "Case": "CS_0",
                    "Year": "2030",
                    "Tech": "COAL_PP",
                    "TechDesc": "Coal plant",
                    "TechGroup": "Thermal",
                    "TechGroupDesc": "Thermal plants",
                    "Unit": "MUSD/GW",
                    "Value": 1.5
                },
                {
                    "Case": "CS_0",
                    "Year": "2030",
                    "Tech": format!("{WARNING_ICON} TEC_9"),
                    "TechDesc": format!("{WARNING_ICON} TEC_9 deleted from model"),
                    "TechGroup": "No group",
                    "TechGroupDesc": "No group",
                    "Unit": format!("{WARNING_ICON} n/a"),
                    "Value": null
                }
            ])
        );

        assert!(
            pivot(&reference, &definitions, &data, "RYT", "NC", PivotConfig::default())
                .is_err_and(|e| e.is_configuration_error())
        );
        Ok(())
    }
}
