// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`ReferenceTables`] instances from model data.

use serde::{Deserialize, Deserializer};

use crate::reference::{
    Commodity, Constraint, Emission, NameIndexMap, ReferenceTables, Storage, Technology,
    TechnologyGroup,
};
use crate::Error;

/// The raw tables of a model, as stored in its `genData.json` document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelData {
    #[serde(rename = "osy-tech", default)]
    pub technologies: Vec<Technology>,
    #[serde(rename = "osy-comm", default)]
    pub commodities: Vec<Commodity>,
    #[serde(rename = "osy-emis", default)]
    pub emissions: Vec<Emission>,
    #[serde(rename = "osy-stg", default)]
    pub storages: Vec<Storage>,
    #[serde(rename = "osy-constraints", default)]
    pub constraints: Vec<Constraint>,
    #[serde(rename = "osy-techGroups", default)]
    pub technology_groups: Vec<TechnologyGroup>,
    #[serde(rename = "osy-currency", default)]
    pub currency: String,
    #[serde(rename = "osy-years", default, deserialize_with = "year_labels")]
    pub years: Vec<String>,
}

/// Years are usually stored as strings, but plain numbers are accepted too.
fn year_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearLabel {
        Text(String),
        Number(i64),
    }

    Ok(Vec::<YearLabel>::deserialize(deserializer)?
        .into_iter()
        .map(|year| match year {
            YearLabel::Text(text) => text,
            YearLabel::Number(number) => number.to_string(),
        })
        .collect())
}

/// `ReferenceTables` instantiation.
impl ReferenceTables {
    /// Creates new [`ReferenceTables`] from the given model data.
    ///
    /// Returns an error if a display name occurs more than once within a
    /// table, or if a technology group id is duplicated.
    pub fn try_new(data: ModelData) -> Result<Self, Error> {
        let technology_indices =
            Self::index_names("technology", data.technologies.iter().map(|t| &t.name))?;
        let commodity_indices =
            Self::index_names("commodity", data.commodities.iter().map(|c| &c.name))?;
        let emission_indices =
            Self::index_names("emission", data.emissions.iter().map(|e| &e.name))?;
        let storage_indices = Self::index_names("storage", data.storages.iter().map(|s| &s.name))?;
        let constraint_indices =
            Self::index_names("constraint", data.constraints.iter().map(|c| &c.name))?;
        let technology_group_indices = Self::index_names(
            "technology group id",
            data.technology_groups.iter().map(|g| &g.id),
        )?;

        tracing::debug!(
            "Loaded reference tables: {} technologies, {} commodities, {} emissions, \
             {} storages, {} constraints, {} technology groups, {} years.",
            data.technologies.len(),
            data.commodities.len(),
            data.emissions.len(),
            data.storages.len(),
            data.constraints.len(),
            data.technology_groups.len(),
            data.years.len(),
        );

        Ok(Self {
            technologies: data.technologies,
            commodities: data.commodities,
            emissions: data.emissions,
            storages: data.storages,
            constraints: data.constraints,
            technology_groups: data.technology_groups,
            currency: data.currency,
            years: data.years,
            technology_indices,
            commodity_indices,
            emission_indices,
            storage_indices,
            constraint_indices,
            technology_group_indices,
        })
    }

    /// Creates new [`ReferenceTables`] from a `genData.json` document.
    ///
    /// Tables that are missing from the document are treated as empty.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        let data = ModelData::deserialize(value).map_err(|e| {
            Error::invalid_reference_data(format!("Can't read model data: {e}"))
        })?;
        Self::try_new(data)
    }

    fn index_names<'a>(
        table: &str,
        names: impl Iterator<Item = &'a String>,
    ) -> Result<NameIndexMap, Error> {
        let mut indices = NameIndexMap::new();
        for (idx, name) in names.enumerate() {
            if indices.insert(name.clone(), idx).is_some() {
                return Err(Error::invalid_reference_data(format!(
                    "Duplicate {table} found: {name}"
                )));
            }
        }
        Ok(indices)
    }
}
