// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The reference tables of a model: the technologies, commodities,
//! emissions, storages, constraints and technology groups that result
//! records refer to by display name.

mod creation;
mod retrieval;

pub use creation::ModelData;

use serde::Deserialize;
use std::collections::HashMap;

/// Maps the display name (or the id, for technology groups) of an entity to
/// its position in the owning table.
pub(crate) type NameIndexMap = HashMap<String, usize>;

/// A technology of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Technology {
    #[serde(rename = "TechId")]
    pub id: String,
    #[serde(rename = "Tech")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
    #[serde(rename = "CapUnitId", default)]
    pub cap_unit: String,
    #[serde(rename = "ActUnitId", default)]
    pub act_unit: String,
    /// Ids of the technology groups this technology is a member of.
    #[serde(rename = "TG", default)]
    pub groups: Vec<String>,
}

/// A commodity of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Commodity {
    #[serde(rename = "CommId")]
    pub id: String,
    #[serde(rename = "Comm")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
    #[serde(rename = "UnitId", default)]
    pub unit: String,
}

/// An emission of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Emission {
    #[serde(rename = "EmisId")]
    pub id: String,
    #[serde(rename = "Emis")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
    #[serde(rename = "UnitId", default)]
    pub unit: String,
}

/// A storage of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Storage {
    #[serde(rename = "StgId")]
    pub id: String,
    #[serde(rename = "Stg")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
    #[serde(rename = "UnitId", default)]
    pub unit: String,
}

/// A user defined constraint of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Constraint {
    #[serde(rename = "ConId")]
    pub id: String,
    #[serde(rename = "Con")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
}

/// A technology group of the model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TechnologyGroup {
    #[serde(rename = "TechGroupId")]
    pub id: String,
    #[serde(rename = "TechGroup")]
    pub name: String,
    #[serde(rename = "Desc", default)]
    pub description: String,
}

/// An immutable snapshot of the reference tables of a model.
///
/// Entities are looked up by display name, except for technology groups,
/// which technologies refer to by id.
#[derive(Clone, Debug, Default)]
pub struct ReferenceTables {
    technologies: Vec<Technology>,
    commodities: Vec<Commodity>,
    emissions: Vec<Emission>,
    storages: Vec<Storage>,
    constraints: Vec<Constraint>,
    technology_groups: Vec<TechnologyGroup>,
    currency: String,
    years: Vec<String>,

    technology_indices: NameIndexMap,
    commodity_indices: NameIndexMap,
    emission_indices: NameIndexMap,
    storage_indices: NameIndexMap,
    constraint_indices: NameIndexMap,
    technology_group_indices: NameIndexMap,
}
