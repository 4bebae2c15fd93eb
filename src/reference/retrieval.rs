// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving entities from [`ReferenceTables`].

use crate::reference::{
    Commodity, Constraint, Emission, NameIndexMap, ReferenceTables, Storage, Technology,
    TechnologyGroup,
};

fn lookup<'a, T>(table: &'a [T], indices: &NameIndexMap, key: &str) -> Option<&'a T> {
    indices.get(key).and_then(|idx| table.get(*idx))
}

/// Entity retrieval.
impl ReferenceTables {
    /// Returns the technology with the given display name, if it exists.
    pub fn technology(&self, name: &str) -> Option<&Technology> {
        lookup(&self.technologies, &self.technology_indices, name)
    }

    /// Returns the commodity with the given display name, if it exists.
    pub fn commodity(&self, name: &str) -> Option<&Commodity> {
        lookup(&self.commodities, &self.commodity_indices, name)
    }

    /// Returns the emission with the given display name, if it exists.
    pub fn emission(&self, name: &str) -> Option<&Emission> {
        lookup(&self.emissions, &self.emission_indices, name)
    }

    /// Returns the storage with the given display name, if it exists.
    pub fn storage(&self, name: &str) -> Option<&Storage> {
        lookup(&self.storages, &self.storage_indices, name)
    }

    /// Returns the constraint with the given display name, if it exists.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        lookup(&self.constraints, &self.constraint_indices, name)
    }

    /// Returns the technology group with the given id, if it exists.
    pub fn technology_group(&self, id: &str) -> Option<&TechnologyGroup> {
        lookup(&self.technology_groups, &self.technology_group_indices, id)
    }

    /// Returns an iterator over the technologies.
    pub fn technologies(&self) -> std::slice::Iter<'_, Technology> {
        self.technologies.iter()
    }

    /// Returns an iterator over the commodities.
    pub fn commodities(&self) -> std::slice::Iter<'_, Commodity> {
        self.commodities.iter()
    }

    /// Returns an iterator over the emissions.
    pub fn emissions(&self) -> std::slice::Iter<'_, Emission> {
        self.emissions.iter()
    }

    /// Returns an iterator over the storages.
    pub fn storages(&self) -> std::slice::Iter<'_, Storage> {
        self.storages.iter()
    }

    /// Returns an iterator over the constraints.
    pub fn constraints(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    /// Returns an iterator over the technology groups.
    pub fn technology_groups(&self) -> std::slice::Iter<'_, TechnologyGroup> {
        self.technology_groups.iter()
    }

    /// Returns the currency code of the model.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the years of the model, in order.
    pub fn years(&self) -> &[String] {
        &self.years
    }
}
