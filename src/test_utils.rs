// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains the
//! `PivotFixtureBuilder`, which can declaratively build the reference tables,
//! parameter definitions and result data needed by tests.
//!
//! Descriptions of entities are derived from their names, e.g. the
//! technology `COAL` is described as `COAL description`.

use crate::reference::{Commodity, Constraint, Emission, Storage, Technology, TechnologyGroup};
use crate::{
    Error, ModelData, ParameterDefinition, ParameterDefinitions, PivotConfig, PivotRow,
    ReferenceTables, ResultData, ResultPivotBuilder, ResultRecord, UnitRule,
};

/// A builder for creating pivot inputs easily, for use in tests.
pub(crate) struct PivotFixtureBuilder {
    data: ModelData,
    definitions: ParameterDefinitions,
    results: ResultData,
}

fn description(name: &str) -> String {
    format!("{name} description")
}

impl PivotFixtureBuilder {
    /// Creates a new `PivotFixtureBuilder` with empty tables.
    pub(crate) fn new() -> Self {
        PivotFixtureBuilder {
            data: ModelData::default(),
            definitions: ParameterDefinitions::new(),
            results: ResultData::new(),
        }
    }

    /// Sets the currency of the model.
    pub(crate) fn currency(&mut self, currency: &str) -> &mut Self {
        self.data.currency = currency.to_string();
        self
    }

    /// Sets the years of the model.
    pub(crate) fn years(&mut self, years: &[&str]) -> &mut Self {
        self.data.years = years.iter().map(|y| y.to_string()).collect();
        self
    }

    /// Adds a technology that is a member of the given technology groups.
    pub(crate) fn technology(
        &mut self,
        name: &str,
        cap_unit: &str,
        act_unit: &str,
        groups: &[&str],
    ) -> &mut Self {
        let id = format!("TEC_{}", self.data.technologies.len());
        self.data.technologies.push(Technology {
            id,
            name: name.to_string(),
            description: description(name),
            cap_unit: cap_unit.to_string(),
            act_unit: act_unit.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        });
        self
    }

    /// Adds a technology group.
    pub(crate) fn technology_group(&mut self, id: &str, name: &str) -> &mut Self {
        self.data.technology_groups.push(TechnologyGroup {
            id: id.to_string(),
            name: name.to_string(),
            description: description(name),
        });
        self
    }

    /// Adds a commodity.
    pub(crate) fn commodity(&mut self, name: &str, unit: &str) -> &mut Self {
        let id = format!("COM_{}", self.data.commodities.len());
        self.data.commodities.push(Commodity {
            id,
            name: name.to_string(),
            description: description(name),
            unit: unit.to_string(),
        });
        self
    }

    /// Adds an emission.
    pub(crate) fn emission(&mut self, name: &str, unit: &str) -> &mut Self {
        let id = format!("EMI_{}", self.data.emissions.len());
        self.data.emissions.push(Emission {
            id,
            name: name.to_string(),
            description: description(name),
            unit: unit.to_string(),
        });
        self
    }

    /// Adds a storage.
    pub(crate) fn storage(&mut self, name: &str, unit: &str) -> &mut Self {
        let id = format!("STG_{}", self.data.storages.len());
        self.data.storages.push(Storage {
            id,
            name: name.to_string(),
            description: description(name),
            unit: unit.to_string(),
        });
        self
    }

    /// Adds a constraint.
    pub(crate) fn constraint(&mut self, name: &str) -> &mut Self {
        let id = format!("CON_{}", self.data.constraints.len());
        self.data.constraints.push(Constraint {
            id,
            name: name.to_string(),
            description: description(name),
        });
        self
    }

    /// Adds a parameter whose unit rule concatenates the given variables.
    pub(crate) fn parameter(&mut self, group: &str, id: &str, vars: &[&str]) -> &mut Self {
        self.definitions.insert(
            group,
            ParameterDefinition::new(id, id, Some(UnitRule::cat_vars(vars.iter().copied()))),
        );
        self
    }

    /// Adds a parameter without a unit rule.
    pub(crate) fn parameter_without_unit_rule(&mut self, group: &str, id: &str) -> &mut Self {
        self.definitions
            .insert(group, ParameterDefinition::new(id, id, None));
        self
    }

    /// Adds result records for a parameter and case.
    pub(crate) fn records(
        &mut self,
        param: &str,
        case: &str,
        records: Vec<ResultRecord>,
    ) -> &mut Self {
        self.results.insert(param, case, records);
        self
    }

    /// Builds the reference tables and returns them along with the
    /// parameter definitions.
    pub(crate) fn tables(&self) -> Result<(ReferenceTables, ParameterDefinitions), Error> {
        Ok((
            ReferenceTables::try_new(self.data.clone())?,
            self.definitions.clone(),
        ))
    }

    /// Returns the result data added so far.
    pub(crate) fn results(&self) -> &ResultData {
        &self.results
    }

    /// Builds the pivot rows of a parameter, for the years of the model.
    pub(crate) fn pivot(
        &self,
        group: &str,
        param: &str,
        config: PivotConfig,
    ) -> Result<Vec<PivotRow>, Error> {
        let (reference, definitions) = self.tables()?;
        let builder = ResultPivotBuilder::try_new(&reference, &definitions, group, param, config)?;
        builder.build(&self.results)
    }

    /// Builds the pivot rows of a parameter, for the given years.
    pub(crate) fn pivot_with_years(
        &self,
        group: &str,
        param: &str,
        years: &[&str],
        config: PivotConfig,
    ) -> Result<Vec<PivotRow>, Error> {
        let (reference, definitions) = self.tables()?;
        let builder = ResultPivotBuilder::try_new(&reference, &definitions, group, param, config)?;
        builder.build_with_years(&self.results, years)
    }
}
