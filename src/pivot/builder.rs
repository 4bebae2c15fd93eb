// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the `ResultPivotBuilder`, which flattens the stored
//! results of a parameter into pivot rows.

use crate::pivot::{Description, Label, PivotRow, Unit};
use crate::reference::Technology;
use crate::unit_context::UnitContextTable;
use crate::{
    Dimension, EntityContexts, Error, ParameterDefinitions, PivotConfig, ReferenceTables,
    ResultData, ResultRecord, UnitContext, UnitRule,
};

/// Builds the pivot rows of a single result parameter.
///
/// The builder borrows snapshots of the reference tables and the parameter
/// definitions, and precomputes the unit contexts of the parameter when it
/// is created.  Building never modifies any of its inputs, so the same
/// builder can be used on any number of result documents.
pub struct ResultPivotBuilder<'a> {
    reference: &'a ReferenceTables,
    param: String,
    unit_rule: Option<&'a UnitRule>,
    contexts: EntityContexts,
    config: PivotConfig,
}

impl<'a> ResultPivotBuilder<'a> {
    /// Creates a builder for the parameter `param` of the group `group`.
    ///
    /// Returns an error if the parameter is not defined in the group, or if
    /// it has no unit rule and `config.allow_missing_unit_rules` is not set.
    pub fn try_new(
        reference: &'a ReferenceTables,
        definitions: &'a ParameterDefinitions,
        group: &str,
        param: &str,
        config: PivotConfig,
    ) -> Result<Self, Error> {
        let definition = definitions.definition(group, param)?;

        if definition.unit_rule.is_none() {
            if !config.allow_missing_unit_rules {
                return Err(Error::unit_rule_missing(format!(
                    "Parameter {param} in group {group} has no unit rule."
                )));
            }
            tracing::warn!(
                "Parameter {param} in group {group} has no unit rule, units will be `n/a`."
            );
        }

        Ok(Self {
            reference,
            param: param.to_string(),
            unit_rule: definition.unit_rule.as_ref(),
            contexts: UnitContextTable::for_parameter(reference, group),
            config,
        })
    }

    /// Builds the pivot rows for the years of the model.
    pub fn build(&self, data: &ResultData) -> Result<Vec<PivotRow>, Error> {
        self.build_with_years(data, self.reference.years())
    }

    /// Builds the pivot rows for the given years.
    ///
    /// Cases and records are visited in the order in which they are stored.
    /// Objective value records produce a single row without a year; every
    /// other record produces one row per year, or one row per year and
    /// technology group when it refers to a technology.
    pub fn build_with_years<S: AsRef<str>>(
        &self,
        data: &ResultData,
        years: &[S],
    ) -> Result<Vec<PivotRow>, Error> {
        let Some(cases) = data.cases(&self.param) else {
            tracing::debug!("No results found for parameter {}.", self.param);
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for case in cases {
            for record in &case.records {
                self.push_record_rows(&case.case, record, years, &mut rows);
            }
        }
        Ok(rows)
    }

    fn push_record_rows<S: AsRef<str>>(
        &self,
        case: &str,
        record: &ResultRecord,
        years: &[S],
        rows: &mut Vec<PivotRow>,
    ) {
        if let Some(value) = record.objective_value {
            rows.push(PivotRow::objective(case, value));
            return;
        }

        let orphans = self.orphans(record);
        for (dimension, name) in &orphans {
            tracing::warn!(
                "{dimension} {name} in results of {} for case {case} was deleted from the model.",
                self.param
            );
        }
        if self.config.skip_orphaned_records && !orphans.is_empty() {
            return;
        }

        for year in years {
            let year = year.as_ref();
            let mut row = PivotRow::yearly(case, year, record.value(year));
            row.mo_id = record.mode.clone();
            row.ts = record.time_slice.clone();
            self.push_dimension_rows(record, row, rows);
        }
    }

    /// Attaches the dimensions of the record to `row`, in order of
    /// precedence, and pushes the resulting rows.  Dimensions attached later
    /// overwrite the unit set by earlier ones.
    fn push_dimension_rows(
        &self,
        record: &ResultRecord,
        mut row: PivotRow,
        rows: &mut Vec<PivotRow>,
    ) {
        if let (Some(comm), None) = (&record.comm, &record.tech) {
            self.attach(&mut row, Dimension::Commodity, comm);
        }
        for (dimension, name) in [
            (Dimension::Constraint, &record.con),
            (Dimension::Storage, &record.stg),
            (Dimension::Emission, &record.emi),
        ] {
            if let Some(name) = name {
                self.attach(&mut row, dimension, name);
            }
        }

        match &record.tech {
            Some(tech) => self.push_technology_rows(row, tech, record.comm.as_deref(), rows),
            None => rows.push(row),
        }
    }

    fn attach(&self, row: &mut PivotRow, dimension: Dimension, name: &str) {
        let Some(description) = self.description(dimension, name) else {
            row.set_cells(
                dimension,
                Label::Orphan(name.to_string()),
                Description::Orphan(name.to_string()),
            );
            row.unit = Some(Unit::Orphan);
            return;
        };

        row.set_cells(
            dimension,
            Label::Resolved(name.to_string()),
            Description::Resolved(description.to_string()),
        );
        row.unit = Some(match dimension {
            Dimension::Constraint => Unit::NotApplicable,
            _ => self.unit(self.contexts.get(dimension, name)),
        });
    }

    /// Pushes the rows of a record that refers to a technology, and
    /// optionally to a commodity, which then shares in the unit.
    fn push_technology_rows(
        &self,
        mut row: PivotRow,
        tech: &str,
        comm: Option<&str>,
        rows: &mut Vec<PivotRow>,
    ) {
        let technology = self.reference.technology(tech);
        let commodity = comm.map(|name| (name, self.reference.commodity(name)));

        match (technology, commodity) {
            (Some(technology), None) => {
                let unit = self.unit(self.contexts.get(Dimension::Technology, tech));
                self.push_grouped_rows(row, technology, unit, rows);
            }
            (Some(technology), Some((name, Some(commodity)))) => {
                let context = self
                    .contexts
                    .get(Dimension::Technology, tech)
                    .merge(self.contexts.get(Dimension::Commodity, name));
                let unit = self.unit(&context);
                row.set_cells(
                    Dimension::Commodity,
                    Label::Resolved(name.to_string()),
                    Description::Resolved(commodity.description.clone()),
                );
                self.push_grouped_rows(row, technology, unit, rows);
            }
            // Either side is gone, so the unit can't be computed and both
            // are flagged.
            (_, commodity) => {
                row.set_cells(
                    Dimension::Technology,
                    Label::Orphan(tech.to_string()),
                    Description::Orphan(tech.to_string()),
                );
                if let Some((name, _)) = commodity {
                    row.set_cells(
                        Dimension::Commodity,
                        Label::Orphan(name.to_string()),
                        Description::Orphan(name.to_string()),
                    );
                }
                row.tech_group = Some(Label::NoGroup);
                row.tech_group_desc = Some(Description::NoGroup);
                row.unit = Some(Unit::Orphan);
                rows.push(row);
            }
        }
    }

    /// Pushes one row per technology group of the technology, or a single
    /// row if it isn't a member of any group.
    fn push_grouped_rows(
        &self,
        mut row: PivotRow,
        technology: &Technology,
        unit: Unit,
        rows: &mut Vec<PivotRow>,
    ) {
        row.set_cells(
            Dimension::Technology,
            Label::Resolved(technology.name.clone()),
            Description::Resolved(technology.description.clone()),
        );
        row.unit = Some(unit);

        if technology.groups.is_empty() {
            row.tech_group = Some(Label::NoGroup);
            row.tech_group_desc = Some(Description::NoGroup);
            rows.push(row);
            return;
        }

        rows.extend(technology.groups.iter().map(|id| {
            let mut grouped = row.clone();
            match self.reference.technology_group(id) {
                Some(group) => {
                    grouped.tech_group = Some(Label::Resolved(group.name.clone()));
                    grouped.tech_group_desc = Some(Description::Resolved(group.description.clone()));
                }
                None => {
                    grouped.tech_group = Some(Label::Orphan(id.clone()));
                    grouped.tech_group_desc = Some(Description::Orphan(id.clone()));
                }
            }
            grouped
        }));
    }

    /// Returns the description of the entity, or `None` if it was deleted
    /// from the model.
    fn description(&self, dimension: Dimension, name: &str) -> Option<&'a str> {
        let reference = self.reference;
        match dimension {
            Dimension::Technology => reference.technology(name).map(|t| t.description.as_str()),
            Dimension::Commodity => reference.commodity(name).map(|c| c.description.as_str()),
            Dimension::Emission => reference.emission(name).map(|e| e.description.as_str()),
            Dimension::Storage => reference.storage(name).map(|s| s.description.as_str()),
            Dimension::Constraint => reference.constraint(name).map(|c| c.description.as_str()),
            _ => None,
        }
    }

    /// Returns the references of the record that don't resolve.
    fn orphans<'r>(&self, record: &'r ResultRecord) -> Vec<(Dimension, &'r str)> {
        [
            (Dimension::Technology, &record.tech),
            (Dimension::Commodity, &record.comm),
            (Dimension::Emission, &record.emi),
            (Dimension::Storage, &record.stg),
            (Dimension::Constraint, &record.con),
        ]
        .into_iter()
        .filter_map(|(dimension, name)| name.as_deref().map(|name| (dimension, name)))
        .filter(|(dimension, name)| self.description(*dimension, name).is_none())
        .collect()
    }

    fn unit(&self, context: &UnitContext) -> Unit {
        match self.unit_rule {
            Some(rule) => Unit::Resolved(rule.render(context)),
            None => Unit::NotApplicable,
        }
    }
}
