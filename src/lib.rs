// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# OSeMOSYS Result Pivot

This is a library for turning the stored results of an OSeMOSYS energy
system model into flat, display ready rows, one per case, year and set
member, with resolved descriptions and units.

Result records refer to technologies, commodities, emissions, storages and
constraints by display name, as they were when a case was run.  The pivot
resolves those names against the current [`ReferenceTables`] of the model,
and computes a unit for each row from the [`UnitRule`] of the parameter.

## Inputs

- [`ReferenceTables`], created from the model's data with
  [`try_new`][ReferenceTables::try_new] or
  [`from_json`][ReferenceTables::from_json].
- [`ParameterDefinitions`], holding the result parameters by group along with
  their unit rules.
- [`ResultData`], holding the result records by parameter and case.

## Building a pivot

A [`ResultPivotBuilder`] is created for a single parameter with
[`try_new`][ResultPivotBuilder::try_new], which fails if the parameter
isn't defined or has no unit rule.  Calling
[`build`][ResultPivotBuilder::build] then produces the [`PivotRow`]s:

- Objective value records produce a single row without a year.
- Every other record produces one row per year, and a record that refers to
  a technology produces one row per year and technology group.
- References to entities that were deleted from the model never cause an
  error.  They are emitted with warning markers instead, see [`Label`],
  [`Description`] and [`Unit`].

The [`pivot`] function is a shorthand for both steps, and [`rows_to_json`]
converts the rows to the JSON objects expected by the result grid.

## Unit rules

Unit rules are JsonLogic style expressions, parsed into [`UnitRule`] trees
and evaluated against a [`UnitContext`].  Contexts hold the unit codes of an
entity, the currency of the model and a fixed set of markers like `divide`
or `thousand`.

## Convenience APIs

A [`ResultPivotBuilder`] only computes the unit contexts of its own
parameter.  Callers that show units for many parameters at once, for example
in a parameter picker, can precompute all of them with
[`UnitContextTable::build`] and look them up with
[`context`][UnitContextTable::context].  Similarly,
[`ResultData::is_empty_for`] tells whether a parameter has any records in its
first case, which is how a run without activity for a parameter shows up.
*/

mod config;
pub use config::PivotConfig;

mod dimension;
pub use dimension::{Dimension, GroupDimensions};

mod error;
pub use error::Error;

mod parameters;
pub use parameters::{ParameterDefinition, ParameterDefinitions};

mod pivot;
pub use pivot::{
    pivot, rows_to_json, Description, Label, PivotRow, ResultPivotBuilder, Unit, WARNING_ICON,
};

mod reference;
pub use reference::{
    Commodity, Constraint, Emission, ModelData, ReferenceTables, Storage, Technology,
    TechnologyGroup,
};

mod results;
pub use results::{CaseResults, ResultData, ResultRecord};

mod unit_context;
pub use unit_context::{EntityContexts, UnitContext, UnitContextTable};

mod unit_rule;
pub use unit_rule::{ArithmeticOp, CompareOp, RuleValue, UnitRule};

#[cfg(test)]
mod test_utils;
