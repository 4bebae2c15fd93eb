// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The flat, display ready rows produced by the pivot.

use serde::{Serialize, Serializer};
use std::fmt::Display;

use crate::Dimension;

/// Prefix marking cells that refer to entities deleted from the model.
pub const WARNING_ICON: &str =
    r#"<i class="fa fa-exclamation-triangle danger" aria-hidden="true"></i>"#;

const NO_GROUP: &str = "No group";

/// The label of a dimension cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Resolved(String),
    /// The raw reference of an entity that no longer exists.
    Orphan(String),
    /// Placeholder for technologies without group membership.
    NoGroup,
}

/// The description of a dimension cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Description {
    Resolved(String),
    /// The raw reference of an entity that no longer exists.
    Orphan(String),
    NoGroup,
}

/// The unit of a row.
#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    Resolved(String),
    NotApplicable,
    /// The unit can't be computed because an entity of the row was deleted.
    Orphan,
}

impl Label {
    pub fn is_orphan(&self) -> bool {
        matches!(self, Self::Orphan(_))
    }
}

impl Description {
    pub fn is_orphan(&self) -> bool {
        matches!(self, Self::Orphan(_))
    }
}

impl Unit {
    pub fn is_orphan(&self) -> bool {
        matches!(self, Self::Orphan)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(label) => write!(f, "{label}"),
            Self::Orphan(id) => write!(f, "{WARNING_ICON} {id}"),
            Self::NoGroup => write!(f, "{NO_GROUP}"),
        }
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(desc) => write!(f, "{desc}"),
            Self::Orphan(id) => write!(f, "{WARNING_ICON} {id} deleted from model"),
            Self::NoGroup => write!(f, "{NO_GROUP}"),
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(unit) => write!(f, "{unit}"),
            Self::NotApplicable => write!(f, "n/a"),
            Self::Orphan => write!(f, "{WARNING_ICON} n/a"),
        }
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_display!(Label, Description, Unit);

/// A row of the pivot.
///
/// Serializes with the field names the result grid expects.  Absent fields
/// are left out, except for `Value`, which is `null` when there is no value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PivotRow {
    pub case: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_group: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_group_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emi: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emi_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stg: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stg_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub con: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub con_desc: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal: Option<String>,
    pub value: Option<f64>,
}

impl PivotRow {
    /// Creates a row for a single year of a record.
    pub(crate) fn yearly(case: &str, year: &str, value: Option<f64>) -> Self {
        Self {
            case: case.to_string(),
            year: Some(year.to_string()),
            value,
            ..Self::default()
        }
    }

    /// Creates the row of an objective value record.
    pub(crate) fn objective(case: &str, value: f64) -> Self {
        Self {
            case: case.to_string(),
            unit: Some(Unit::NotApplicable),
            optimal: Some("Objective Value".to_string()),
            value: Some(value),
            ..Self::default()
        }
    }

    /// Sets the label and description cells of the given dimension.  Other
    /// dimensions have no cells and are ignored.
    pub(crate) fn set_cells(
        &mut self,
        dimension: Dimension,
        label: Label,
        description: Description,
    ) {
        let (label_cell, description_cell) = match dimension {
            Dimension::Technology => (&mut self.tech, &mut self.tech_desc),
            Dimension::Commodity => (&mut self.comm, &mut self.comm_desc),
            Dimension::Emission => (&mut self.emi, &mut self.emi_desc),
            Dimension::Storage => (&mut self.stg, &mut self.stg_desc),
            Dimension::Constraint => (&mut self.con, &mut self.con_desc),
            _ => return,
        };
        *label_cell = Some(label);
        *description_cell = Some(description);
    }

    /// Returns true if any cell of the row refers to a deleted entity.
    pub fn has_orphans(&self) -> bool {
        [&self.tech, &self.tech_group, &self.comm, &self.emi, &self.stg, &self.con]
            .into_iter()
            .flatten()
            .any(Label::is_orphan)
            || self.unit.as_ref().is_some_and(Unit::is_orphan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Label::Resolved("COAL".into()).to_string(), "COAL");
        assert_eq!(
            Label::Orphan("TEC_9".into()).to_string(),
            format!("{WARNING_ICON} TEC_9")
        );
        assert_eq!(Label::NoGroup.to_string(), "No group");
        assert_eq!(
            Description::Orphan("TEC_9".into()).to_string(),
            format!("{WARNING_ICON} TEC_9 deleted from model")
        );
        assert_eq!(Unit::NotApplicable.to_string(), "n/a");
        assert_eq!(Unit::Orphan.to_string(), format!("{WARNING_ICON} n/a"));
        assert_eq!(Unit::Resolved("PJ".into()).to_string(), "PJ");
    }

    #[test]
    fn test_serialize() -> Result<(), serde_json::Error> {
        let row = PivotRow::objective("CS_0", 12.5);
        assert_eq!(
            serde_json::to_value(&row)?,
            json!({"Case": "CS_0", "Unit": "n/a", "Optimal": "Objective Value", "Value": 12.5})
        );

        let mut row = PivotRow::yearly("CS_0", "2030", None);
        row.mo_id = Some("1".into());
        row.tech = Some(Label::Orphan("TEC_9".into()));
        row.tech_desc = Some(Description::Orphan("TEC_9".into()));
        row.tech_group = Some(Label::NoGroup);
        row.tech_group_desc = Some(Description::NoGroup);
        row.unit = Some(Unit::Orphan);
        assert_eq!(
            serde_json::to_value(&row)?,
            json!({
                "Case": "CS_0",
                "Year": "2030",
                "MoId": "1",
                "Tech": format!("{WARNING_ICON} TEC_9"),
                "TechDesc": format!("{WARNING_ICON} TEC_9 deleted from model"),
                "TechGroup": "No group",
                "TechGroupDesc": "No group",
                "Unit": format!("{WARNING_ICON} n/a"),
                "Value": null
            })
        );
        assert!(row.has_orphans());
        assert!(!PivotRow::objective("CS_0", 1.0).has_orphans());
        Ok(())
    }
}
