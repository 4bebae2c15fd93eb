// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The contexts that unit rules are evaluated against.

use std::collections::{BTreeMap, HashMap};

use crate::{Dimension, GroupDimensions, ParameterDefinitions, ReferenceTables};

/// Markers that are available to every unit rule.
///
/// The key spellings are the ones used by the stored unit rules.
const MARKERS: [(&str, &str); 7] = [
    ("years", "years"),
    ("percent", "%"),
    ("divide", "/"),
    ("multiply", "*"),
    ("hundert", "100"),
    ("thousand", "10<sup>3</sup>"),
    ("milion", "10<sup>6</sup>"),
];

/// A flat mapping from variable names to unit fragments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitContext {
    values: BTreeMap<String, String>,
}

impl UnitContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context holding the shared markers and the model currency.
    pub fn with_markers(currency: &str) -> Self {
        let mut context = Self::new();
        for (key, value) in MARKERS {
            context.insert(key, value);
        }
        context.insert("Currency", currency);
        context
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns a new context with the values of `other` added to those of
    /// `self`.  Values from `other` win on conflicting keys.
    pub fn merge(&self, other: &UnitContext) -> UnitContext {
        let mut merged = self.clone();
        merged
            .values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Unit contexts of the entities of a single parameter.
#[derive(Clone, Debug, Default)]
pub struct EntityContexts {
    base: UnitContext,
    entities: HashMap<Dimension, HashMap<String, UnitContext>>,
}

impl EntityContexts {
    fn build(reference: &ReferenceTables, dimensions: &GroupDimensions) -> Self {
        let base = UnitContext::with_markers(reference.currency());
        let mut entities: HashMap<Dimension, HashMap<String, UnitContext>> = HashMap::new();

        for dimension in dimensions.unit_dimensions() {
            let units: Vec<(&String, Vec<(&str, &str)>)> = match dimension {
                Dimension::Technology => reference
                    .technologies()
                    .map(|t| {
                        let units = vec![
                            ("CapUnitId", t.cap_unit.as_str()),
                            ("ActUnitId", t.act_unit.as_str()),
                        ];
                        (&t.name, units)
                    })
                    .collect(),
                Dimension::Commodity => reference
                    .commodities()
                    .map(|c| (&c.name, vec![("CommUnit", c.unit.as_str())]))
                    .collect(),
                Dimension::Emission => reference
                    .emissions()
                    .map(|e| (&e.name, vec![("EmiUnit", e.unit.as_str())]))
                    .collect(),
                Dimension::Storage => reference
                    .storages()
                    .map(|s| (&s.name, vec![("StgUnit", s.unit.as_str())]))
                    .collect(),
                _ => vec![],
            };

            for (name, units) in units {
                let mut context = base.clone();
                for (key, value) in units {
                    context.insert(key, value);
                }
                entities
                    .entry(dimension)
                    .or_default()
                    .insert(name.clone(), context);
            }
        }

        Self { base, entities }
    }

    /// Returns the context of the entity with the given display name.
    ///
    /// Entities of dimensions the parameter isn't indexed over get the shared
    /// markers only.
    pub fn get(&self, dimension: Dimension, name: &str) -> &UnitContext {
        self.entities
            .get(&dimension)
            .and_then(|contexts| contexts.get(name))
            .unwrap_or(&self.base)
    }

    /// Returns the context holding only the shared markers.
    pub fn base(&self) -> &UnitContext {
        &self.base
    }

    /// Returns the number of entity contexts.
    pub fn len(&self) -> usize {
        self.entities.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unit contexts for every entity of every parameter, keyed by group and
/// parameter id.
#[derive(Clone, Debug, Default)]
pub struct UnitContextTable {
    contexts: HashMap<(String, String), EntityContexts>,
}

impl UnitContextTable {
    /// Precomputes the unit contexts of all parameters.
    pub fn build(reference: &ReferenceTables, definitions: &ParameterDefinitions) -> Self {
        let mut contexts = HashMap::new();
        for (group, parameters) in definitions.groups() {
            let dimensions = GroupDimensions::parse(group);
            let entity_contexts = EntityContexts::build(reference, &dimensions);
            for parameter in parameters {
                contexts.insert(
                    (group.to_string(), parameter.id.clone()),
                    entity_contexts.clone(),
                );
            }
        }

        tracing::debug!("Built unit contexts for {} parameters.", contexts.len());

        Self { contexts }
    }

    /// Computes the unit contexts of a single parameter.
    pub(crate) fn for_parameter(reference: &ReferenceTables, group: &str) -> EntityContexts {
        EntityContexts::build(reference, &GroupDimensions::parse(group))
    }

    /// Returns the contexts of the given parameter, if it is known.
    pub fn contexts(&self, group: &str, param: &str) -> Option<&EntityContexts> {
        self.contexts.get(&(group.to_string(), param.to_string()))
    }

    /// Returns the context of a single entity of the given parameter.
    pub fn context(
        &self,
        group: &str,
        param: &str,
        dimension: Dimension,
        name: &str,
    ) -> Option<&UnitContext> {
        self.contexts(group, param).map(|c| c.get(dimension, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PivotFixtureBuilder;
    use crate::Error;

    #[test]
    fn test_merge() {
        let mut tech = UnitContext::with_markers("EUR");
        tech.insert("CapUnitId", "GW");
        let mut comm = UnitContext::with_markers("EUR");
        comm.insert("CommUnit", "PJ");
        comm.insert("Currency", "USD");

        let merged = tech.merge(&comm);
        assert_eq!(merged.get("CapUnitId"), Some("GW"));
        assert_eq!(merged.get("CommUnit"), Some("PJ"));
        assert_eq!(merged.get("Currency"), Some("USD"));
        assert_eq!(merged.get("divide"), Some("/"));
        assert_eq!(merged.len(), MARKERS.len() + 3);
        assert!(UnitContext::new().is_empty());
    }

    #[test]
    fn test_table() -> Result<(), Error> {
        let mut builder = PivotFixtureBuilder::new();
        builder
            .currency("MUSD")
            .technology("COAL", "GW", "PJ", &[])
            .commodity("COAL", "Mt")
            .emission("CO2", "kt")
            .parameter("RYTC", "IAR", &["ActUnitId", "divide", "CommUnit"])
            .parameter("RYE", "AE", &["EmiUnit"]);
        let (reference, definitions) = builder.tables()?;

        let table = UnitContextTable::build(&reference, &definitions);

        // Same display name in two tables doesn't collide.
        let tech = table
            .context("RYTC", "IAR", Dimension::Technology, "COAL")
            .ok_or(Error::internal("missing"))?;
        assert_eq!(tech.get("CapUnitId"), Some("GW"));
        assert_eq!(tech.get("CommUnit"), None);
        assert_eq!(tech.get("Currency"), Some("MUSD"));
        let comm = table
            .context("RYTC", "IAR", Dimension::Commodity, "COAL")
            .ok_or(Error::internal("missing"))?;
        assert_eq!(comm.get("CommUnit"), Some("Mt"));
        assert_eq!(comm.get("CapUnitId"), None);

        let contexts = table.contexts("RYTC", "IAR").ok_or(Error::internal("missing"))?;
        assert_eq!(contexts.len(), 2);

        // RYE is not indexed over technologies.
        let emi = table
            .context("RYE", "AE", Dimension::Technology, "COAL")
            .ok_or(Error::internal("missing"))?;
        assert_eq!(emi, contexts.base());
        assert_eq!(
            table
                .context("RYE", "AE", Dimension::Emission, "CO2")
                .and_then(|c| c.get("EmiUnit")),
            Some("kt")
        );

        assert!(table.contexts("RYE", "IAR").is_none());
        Ok(())
    }
}
