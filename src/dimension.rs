// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Dimension` enum, which represents the sets a
//! result parameter can be indexed over, and `GroupDimensions`, which
//! decodes parameter group codes like `RYTCM` into those sets.

use std::fmt::Display;

/// A set that a result parameter can be indexed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Year,
    Technology,
    Commodity,
    Emission,
    Storage,
    Constraint,
    ModeOfOperation,
    TimeSlice,
    Season,
    DayType,
    DailyTimeBracket,
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Year => write!(f, "Year"),
            Dimension::Technology => write!(f, "Technology"),
            Dimension::Commodity => write!(f, "Commodity"),
            Dimension::Emission => write!(f, "Emission"),
            Dimension::Storage => write!(f, "Storage"),
            Dimension::Constraint => write!(f, "Constraint"),
            Dimension::ModeOfOperation => write!(f, "ModeOfOperation"),
            Dimension::TimeSlice => write!(f, "TimeSlice"),
            Dimension::Season => write!(f, "Season"),
            Dimension::DayType => write!(f, "DayType"),
            Dimension::DailyTimeBracket => write!(f, "DailyTimeBracket"),
        }
    }
}

/// The dimensions qualified by a parameter group.
///
/// Group codes start with `R` and are followed by one token per set, longest
/// match first: `Dtb`, `Dt`, `Ts`, `Cn`, `Se`, then the single letters `Y`,
/// `T`, `C`, `E`, `S` and `M`.  For example `RYTCMTs` is indexed over years,
/// technologies, commodities, modes of operation and time slices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupDimensions {
    dimensions: Vec<Dimension>,
}

impl GroupDimensions {
    /// Decodes a group code.
    ///
    /// Unknown characters are skipped, so that unrecognised group codes
    /// qualify no dimension rather than failing.
    pub fn parse(group: &str) -> Self {
        const TOKENS: [(&str, Dimension); 11] = [
            ("Dtb", Dimension::DailyTimeBracket),
            ("Dt", Dimension::DayType),
            ("Ts", Dimension::TimeSlice),
            ("Cn", Dimension::Constraint),
            ("Se", Dimension::Season),
            ("Y", Dimension::Year),
            ("T", Dimension::Technology),
            ("C", Dimension::Commodity),
            ("E", Dimension::Emission),
            ("S", Dimension::Storage),
            ("M", Dimension::ModeOfOperation),
        ];

        let mut dimensions = vec![];
        let mut rest = group.strip_prefix('R').unwrap_or(group);
        while !rest.is_empty() {
            match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
                Some((token, dimension)) => {
                    if !dimensions.contains(dimension) {
                        dimensions.push(*dimension);
                    }
                    rest = &rest[token.len()..];
                }
                None => {
                    let skip = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                    rest = &rest[skip..];
                }
            }
        }

        Self { dimensions }
    }

    /// Returns true if the group is indexed over the given dimension.
    pub fn contains(&self, dimension: Dimension) -> bool {
        self.dimensions.contains(&dimension)
    }

    /// Returns the dimensions of the group, in the order of the group code.
    pub fn iter(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.dimensions.iter().copied()
    }

    /// Returns the dimensions for which entity unit contexts are built.
    pub(crate) fn unit_dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.iter().filter(|d| d.has_unit())
    }
}

impl Dimension {
    /// Returns true if entities of this dimension carry unit codes.
    pub(crate) fn has_unit(&self) -> bool {
        matches!(
            self,
            Dimension::Technology | Dimension::Commodity | Dimension::Emission | Dimension::Storage
        )
    }
}
