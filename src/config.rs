// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the
//! `ResultPivotBuilder`.

/// Configuration options for the `ResultPivotBuilder`.
#[derive(Clone, Default, Debug)]
pub struct PivotConfig {
    /// Whether to allow parameters that have no unit rule.  When this is
    /// `true`, the units of such parameters will be reported as `n/a`,
    /// otherwise building a pivot for them fails.
    pub allow_missing_unit_rules: bool,

    /// Whether to leave out records that reference entities which no longer
    /// exist in the model, instead of emitting them with warning markers.
    ///
    /// Note that enabling this breaks the guarantee that every record
    /// produces one row per year.
    pub skip_orphaned_records: bool,
}
