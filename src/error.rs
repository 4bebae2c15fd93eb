// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur in the library.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Debug, Clone, PartialEq)]
        pub(crate) enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub(crate) fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (Internal, internal),
    (InvalidParameterData, invalid_parameter_data),
    (InvalidReferenceData, invalid_reference_data),
    (InvalidResultData, invalid_result_data),
    (InvalidUnitRule, invalid_unit_rule),
    (ParameterNotFound, parameter_not_found),
    (UnitRuleMissing, unit_rule_missing)
);

/// An error that can occur while loading the inputs of a pivot, or while
/// building one with a [ResultPivotBuilder][crate::ResultPivotBuilder].
///
/// Dangling references in result data are never reported as errors; they
/// show up as orphan markers in the emitted rows instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the description of the error.
    pub fn description(&self) -> &str {
        &self.desc
    }

    /// Returns true if the error was caused by a mismatch between the
    /// parameter definitions and the requested parameter.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ParameterNotFound
                | ErrorKind::UnitRuleMissing
                | ErrorKind::InvalidUnitRule
                | ErrorKind::InvalidParameterData
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}
