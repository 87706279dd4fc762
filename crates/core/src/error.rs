//! Error type shared by every siting module.
//!
//! Only input validation and unrecoverable states surface here. Numeric
//! degeneracies (zero variance, too few samples, empty turbine sets) are
//! absorbed by the documented fallbacks in each module and never reach the
//! caller as errors.

use thiserror::Error;

/// Errors raised by the siting core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SitingError {
    /// A required column was absent from an ingested row
    #[error("row {row}: required field '{field}' is missing")]
    MissingField {
        /// Column name (e.g. `wind_speed`)
        field: &'static str,
        /// Zero-based row index in the ingested batch
        row: usize,
    },

    /// A field carried a value outside its physical domain
    #[error("invalid {field} = {value}: {reason}")]
    InvalidValue {
        /// Field or parameter name
        field: &'static str,
        /// Offending value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// A regression was requested on empty series
    #[error("reference and target series are empty")]
    EmptySeries,

    /// Reference and target series differ in length
    #[error("series length mismatch: reference has {reference} samples, target has {target}")]
    LengthMismatch {
        /// Reference sample count
        reference: usize,
        /// Target sample count
        target: usize,
    },

    /// Too few direction sectors carried enough samples to summarise uncertainty
    #[error("only {found} direction sector(s) produced a result, at least {required} required")]
    InsufficientSectors {
        /// Sectors with a result
        found: usize,
        /// Minimum needed for the uncertainty summary
        required: usize,
    },

    /// Area bounds are not finite or not ordered
    #[error("invalid area bounds: x [{min_x}, {max_x}], y [{min_y}, {max_y}]")]
    InvalidBounds {
        /// Minimum x (m)
        min_x: f64,
        /// Maximum x (m)
        max_x: f64,
        /// Minimum y (m)
        min_y: f64,
        /// Maximum y (m)
        max_y: f64,
    },

    /// An algorithm selector string did not name a known variant
    #[error("unknown {kind} '{name}'")]
    UnknownSelector {
        /// Selector family (e.g. `MCP method`)
        kind: &'static str,
        /// The unrecognised name
        name: String,
    },
}

/// Result alias for siting operations
pub type Result<T> = std::result::Result<T, SitingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_column_and_row() {
        let err = SitingError::MissingField {
            field: "wind_direction",
            row: 7,
        };
        assert_eq!(
            err.to_string(),
            "row 7: required field 'wind_direction' is missing"
        );
    }

    #[test]
    fn test_insufficient_sectors_message() {
        let err = SitingError::InsufficientSectors {
            found: 1,
            required: 2,
        };
        assert!(err.to_string().contains("only 1 direction sector"));
    }
}
