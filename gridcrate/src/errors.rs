//! # Error Handling
//!
//! Every failure of the filter pipeline is detected while compiling, never
//! while a predicate runs. A filter map either compiles completely or the
//! caller receives exactly one [`FilterError`] describing what was wrong with
//! the filter input.
//!
//! All variants are input-validation failures attributable to whoever
//! produced the filter model, so host services usually map them to a
//! `400 Bad Request`.
//!
//! ```rust,ignore
//! let compiled = FilterCompiler::new()
//!     .compile::<Person>(&filters)
//!     .map_err(|e| ApiError::bad_request(e.to_string()))?;
//! ```

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

/// Errors raised while compiling filter, sort and pagination models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A path segment has no matching property on the entity.
    #[error("property '{segment}' of path '{path}' not found on {entity}")]
    PropertyNotFound {
        entity: &'static str,
        path: String,
        segment: String,
    },

    /// A path crosses an optional link while null-safe access is disabled.
    #[error("path '{path}' crosses optional link '{link}' and requires null-safe access")]
    UnguardedOptionalPath { path: String, link: String },

    /// The `filterType` tag is not one of text, date, number or set.
    #[error("unknown filter type '{0}'")]
    UnknownFilterType(String),

    /// The operator name is not part of the filter kind's enumeration.
    #[error("operator '{operator}' is not supported by {kind} filters")]
    UnsupportedOperator { kind: &'static str, operator: String },

    /// A bound required by the selected operator is absent.
    #[error("{field} value is required for {operator}")]
    MissingFilterValue {
        field: &'static str,
        operator: &'static str,
    },

    /// A bound is present but cannot be parsed into the property's type.
    #[error("cannot convert '{value}' to {target}")]
    InvalidFilterValue { value: String, target: &'static str },

    /// The filter model is neither a valid plain nor a valid composite filter.
    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    /// A JSON entry point received a document that does not deserialize.
    #[error("invalid {what} JSON: {message}")]
    InvalidJson { what: &'static str, message: String },
}

impl FilterError {
    pub(crate) fn property_not_found<T>(path: &str, segment: &str) -> Self {
        Self::PropertyNotFound {
            entity: std::any::type_name::<T>(),
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn unsupported_operator(kind: &'static str, operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            kind,
            operator: operator.into(),
        }
    }

    pub(crate) fn missing_value(field: &'static str, operator: &'static str) -> Self {
        Self::MissingFilterValue { field, operator }
    }

    pub(crate) fn invalid_value(value: impl Into<String>, target: &'static str) -> Self {
        Self::InvalidFilterValue {
            value: value.into(),
            target,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFilter(message.into())
    }

    pub(crate) fn invalid_json(what: &'static str, err: &serde_json::Error) -> Self {
        Self::InvalidJson {
            what,
            message: err.to_string(),
        }
    }
}

/// Errors raised while registering an entity schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two properties normalise to the same case-insensitive name.
    #[error("property '{property}' registered twice on {entity}")]
    DuplicateProperty {
        entity: &'static str,
        property: String,
    },
}
