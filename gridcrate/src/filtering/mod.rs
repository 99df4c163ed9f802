//! # Grid Filtering, Sorting & Pagination
//!
//! This module compiles grid filter models into reusable predicates over any
//! registered entity type, and the matching SQL conditions for deferred
//! queries.
//!
//! ## Key Features
//!
//! - **Four filter kinds**: `text`, `date`, `number` and `set`, each with its
//!   own operator set
//! - **Composite filters**: conditions of one kind combined with `and`/`or`
//! - **Dotted paths**: `Address.City` reaches through nested values, with
//!   null-safe access across optional links
//! - **Compile once, run many**: property lookup and bound parsing happen at
//!   compile time; predicates are plain closures
//!
//! ## Main Components
//!
//! - **[`FilterCompiler`]**: turns a [`FilterMap`](crate::models::FilterMap)
//!   into a [`CompiledFilter`]
//! - **[`FilterSpec`]**: normalised plain or composite filter of one property
//! - **[`Sorter`]**: multi-key ordering from a list of sort models
//! - **[`Pagination`](crate::models::Pagination)**: 1-based row window
//!
//! ## Filter Examples
//!
//! ```rust,ignore
//! // Names containing "ann", case sensitivity per entity settings
//! {"Name": {"filterType": "text", "type": "contains", "filter": "ann"}}
//!
//! // Born strictly between two dates
//! {"BirthDate": {"filterType": "date", "type": "inRange",
//!                "dateFrom": "1990-01-01", "dateTo": "2000-01-01"}}
//!
//! // Age at most 30 or at least 60
//! {"Age": {"filterType": "number", "operator": "or", "conditions": [
//!     {"type": "lessThanOrEqual", "filter": 30},
//!     {"type": "greaterThanOrEqual", "filter": 60}]}}
//!
//! // Status is one of the listed values, or unset
//! {"Status": {"filterType": "set", "values": ["open", "blocked", null]}}
//! ```
//!
//! ## Null Semantics
//!
//! Ordering comparisons against a null property value are false. `notEquals`
//! and `notContains` match null; set filters match null only when the value
//! list contains `null`.

pub mod compiler;
pub mod conditions;
pub mod pagination;
pub mod predicate;
pub mod sort;

mod compare;
mod date;
mod number;
mod set;
mod text;

// Re-export commonly used items
pub use compiler::{CompilerOptions, FilterCompiler};
pub use conditions::{
    Combinator, Condition, DateCondition, DateOp, FilterKind, FilterSpec, NumberCondition,
    NumberOp, SetCondition, TextCondition, TextOp,
};
pub use predicate::{CompiledFilter, Predicate};
pub use sort::Sorter;
