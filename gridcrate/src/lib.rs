pub mod core;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod operations;
pub mod settings;

pub use crate::core::{AccessMode, EntitySchema, GridEntity, PropertyValue, ResolvedProperty, Value, ValueType};
pub use errors::{FilterError, Result, SchemaError};
pub use filtering::{CompiledFilter, CompilerOptions, FilterCompiler, FilterSpec, Predicate, Sorter};
pub use models::{ConditionModel, FilterMap, FilterModel, GridRequest, Pagination, SortModel, SortOrder};
pub use operations::{GridQueryExt, filter_from_json, pagination_from_json, sorting_from_json};
pub use settings::CaseSettings;
