pub mod convert;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{AccessMode, ColumnPath, EntitySchema, Getter, ResolvedProperty, SchemaBuilder};
pub use traits::GridEntity;
pub use value::{PropertyValue, Value, ValueType};
