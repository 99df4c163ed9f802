//! Property registry and path resolution.
//!
//! Each entity type registers its filterable properties once, through
//! [`EntitySchema::builder`]. Filters, sorters and the case-sensitivity
//! configuration then look properties up by name, case-insensitively, and
//! receive a [`ResolvedProperty`] carrying the value type, a type-erased
//! getter and the SQL column the property maps to.
//!
//! ```rust,ignore
//! static SCHEMA: LazyLock<EntitySchema<Person>> = LazyLock::new(|| {
//!     EntitySchema::builder()
//!         .property("Name", |p: &Person| &p.name)
//!         .property("BirthDate", |p: &Person| &p.birth_date)
//!         .column("birth_date")
//!         .nested("Address", |p: &Person| &p.address)
//!         .nested_optional("Manager", |p: &Person| p.manager.as_deref())
//!         .build()
//!         .expect("person schema")
//! });
//! ```

use sea_orm::sea_query::{Alias, Expr};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use super::traits::GridEntity;
use super::value::{PropertyValue, Value, ValueType};
use crate::errors::{FilterError, Result, SchemaError};

/// Type-erased property getter.
pub type Getter<T> = Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;

type LinkGetter<T, U> = Arc<dyn for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync>;

fn getter<T, F>(f: F) -> Getter<T>
where
    F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn link_getter<T, U, F>(f: F) -> LinkGetter<T, U>
where
    F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a property path treats absent optional links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// An absent optional link yields `Value::Null`.
    #[default]
    NullSafe,
    /// Paths crossing an optional link are rejected at compile time.
    Direct,
}

/// SQL column a property maps to, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPath {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnPath {
    /// Column expression for sea-query conditions and orderings.
    #[must_use]
    pub fn expr(&self) -> Expr {
        match &self.table {
            Some(table) => Expr::col((Alias::new(table.as_str()), Alias::new(self.column.as_str()))),
            None => Expr::col(Alias::new(self.column.as_str())),
        }
    }

    fn qualified_by(self, table: &str) -> Self {
        Self {
            table: self.table.or_else(|| Some(table.to_string())),
            column: self.column,
        }
    }
}

/// A property path resolved against an entity type.
pub struct ResolvedProperty<T> {
    /// Canonical dotted name, using the registered spelling of each segment.
    pub name: String,
    pub value_type: ValueType,
    pub nullable: bool,
    pub getter: Getter<T>,
    pub column: ColumnPath,
}

impl<T> Clone for ResolvedProperty<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value_type: self.value_type,
            nullable: self.nullable,
            getter: Arc::clone(&self.getter),
            column: self.column.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ResolvedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProperty")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

impl<T> ResolvedProperty<T> {
    /// Read the property from an entity.
    pub fn get<'a>(&self, entity: &'a T) -> Value<'a> {
        (self.getter)(entity)
    }
}

trait NestedLink<T>: Send + Sync {
    fn resolve(
        &self,
        link_name: &str,
        table: &str,
        rest: &[&str],
        path: &str,
        access: AccessMode,
    ) -> Result<ResolvedProperty<T>>;
}

struct Link<T, U> {
    get: LinkGetter<T, U>,
    optional: bool,
    _target: PhantomData<fn() -> U>,
}

impl<T: 'static, U: GridEntity> NestedLink<T> for Link<T, U> {
    fn resolve(
        &self,
        link_name: &str,
        table: &str,
        rest: &[&str],
        path: &str,
        access: AccessMode,
    ) -> Result<ResolvedProperty<T>> {
        if rest.is_empty() {
            return Err(FilterError::property_not_found::<T>(path, link_name));
        }
        if self.optional && access == AccessMode::Direct {
            return Err(FilterError::UnguardedOptionalPath {
                path: path.to_string(),
                link: link_name.to_string(),
            });
        }

        let inner = U::schema().resolve_segments(rest, path, access)?;
        let inner_get = Arc::clone(&inner.getter);
        let get = Arc::clone(&self.get);

        Ok(ResolvedProperty {
            name: format!("{link_name}.{}", inner.name),
            value_type: inner.value_type,
            nullable: inner.nullable || self.optional,
            getter: getter(move |entity: &T| get(entity).map_or(Value::Null, |nested| inner_get(nested))),
            column: inner.column.qualified_by(table),
        })
    }
}

enum PropertyKind<T> {
    Scalar {
        value_type: ValueType,
        nullable: bool,
        getter: Getter<T>,
    },
    Nested(Box<dyn NestedLink<T>>),
}

struct PropertyDef<T> {
    name: String,
    column: String,
    kind: PropertyKind<T>,
}

/// Registry of an entity type's properties, looked up case-insensitively.
pub struct EntitySchema<T> {
    properties: Vec<PropertyDef<T>>,
    index: HashMap<String, usize>,
}

impl<T: 'static> EntitySchema<T> {
    #[must_use]
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            properties: Vec::new(),
        }
    }

    /// Registered property names, in registration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Resolve a dotted property path.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::PropertyNotFound`] when a segment matches no
    /// property, or [`FilterError::UnguardedOptionalPath`] when `access` is
    /// [`AccessMode::Direct`] and the path crosses an optional link.
    pub fn resolve(&self, path: &str, access: AccessMode) -> Result<ResolvedProperty<T>> {
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        self.resolve_segments(&segments, path, access)
    }

    /// Terminal value type of a path, with any `Option` wrapper removed.
    ///
    /// # Errors
    ///
    /// See [`EntitySchema::resolve`].
    pub fn resolve_type(&self, path: &str) -> Result<ValueType> {
        self.resolve(path, AccessMode::NullSafe).map(|p| p.value_type)
    }

    /// Getter for a path.
    ///
    /// # Errors
    ///
    /// See [`EntitySchema::resolve`].
    pub fn resolve_accessor(&self, path: &str, access: AccessMode) -> Result<Getter<T>> {
        self.resolve(path, access).map(|p| p.getter)
    }

    fn resolve_segments(
        &self,
        segments: &[&str],
        path: &str,
        access: AccessMode,
    ) -> Result<ResolvedProperty<T>> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(FilterError::property_not_found::<T>(path, path));
        };
        let property = self
            .index
            .get(&first.to_lowercase())
            .map(|&i| &self.properties[i])
            .ok_or_else(|| FilterError::property_not_found::<T>(path, first))?;

        match &property.kind {
            PropertyKind::Scalar {
                value_type,
                nullable,
                getter,
            } => {
                if let Some(next) = rest.first() {
                    return Err(FilterError::property_not_found::<T>(path, next));
                }
                Ok(ResolvedProperty {
                    name: property.name.clone(),
                    value_type: *value_type,
                    nullable: *nullable,
                    getter: Arc::clone(getter),
                    column: ColumnPath {
                        table: None,
                        column: property.column.clone(),
                    },
                })
            }
            PropertyKind::Nested(link) => link.resolve(&property.name, &property.column, rest, path, access),
        }
    }
}

/// Builder for [`EntitySchema`].
pub struct SchemaBuilder<T> {
    properties: Vec<PropertyDef<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Register a value property. The SQL column defaults to `name`.
    #[must_use]
    pub fn property<V, F>(mut self, name: &str, get: F) -> Self
    where
        V: PropertyValue + 'static,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        self.properties.push(PropertyDef {
            name: name.to_string(),
            column: name.to_string(),
            kind: PropertyKind::Scalar {
                value_type: V::VALUE_TYPE,
                nullable: V::NULLABLE,
                getter: getter(move |entity: &T| get(entity).to_value()),
            },
        });
        self
    }

    /// Override the SQL column of the last registered property. For nested
    /// links this is the table alias qualifying the nested columns.
    #[must_use]
    pub fn column(mut self, column: &str) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.column = column.to_string();
        }
        self
    }

    /// Register a nested value that is always present.
    #[must_use]
    pub fn nested<U, F>(self, name: &str, get: F) -> Self
    where
        U: GridEntity,
        F: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
    {
        let link: Link<T, U> = Link {
            get: link_getter(move |entity: &T| Some(get(entity))),
            optional: false,
            _target: PhantomData,
        };
        self.push_link(name, link)
    }

    /// Register a nested value that may be absent.
    #[must_use]
    pub fn nested_optional<U, F>(self, name: &str, get: F) -> Self
    where
        U: GridEntity,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        let link: Link<T, U> = Link {
            get: link_getter(get),
            optional: true,
            _target: PhantomData,
        };
        self.push_link(name, link)
    }

    fn push_link<U: GridEntity>(mut self, name: &str, link: Link<T, U>) -> Self {
        self.properties.push(PropertyDef {
            name: name.to_string(),
            column: name.to_string(),
            kind: PropertyKind::Nested(Box::new(link)),
        });
        self
    }

    /// Finish registration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateProperty`] when two properties share a
    /// case-insensitive name.
    pub fn build(self) -> Result<EntitySchema<T>, SchemaError> {
        let mut index = HashMap::with_capacity(self.properties.len());
        for (i, property) in self.properties.iter().enumerate() {
            if index.insert(property.name.to_lowercase(), i).is_some() {
                return Err(SchemaError::DuplicateProperty {
                    entity: std::any::type_name::<T>(),
                    property: property.name.clone(),
                });
            }
        }
        Ok(EntitySchema {
            properties: self.properties,
            index,
        })
    }
}
