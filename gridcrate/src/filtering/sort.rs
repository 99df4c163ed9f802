use sea_orm::sea_query::{Order, SimpleExpr};
use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::core::{AccessMode, GridEntity, ResolvedProperty};
use crate::models::{SortModel, SortOrder};

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}

struct SortKey<T> {
    property: ResolvedProperty<T>,
    order: SortOrder,
}

/// A compiled multi-key ordering.
///
/// Keys apply in list order, each later key breaking ties of the earlier
/// ones. Entries naming unknown properties are skipped with a warning.
pub struct Sorter<T> {
    keys: Vec<SortKey<T>>,
}

impl<T: GridEntity> Sorter<T> {
    #[must_use]
    pub fn compile(sorts: &[SortModel]) -> Self {
        let keys = sorts
            .iter()
            .filter_map(|sort| {
                match T::schema().resolve(&sort.property, AccessMode::NullSafe) {
                    Ok(property) => Some(SortKey {
                        property,
                        order: sort.order,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            entity = T::entity_name(),
                            property = %sort.property,
                            error = %e,
                            "skipping sort on unknown property"
                        );
                        None
                    }
                }
            })
            .collect();
        Self { keys }
    }
}

impl<T> Sorter<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Canonical names of the sort keys, in order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.property.name.as_str())
    }

    /// Compare two entities by every key in turn. Nulls sort first.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.keys
            .iter()
            .map(|key| {
                let ordering = key.property.get(a).sort_cmp(&key.property.get(b));
                match key.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort.
    pub fn sort<I: Borrow<T>>(&self, items: &mut [I]) {
        if self.is_empty() {
            return;
        }
        items.sort_by(|a, b| self.compare(<I as Borrow<T>>::borrow(a), <I as Borrow<T>>::borrow(b)));
    }

    /// `ORDER BY` terms for deferred queries.
    #[must_use]
    pub fn order_by(&self) -> Vec<(SimpleExpr, Order)> {
        self.keys
            .iter()
            .map(|key| (key.property.column.expr().into(), key.order.into()))
            .collect()
    }
}

impl<T> Clone for Sorter<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self
                .keys
                .iter()
                .map(|key| SortKey {
                    property: key.property.clone(),
                    order: key.order,
                })
                .collect(),
        }
    }
}

impl<T> std::fmt::Debug for Sorter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.keys.iter().map(|key| (&key.property.name, key.order)))
            .finish()
    }
}
