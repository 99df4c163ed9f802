use sea_orm::Condition;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::compare::nothing;
use super::conditions::SetCondition;
use super::predicate::{CompiledFilter, Predicate};
use super::text::{text_column, text_of};
use crate::core::ResolvedProperty;

/// Compile a set membership condition.
///
/// Values are matched against the property's textual form. Null property
/// values match only when the list holds a `None` entry; an empty list
/// matches nothing.
pub(crate) fn compile<T: 'static>(
    property: &ResolvedProperty<T>,
    condition: &SetCondition,
) -> CompiledFilter<T> {
    let admits_null = condition.values.iter().any(Option::is_none);
    let allowed: BTreeSet<String> = condition.values.iter().flatten().cloned().collect();
    if allowed.is_empty() && !admits_null {
        return nothing();
    }

    let mut sql = Condition::any();
    if !allowed.is_empty() {
        sql = sql.add(text_column(property).is_in(allowed.iter().cloned()));
    }
    if admits_null {
        sql = sql.add(property.column.expr().is_null());
    }

    let getter = Arc::clone(&property.getter);
    let predicate = Predicate::new(move |entity: &T| {
        let value = getter(entity);
        text_of(&value).map_or(admits_null, |text| allowed.contains(&*text))
    });
    CompiledFilter::new(predicate, sql)
}
