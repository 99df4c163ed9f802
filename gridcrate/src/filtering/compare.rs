use sea_orm::{
    Condition,
    sea_query::{Expr, SimpleExpr},
};
use std::cmp::Ordering;
use std::sync::Arc;

use super::predicate::{CompiledFilter, Predicate};
use crate::core::{ResolvedProperty, Value};

/// Binary comparison against a bound, with lifted-null semantics: every
/// ordering test against null is false and `Ne` against null is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub(crate) fn holds(self, value: &Value<'_>, bound: &Value<'_>) -> bool {
        let ordering = value.compare(bound);
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::Ne => ordering != Some(Ordering::Equal),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }

    fn to_sql(self, column: Expr, bound: sea_orm::Value) -> SimpleExpr {
        match self {
            Self::Eq => column.eq(bound),
            Self::Ne => column.clone().ne(bound).or(column.is_null()),
            Self::Lt => column.lt(bound),
            Self::Le => column.lte(bound),
            Self::Gt => column.gt(bound),
            Self::Ge => column.gte(bound),
        }
    }
}

/// `property <comparison> bound`.
pub(crate) fn compare<T: 'static>(
    property: &ResolvedProperty<T>,
    comparison: Comparison,
    bound: Value<'static>,
) -> CompiledFilter<T> {
    let condition =
        Condition::all().add(comparison.to_sql(property.column.expr(), bound.to_sql()));
    let getter = Arc::clone(&property.getter);
    let predicate =
        Predicate::new(move |entity: &T| comparison.holds(&getter(entity), &bound));
    CompiledFilter::new(predicate, condition)
}

/// Both comparisons must hold.
pub(crate) fn between<T: 'static>(
    property: &ResolvedProperty<T>,
    (lower, from): (Comparison, Value<'static>),
    (upper, to): (Comparison, Value<'static>),
) -> CompiledFilter<T> {
    compare(property, lower, from).and(compare(property, upper, to))
}

pub(crate) fn null_check<T: 'static>(
    property: &ResolvedProperty<T>,
    expect_null: bool,
) -> CompiledFilter<T> {
    let column = property.column.expr();
    let condition = Condition::all().add(if expect_null {
        column.is_null()
    } else {
        column.is_not_null()
    });
    let getter = Arc::clone(&property.getter);
    let predicate = Predicate::new(move |entity: &T| getter(entity).is_null() == expect_null);
    CompiledFilter::new(predicate, condition)
}

/// Condition that no row satisfies.
pub(crate) fn nothing<T: 'static>() -> CompiledFilter<T> {
    CompiledFilter::new(Predicate::never(), Condition::all().add(Expr::cust("1=0")))
}
