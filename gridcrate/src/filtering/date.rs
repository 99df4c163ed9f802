use super::compare::{Comparison, between, compare, null_check};
use super::conditions::{DateCondition, DateOp};
use super::predicate::CompiledFilter;
use crate::core::convert::parse_temporal;
use crate::core::{ResolvedProperty, Value};
use crate::errors::{FilterError, Result};

/// Compile a date condition.
///
/// Bounds are parsed for the property's own temporal type, so a date-only
/// property receives a date and a timestamp property a timestamp. `InRange`
/// excludes both bounds; `Blank` and `Empty` match null.
pub(crate) fn compile<T: 'static>(
    property: &ResolvedProperty<T>,
    condition: &DateCondition,
) -> Result<CompiledFilter<T>> {
    let op = condition.op;
    let bound = |raw: Option<&String>, field: &'static str| -> Result<Value<'static>> {
        let raw = raw.ok_or_else(|| FilterError::missing_value(field, op.name()))?;
        parse_temporal(raw, property.value_type)
    };
    let from = || bound(condition.from.as_ref(), "dateFrom");

    Ok(match op {
        DateOp::Equals => compare(property, Comparison::Eq, from()?),
        DateOp::NotEquals => compare(property, Comparison::Ne, from()?),
        DateOp::LessThan => compare(property, Comparison::Lt, from()?),
        DateOp::GreaterThan => compare(property, Comparison::Gt, from()?),
        DateOp::InRange => between(
            property,
            (Comparison::Gt, from()?),
            (Comparison::Lt, bound(condition.to.as_ref(), "dateTo")?),
        ),
        DateOp::Blank | DateOp::Empty => null_check(property, true),
        DateOp::NotBlank => null_check(property, false),
    })
}
