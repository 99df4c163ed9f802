use super::compare::{Comparison, between, compare, null_check};
use super::conditions::{NumberCondition, NumberOp};
use super::predicate::CompiledFilter;
use crate::core::convert::parse_number;
use crate::core::{ResolvedProperty, Value};
use crate::errors::{FilterError, Result};

/// Compile a number condition. `InRange` includes both bounds.
pub(crate) fn compile<T: 'static>(
    property: &ResolvedProperty<T>,
    condition: &NumberCondition,
) -> Result<CompiledFilter<T>> {
    let op = condition.op;
    let bound = |raw: Option<&String>, field: &'static str| -> Result<Value<'static>> {
        let raw = raw.ok_or_else(|| FilterError::missing_value(field, op.name()))?;
        parse_number(raw, property.value_type)
    };
    let value = || bound(condition.value.as_ref(), "filter");

    Ok(match op {
        NumberOp::Equals => compare(property, Comparison::Eq, value()?),
        NumberOp::NotEquals => compare(property, Comparison::Ne, value()?),
        NumberOp::LessThan => compare(property, Comparison::Lt, value()?),
        NumberOp::LessThanOrEqual => compare(property, Comparison::Le, value()?),
        NumberOp::GreaterThan => compare(property, Comparison::Gt, value()?),
        NumberOp::GreaterThanOrEqual => compare(property, Comparison::Ge, value()?),
        NumberOp::InRange => between(
            property,
            (Comparison::Ge, value()?),
            (Comparison::Le, bound(condition.value_to.as_ref(), "filterTo")?),
        ),
        NumberOp::Blank => null_check(property, true),
        NumberOp::NotBlank => null_check(property, false),
    })
}
