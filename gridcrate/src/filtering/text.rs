use sea_orm::{
    Condition,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};
use std::borrow::Cow;
use std::sync::Arc;

use super::conditions::{TextCondition, TextOp};
use super::predicate::{CompiledFilter, Predicate};
use crate::core::{ResolvedProperty, Value, ValueType};
use crate::errors::{FilterError, Result};

/// Compile a text condition.
///
/// Non-text properties are compared through their display form. With
/// `ignore_case` both sides are folded with [`fold_case`] before comparing.
pub(crate) fn compile<T: 'static>(
    property: &ResolvedProperty<T>,
    condition: &TextCondition,
    ignore_case: bool,
) -> Result<CompiledFilter<T>> {
    let op = condition.op;
    let needle = match (op, condition.value.as_deref()) {
        (TextOp::Blank | TextOp::NotBlank, _) => String::new(),
        (_, Some(value)) if ignore_case => fold_case(value),
        (_, Some(value)) => value.to_string(),
        (_, None) => return Err(FilterError::missing_value("filter", op.name())),
    };

    let sql = Condition::all().add(text_sql(property, op, &needle, ignore_case));
    let getter = Arc::clone(&property.getter);
    let predicate = Predicate::new(move |entity: &T| {
        let value = getter(entity);
        match text_of(&value) {
            None => matches!(op, TextOp::NotEquals | TextOp::NotContains | TextOp::Blank),
            Some(text) if ignore_case => text_matches(op, &fold_case(&text), &needle),
            Some(text) => text_matches(op, &text, &needle),
        }
    });
    Ok(CompiledFilter::new(predicate, sql))
}

fn text_matches(op: TextOp, text: &str, needle: &str) -> bool {
    match op {
        TextOp::Equals => text == needle,
        TextOp::NotEquals => text != needle,
        TextOp::Contains => text.contains(needle),
        TextOp::NotContains => !text.contains(needle),
        TextOp::StartsWith => text.starts_with(needle),
        TextOp::EndsWith => text.ends_with(needle),
        TextOp::Blank => text.is_empty(),
        TextOp::NotBlank => !text.is_empty(),
    }
}

/// Ordinal case folding: every char maps to its simple uppercase form.
///
/// Chars whose uppercase expands to several chars (`ß`) are kept as is, so
/// folding never changes the char count.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars()
        .map(|ch| {
            let mut upper = ch.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => ch,
            }
        })
        .collect()
}

/// Textual form of a value; `None` for null.
pub(crate) fn text_of<'v>(value: &'v Value<'_>) -> Option<Cow<'v, str>> {
    match value {
        Value::Null => None,
        Value::Text(text) => Some(Cow::Borrowed(&**text)),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Column expression usable in text comparisons; non-text columns are cast.
pub(crate) fn text_column<T>(property: &ResolvedProperty<T>) -> Expr {
    let column = property.column.expr();
    if property.value_type == ValueType::Text {
        column
    } else {
        Expr::expr(column.cast_as(Alias::new("TEXT")))
    }
}

fn text_sql<T>(
    property: &ResolvedProperty<T>,
    op: TextOp,
    needle: &str,
    ignore_case: bool,
) -> SimpleExpr {
    let raw = property.column.expr();
    let column = if ignore_case {
        Expr::expr(Func::upper(text_column(property)))
    } else {
        text_column(property)
    };
    let is_text = property.value_type == ValueType::Text;

    match op {
        TextOp::Equals => column.eq(needle),
        TextOp::NotEquals => column.ne(needle).or(raw.is_null()),
        TextOp::Contains => column.like(like_pattern(&format!("%{}%", like_escape(needle)))),
        TextOp::NotContains => column
            .not_like(like_pattern(&format!("%{}%", like_escape(needle))))
            .or(raw.is_null()),
        TextOp::StartsWith => column.like(like_pattern(&format!("{}%", like_escape(needle)))),
        TextOp::EndsWith => column.like(like_pattern(&format!("%{}", like_escape(needle)))),
        TextOp::Blank if is_text => raw.clone().is_null().or(raw.eq("")),
        TextOp::Blank => raw.is_null(),
        TextOp::NotBlank if is_text => raw.clone().is_not_null().and(raw.ne("")),
        TextOp::NotBlank => raw.is_not_null(),
    }
}

// Must not need quoting inside a SQL string literal on any backend.
const LIKE_ESCAPE: char = '!';

fn like_pattern(pattern: &str) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}
