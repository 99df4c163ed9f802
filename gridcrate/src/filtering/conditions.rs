use std::fmt;
use std::str::FromStr;

use crate::errors::{FilterError, Result};
use crate::models::{ConditionModel, FilterModel};

/// Declares an operator enumeration whose names parse case-insensitively.
macro_rules! operators {
    (
        $(#[$meta:meta])*
        $name:ident for $kind:literal {
            $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every operator of this kind.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            /// Name used on the wire.
            #[must_use]
            pub const fn wire_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = FilterError;

            fn from_str(raw: &str) -> Result<Self> {
                let name = raw.trim();
                $(
                    if name.eq_ignore_ascii_case(stringify!($variant))
                        $(|| name.eq_ignore_ascii_case($alias))*
                    {
                        return Ok(Self::$variant);
                    }
                )+
                Err(FilterError::unsupported_operator($kind, raw))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.wire_name())
            }
        }
    };
}

operators! {
    /// Operators of text filters.
    TextOp for "text" {
        Equals => "equals",
        NotEquals => "notEquals" | "notEqual",
        Contains => "contains",
        NotContains => "notContains",
        StartsWith => "startsWith",
        EndsWith => "endsWith",
        Blank => "blank",
        NotBlank => "notBlank",
    }
}

operators! {
    /// Operators of date filters. `Empty` behaves like `Blank`.
    DateOp for "date" {
        Equals => "equals",
        NotEquals => "notEquals" | "notEqual",
        LessThan => "lessThan",
        GreaterThan => "greaterThan",
        InRange => "inRange",
        Blank => "blank",
        NotBlank => "notBlank",
        Empty => "empty",
    }
}

operators! {
    /// Operators of number filters.
    NumberOp for "number" {
        Equals => "equals",
        NotEquals => "notEquals" | "notEqual",
        LessThan => "lessThan",
        LessThanOrEqual => "lessThanOrEqual",
        GreaterThan => "greaterThan",
        GreaterThanOrEqual => "greaterThanOrEqual",
        InRange => "inRange",
        Blank => "blank",
        NotBlank => "notBlank",
    }
}

/// The four filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Text,
    Date,
    Number,
    Set,
}

impl FilterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Number => "number",
            Self::Set => "set",
        }
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "date" => Ok(Self::Date),
            "number" => Ok(Self::Number),
            "set" => Ok(Self::Set),
            _ => Err(FilterError::UnknownFilterType(raw.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the conditions of a composite filter combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl FromStr for Combinator {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(FilterError::malformed(format!(
                "composite operator '{raw}' must be 'and' or 'or'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCondition {
    pub op: TextOp,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCondition {
    pub op: DateOp,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberCondition {
    pub op: NumberOp,
    pub value: Option<String>,
    pub value_to: Option<String>,
}

/// Membership test. A `None` entry admits null property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCondition {
    pub values: Vec<Option<String>>,
}

/// A single typed condition against one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Text(TextCondition),
    Date(DateCondition),
    Number(NumberCondition),
    Set(SetCondition),
}

impl Condition {
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Text(_) => FilterKind::Text,
            Self::Date(_) => FilterKind::Date,
            Self::Number(_) => FilterKind::Number,
            Self::Set(_) => FilterKind::Set,
        }
    }

    /// Build a condition of `kind` from its wire fields.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnsupportedOperator`] when the operator name is
    /// missing or not part of the kind's enumeration.
    pub fn from_model(kind: FilterKind, model: &ConditionModel) -> Result<Self> {
        let op = model.option.as_deref().unwrap_or_default();
        Ok(match kind {
            FilterKind::Text => Self::Text(TextCondition {
                op: op.parse()?,
                value: model.filter.clone(),
            }),
            FilterKind::Date => Self::Date(DateCondition {
                op: op.parse()?,
                from: non_empty(model.date_from.as_ref()),
                to: non_empty(model.date_to.as_ref()),
            }),
            FilterKind::Number => Self::Number(NumberCondition {
                op: op.parse()?,
                value: non_empty(model.filter.as_ref()),
                value_to: non_empty(model.filter_to.as_ref()),
            }),
            FilterKind::Set => Self::Set(SetCondition {
                values: model.values.clone().unwrap_or_default(),
            }),
        })
    }
}

/// Normalised filter for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Plain(Condition),
    Composite {
        kind: FilterKind,
        combinator: Combinator,
        conditions: Vec<Condition>,
    },
}

impl FilterSpec {
    /// Normalise a wire filter into a plain or composite spec.
    ///
    /// A filter with an `operator` is composite and must carry at least one
    /// condition, each of the filter's own kind. A filter without one is plain
    /// and must carry no conditions.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilterType`] for an unknown or missing
    /// kind, [`FilterError::MalformedFilter`] for an invalid plain/composite
    /// shape and [`FilterError::UnsupportedOperator`] for unknown operator
    /// names.
    pub fn from_model(model: &FilterModel) -> Result<Self> {
        let kind = parse_kind(model.filter_type.as_deref())?;

        let combinator = match model.operator.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(operator) => Some(operator.parse::<Combinator>()?),
        };

        let Some(combinator) = combinator else {
            if !model.conditions.is_empty() {
                return Err(FilterError::malformed(
                    "conditions require an 'and' or 'or' operator",
                ));
            }
            return Ok(Self::Plain(Condition::from_model(kind, &model.into())?));
        };

        if model.conditions.is_empty() {
            return Err(FilterError::malformed(
                "composite filter has no conditions",
            ));
        }

        let conditions = model
            .conditions
            .iter()
            .map(|condition| {
                if let Some(tag) = condition.filter_type.as_deref() {
                    let condition_kind = parse_kind(Some(tag))?;
                    if condition_kind != kind {
                        return Err(FilterError::malformed(format!(
                            "{condition_kind} condition inside a {kind} filter"
                        )));
                    }
                }
                Condition::from_model(kind, condition)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::Composite {
            kind,
            combinator,
            conditions,
        })
    }

    #[must_use]
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Plain(condition) => condition.kind(),
            Self::Composite { kind, .. } => *kind,
        }
    }
}

fn parse_kind(tag: Option<&str>) -> Result<FilterKind> {
    tag.unwrap_or_default().parse()
}

// Only `""` counts as absent; whitespace is left to the value parser.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: serde_json::Value) -> FilterModel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_operator_names_are_case_insensitive() {
        assert_eq!("CONTAINS".parse::<TextOp>().unwrap(), TextOp::Contains);
        assert_eq!("inrange".parse::<DateOp>().unwrap(), DateOp::InRange);
        assert_eq!("notEqual".parse::<NumberOp>().unwrap(), NumberOp::NotEquals);
        assert_eq!(
            "lessThanOrEqual".parse::<NumberOp>().unwrap(),
            NumberOp::LessThanOrEqual
        );
    }

    #[test]
    fn test_operator_outside_kind_is_unsupported() {
        let err = "lessThanOrEqual".parse::<DateOp>().unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperator {
                kind: "date",
                operator: "lessThanOrEqual".to_string()
            }
        );
        assert!("empty".parse::<TextOp>().is_err());
    }

    #[test]
    fn test_every_operator_round_trips_its_names() {
        for op in TextOp::ALL {
            assert_eq!(op.name().parse::<TextOp>().unwrap(), *op);
            assert_eq!(op.wire_name().parse::<TextOp>().unwrap(), *op);
        }
        for op in NumberOp::ALL {
            assert_eq!(op.to_string().parse::<NumberOp>().unwrap(), *op);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = FilterSpec::from_model(&model(json!({"filterType": "colour", "type": "equals"})))
            .unwrap_err();
        assert_eq!(err, FilterError::UnknownFilterType("colour".to_string()));
        assert!(matches!(
            FilterSpec::from_model(&model(json!({"type": "equals"}))),
            Err(FilterError::UnknownFilterType(_))
        ));
    }

    #[test]
    fn test_plain_text_filter() {
        let spec = FilterSpec::from_model(&model(json!({
            "filterType": "TEXT",
            "type": "startsWith",
            "filter": "ab"
        })))
        .unwrap();
        assert_eq!(
            spec,
            FilterSpec::Plain(Condition::Text(TextCondition {
                op: TextOp::StartsWith,
                value: Some("ab".to_string())
            }))
        );
    }

    #[test]
    fn test_empty_date_bound_counts_as_missing() {
        let spec = FilterSpec::from_model(&model(json!({
            "filterType": "date",
            "type": "equals",
            "dateFrom": ""
        })))
        .unwrap();
        let FilterSpec::Plain(Condition::Date(date)) = spec else {
            panic!("expected a plain date filter");
        };
        assert_eq!(date.from, None);
    }

    #[test]
    fn test_whitespace_bound_is_kept() {
        let spec = FilterSpec::from_model(&model(json!({
            "filterType": "number",
            "type": "equals",
            "filter": "  "
        })))
        .unwrap();
        let FilterSpec::Plain(Condition::Number(number)) = spec else {
            panic!("expected a plain number filter");
        };
        assert_eq!(number.value.as_deref(), Some("  "));
    }

    #[test]
    fn test_composite_filter() {
        let spec = FilterSpec::from_model(&model(json!({
            "filterType": "number",
            "operator": "Or",
            "conditions": [
                {"filterType": "number", "type": "lessThan", "filter": 5},
                {"type": "greaterThan", "filter": 10}
            ]
        })))
        .unwrap();
        let FilterSpec::Composite {
            kind,
            combinator,
            conditions,
        } = spec
        else {
            panic!("expected a composite filter");
        };
        assert_eq!(kind, FilterKind::Number);
        assert_eq!(combinator, Combinator::Or);
        assert_eq!(conditions.len(), 2);
        assert_eq!(
            conditions[1],
            Condition::Number(NumberCondition {
                op: NumberOp::GreaterThan,
                value: Some("10".to_string()),
                value_to: None
            })
        );
    }

    #[test]
    fn test_malformed_shapes() {
        let plain_with_conditions = model(json!({
            "filterType": "text",
            "type": "equals",
            "conditions": [{"type": "equals", "filter": "a"}]
        }));
        let composite_without_conditions = model(json!({
            "filterType": "text",
            "operator": "and"
        }));
        let bad_combinator = model(json!({
            "filterType": "text",
            "operator": "xor",
            "conditions": [{"type": "equals", "filter": "a"}]
        }));
        let mixed_kinds = model(json!({
            "filterType": "text",
            "operator": "and",
            "conditions": [{"filterType": "number", "type": "equals", "filter": 1}]
        }));

        for bad in [
            plain_with_conditions,
            composite_without_conditions,
            bad_combinator,
            mixed_kinds,
        ] {
            assert!(matches!(
                FilterSpec::from_model(&bad),
                Err(FilterError::MalformedFilter(_))
            ));
        }
    }

    #[test]
    fn test_missing_operator_name_is_unsupported() {
        assert!(matches!(
            FilterSpec::from_model(&model(json!({"filterType": "number", "filter": 3}))),
            Err(FilterError::UnsupportedOperator { kind: "number", .. })
        ));
    }

    #[test]
    fn test_set_filter_keeps_null_entries() {
        let spec = FilterSpec::from_model(&model(json!({
            "filterType": "set",
            "values": ["x", null]
        })))
        .unwrap();
        assert_eq!(
            spec,
            FilterSpec::Plain(Condition::Set(SetCondition {
                values: vec![Some("x".to_string()), None]
            }))
        );
    }
}
