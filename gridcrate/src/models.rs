use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Filters for one query, keyed by property path.
///
/// Every entry must hold for an entity to match; key order is irrelevant.
/// A `null` entry places no constraint on its property.
pub type FilterMap = HashMap<String, Option<FilterModel>>;

/// Filter attached to a single property.
///
/// A filter is either **plain**, carrying the operator name in `type` and the
/// bounds its kind needs:
/// ```json
/// {"filterType": "number", "type": "inRange", "filter": 10, "filterTo": 20}
/// ```
/// or **composite**, combining conditions of the same kind with `and`/`or`:
/// ```json
/// {
///   "filterType": "text",
///   "operator": "and",
///   "conditions": [
///     {"filterType": "text", "type": "notEquals", "filter": "abc"},
///     {"filterType": "text", "type": "startsWith", "filter": "a"}
///   ]
/// }
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    /// Filter kind: `text`, `date`, `number` or `set`.
    #[serde(alias = "kind")]
    #[schema(example = "text")]
    pub filter_type: Option<String>,
    /// `and` / `or` for composite filters; absent for plain filters.
    pub operator: Option<String>,
    /// Conditions of a composite filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionModel>,
    /// Operator name of a plain filter, e.g. `contains` or `inRange`.
    #[serde(rename = "type")]
    #[schema(example = "contains")]
    pub option: Option<String>,
    /// Text or number bound. JSON numbers are accepted.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub filter: Option<String>,
    /// Upper number bound for `inRange`.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub filter_to: Option<String>,
    /// Date bound, or lower bound for `inRange`.
    pub date_from: Option<String>,
    /// Upper date bound for `inRange`.
    pub date_to: Option<String>,
    /// Allowed values of a set filter. `null` admits null property values.
    pub values: Option<Vec<Option<String>>>,
}

/// One condition inside a composite filter.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionModel {
    /// Must equal the enclosing filter's kind when present.
    #[serde(alias = "kind")]
    pub filter_type: Option<String>,
    #[serde(rename = "type")]
    pub option: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub filter: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub filter_to: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub values: Option<Vec<Option<String>>>,
}

impl From<&FilterModel> for ConditionModel {
    fn from(model: &FilterModel) -> Self {
        Self {
            filter_type: model.filter_type.clone(),
            option: model.option.clone(),
            filter: model.filter.clone(),
            filter_to: model.filter_to.clone(),
            date_from: model.date_from.clone(),
            date_to: model.date_to.clone(),
            values: model.values.clone(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "ASC", alias = "Asc")]
    Asc,
    #[serde(alias = "DESC", alias = "Desc")]
    Desc,
}

/// One sort key. The first entry of a list is the primary key, later entries
/// break ties in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortModel {
    #[serde(alias = "colId")]
    #[schema(example = "name")]
    pub property: String,
    #[serde(default, alias = "sort", alias = "direction")]
    pub order: SortOrder,
}

impl SortModel {
    #[must_use]
    pub fn new(property: impl Into<String>, order: SortOrder) -> Self {
        Self {
            property: property.into(),
            order,
        }
    }
}

/// Row window: 1-based inclusive `startRow`, exclusive `endRow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[schema(example = 1)]
    pub start_row: u64,
    #[schema(example = 11)]
    pub end_row: u64,
}

/// Filter, sort and pagination of one grid request, applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GridRequest {
    #[schema(value_type = Option<HashMap<String, FilterModel>>)]
    pub filter: Option<FilterMap>,
    pub sort: Vec<SortModel>,
    pub pagination: Option<Pagination>,
}

/// Accept a JSON string, number or boolean where a textual bound is expected.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
        Scalar::Bool(flag) => flag.to_string(),
    }))
}
