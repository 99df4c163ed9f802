use std::sync::Arc;

use super::conditions::{Combinator, Condition, FilterSpec};
use super::predicate::CompiledFilter;
use super::{date, number, set, text};
use crate::core::{AccessMode, GridEntity, ResolvedProperty};
use crate::errors::{FilterError, Result};
use crate::models::{FilterMap, FilterModel};
use crate::settings::{self, CaseSettings};

/// Knobs of a [`FilterCompiler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub access: AccessMode,
}

/// Compiles filter maps into [`CompiledFilter`]s for one entity type at a
/// time.
///
/// The compiler holds a case-settings snapshot; [`FilterCompiler::new`] takes
/// the process-wide one at construction.
#[derive(Debug, Clone)]
pub struct FilterCompiler {
    settings: Arc<CaseSettings>,
    options: CompilerOptions,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(settings::current())
    }

    #[must_use]
    pub fn with_settings(settings: Arc<CaseSettings>) -> Self {
        Self {
            settings,
            options: CompilerOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    /// Compile every entry of `filters` and conjoin them.
    ///
    /// All properties are resolved and all specs normalised before any
    /// condition compiles, so an invalid entry fails the whole map. An empty
    /// map compiles to a filter matching everything, and `null` entries are
    /// skipped without resolving their key.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterError`] raised by any entry.
    pub fn compile<T: GridEntity>(&self, filters: &FilterMap) -> Result<CompiledFilter<T>> {
        let mut entries: Vec<(&String, &FilterModel)> = filters
            .iter()
            .filter_map(|(path, model)| {
                if model.is_none() {
                    tracing::trace!(property = %path, "skipping null filter entry");
                }
                model.as_ref().map(|model| (path, model))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let prepared = entries
            .into_iter()
            .map(|(path, model)| {
                let property = T::schema().resolve(path, self.options.access)?;
                let spec = FilterSpec::from_model(model)?;
                Ok((property, spec))
            })
            .collect::<Result<Vec<_>>>()?;

        let compiled = prepared
            .iter()
            .map(|(property, spec)| self.compile_resolved::<T>(property, spec))
            .try_fold(CompiledFilter::always(), |acc, filter| {
                filter.map(|filter| acc.and(filter))
            })?;

        tracing::debug!(
            entity = T::entity_name(),
            properties = prepared.len(),
            "compiled filter map"
        );
        Ok(compiled)
    }

    /// Compile the filter of a single property.
    ///
    /// # Errors
    ///
    /// See [`FilterCompiler::compile`].
    pub fn compile_property<T: GridEntity>(
        &self,
        path: &str,
        model: &FilterModel,
    ) -> Result<CompiledFilter<T>> {
        let spec = FilterSpec::from_model(model)?;
        self.compile_spec(path, &spec)
    }

    /// Compile an already normalised spec for a single property.
    ///
    /// # Errors
    ///
    /// See [`FilterCompiler::compile`].
    pub fn compile_spec<T: GridEntity>(
        &self,
        path: &str,
        spec: &FilterSpec,
    ) -> Result<CompiledFilter<T>> {
        let property = T::schema().resolve(path, self.options.access)?;
        self.compile_resolved(&property, spec)
    }

    fn compile_resolved<T: GridEntity>(
        &self,
        property: &ResolvedProperty<T>,
        spec: &FilterSpec,
    ) -> Result<CompiledFilter<T>> {
        let leaves = match spec {
            FilterSpec::Plain(_) => 1,
            FilterSpec::Composite { conditions, .. } => conditions.len(),
        };
        tracing::debug!(
            entity = T::entity_name(),
            property = %property.name,
            kind = %spec.kind(),
            conditions = leaves,
            "compiling property filter"
        );
        match spec {
            FilterSpec::Plain(condition) => self.compile_condition(property, condition),
            FilterSpec::Composite {
                kind,
                combinator,
                conditions,
            } => {
                let (first, rest) = conditions.split_first().ok_or_else(|| {
                    FilterError::malformed("composite filter has no conditions")
                })?;
                if let Some(stray) = conditions.iter().find(|c| c.kind() != *kind) {
                    return Err(FilterError::malformed(format!(
                        "{} condition inside a {kind} filter",
                        stray.kind()
                    )));
                }

                tracing::trace!(
                    property = %property.name,
                    combinator = ?combinator,
                    conditions = conditions.len(),
                    "folding composite filter"
                );
                rest.iter().try_fold(
                    self.compile_condition(property, first)?,
                    |acc, condition| {
                        let next = self.compile_condition(property, condition)?;
                        Ok(match combinator {
                            Combinator::And => acc.and(next),
                            Combinator::Or => acc.or(next),
                        })
                    },
                )
            }
        }
    }

    fn compile_condition<T: GridEntity>(
        &self,
        property: &ResolvedProperty<T>,
        condition: &Condition,
    ) -> Result<CompiledFilter<T>> {
        tracing::trace!(property = %property.name, condition = ?condition, "compiling condition");
        match condition {
            Condition::Text(text) => {
                let ignore_case = self.settings.is_property_case_insensitive::<T>(&property.name);
                text::compile(property, text, ignore_case)
            }
            Condition::Date(date) => date::compile(property, date),
            Condition::Number(number) => number::compile(property, number),
            Condition::Set(values) => Ok(set::compile(property, values)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntitySchema;
    use crate::filtering::conditions::FilterKind;
    use serde_json::json;
    use std::sync::LazyLock;

    struct Word {
        text: Option<String>,
        size: i32,
    }

    static WORD: LazyLock<EntitySchema<Word>> = LazyLock::new(|| {
        EntitySchema::builder()
            .property("Text", |w: &Word| &w.text)
            .property("Size", |w: &Word| &w.size)
            .build()
            .expect("word schema")
    });

    impl GridEntity for Word {
        fn schema() -> &'static EntitySchema<Self> {
            &WORD
        }
    }

    fn words() -> Vec<Word> {
        [Some("abc"), Some("def"), Some("ghi"), None]
            .into_iter()
            .zip(1..)
            .map(|(text, size)| Word {
                text: text.map(str::to_string),
                size,
            })
            .collect()
    }

    fn filters(value: serde_json::Value) -> FilterMap {
        serde_json::from_value(value).unwrap()
    }

    fn matching(compiler: &FilterCompiler, map: &FilterMap) -> Vec<Option<String>> {
        let compiled = compiler.compile::<Word>(map).unwrap();
        words()
            .into_iter()
            .filter(|w| compiled.matches(w))
            .map(|w| w.text)
            .collect()
    }

    #[test]
    fn test_composite_and_of_not_equals() {
        let map = filters(json!({
            "text": {
                "filterType": "text",
                "operator": "and",
                "conditions": [
                    {"type": "notEquals", "filter": "abc"},
                    {"type": "notEquals", "filter": "ghi"}
                ]
            }
        }));
        assert_eq!(
            matching(&FilterCompiler::with_settings(Arc::default()), &map),
            vec![Some("def".to_string()), None]
        );
    }

    #[test]
    fn test_entries_are_conjoined() {
        let map = filters(json!({
            "text": {"filterType": "text", "type": "notBlank"},
            "size": {"filterType": "number", "type": "greaterThan", "filter": 1}
        }));
        assert_eq!(
            matching(&FilterCompiler::with_settings(Arc::default()), &map),
            vec![Some("def".to_string()), Some("ghi".to_string())]
        );
    }

    #[test]
    fn test_empty_map_matches_everything() {
        let compiler = FilterCompiler::with_settings(Arc::default());
        assert_eq!(matching(&compiler, &FilterMap::new()).len(), 4);
    }

    #[test]
    fn test_null_entry_places_no_constraint() {
        let compiler = FilterCompiler::with_settings(Arc::default());
        let map = filters(json!({"text": null, "unknown": null}));
        assert_eq!(matching(&compiler, &map).len(), 4);

        let map = filters(json!({
            "text": null,
            "size": {"filterType": "number", "type": "lessThan", "filter": 3}
        }));
        assert_eq!(
            matching(&compiler, &map),
            vec![Some("abc".to_string()), Some("def".to_string())]
        );
    }

    #[test]
    fn test_options_are_kept() {
        let compiler = FilterCompiler::with_settings(Arc::default());
        assert_eq!(compiler.options().access, AccessMode::NullSafe);

        let direct = compiler.with_options(CompilerOptions {
            access: AccessMode::Direct,
        });
        assert_eq!(direct.options().access, AccessMode::Direct);
        let map = filters(json!({"size": {"filterType": "number", "type": "equals", "filter": 2}}));
        assert_eq!(matching(&direct, &map), vec![Some("def".to_string())]);
    }

    #[test]
    fn test_case_settings_snapshot_is_honoured() {
        let settings = CaseSettings::builder()
            .entity::<Word>()
            .ignore_case(true)
            .done()
            .build();
        let map = filters(json!({"text": {"filterType": "text", "type": "contains", "filter": "B"}}));
        assert_eq!(
            matching(&FilterCompiler::with_settings(Arc::new(settings)), &map),
            vec![Some("abc".to_string())]
        );
        assert!(matching(&FilterCompiler::with_settings(Arc::default()), &map).is_empty());
    }

    #[test]
    fn test_one_bad_entry_fails_the_map() {
        let map = filters(json!({
            "size": {"filterType": "number", "type": "equals", "filter": 1},
            "missing": {"filterType": "number", "type": "equals", "filter": 1}
        }));
        let err = FilterCompiler::with_settings(Arc::default())
            .compile::<Word>(&map)
            .unwrap_err();
        assert!(matches!(err, FilterError::PropertyNotFound { ref segment, .. } if segment == "missing"));
    }

    #[test]
    fn test_programmatic_composite_is_validated() {
        let compiler = FilterCompiler::with_settings(Arc::default());
        let empty = FilterSpec::Composite {
            kind: FilterKind::Text,
            combinator: Combinator::Or,
            conditions: Vec::new(),
        };
        assert!(matches!(
            compiler.compile_spec::<Word>("text", &empty),
            Err(FilterError::MalformedFilter(_))
        ));
    }
}
