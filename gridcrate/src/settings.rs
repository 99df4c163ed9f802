//! # Case-Sensitivity Settings
//!
//! Text filters compare case-sensitively unless an entity type, or one of its
//! properties, is configured otherwise. Settings are an immutable snapshot:
//! build one at start-up and either hand it to a
//! [`FilterCompiler`](crate::filtering::FilterCompiler) explicitly or install
//! it process-wide.
//!
//! ```rust,ignore
//! CaseSettings::builder()
//!     .entity::<Customer>()
//!     .ignore_case(true)
//!     .property("Code", false)
//!     .done()
//!     .apply();
//! ```
//!
//! Installing replaces the whole snapshot, so a compile running concurrently
//! sees either the old settings or the new ones, never a mix.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

static GLOBAL_CASE_SETTINGS: LazyLock<RwLock<Arc<CaseSettings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(CaseSettings::default())));

/// Install `settings` as the process-wide snapshot.
pub fn install(settings: CaseSettings) {
    let mut guard = GLOBAL_CASE_SETTINGS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if !guard.entities.is_empty() {
        tracing::warn!("replacing previously installed case-sensitivity settings");
    }
    tracing::debug!(entities = settings.entities.len(), "installing case-sensitivity settings");
    *guard = Arc::new(settings);
}

/// The process-wide snapshot currently installed.
#[must_use]
pub fn current() -> Arc<CaseSettings> {
    let guard = GLOBAL_CASE_SETTINGS
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

#[derive(Debug, Clone, Default)]
struct EntityCase {
    ignore_case: Option<bool>,
    // keyed by lowercase property path
    properties: HashMap<String, bool>,
}

/// Per-entity and per-property ignore-case flags.
#[derive(Debug, Clone, Default)]
pub struct CaseSettings {
    entities: HashMap<TypeId, EntityCase>,
}

impl CaseSettings {
    #[must_use]
    pub fn builder() -> CaseSettingsBuilder {
        CaseSettingsBuilder {
            settings: Self::default(),
        }
    }

    /// Entity-level flag for `T`; `false` when not configured.
    #[must_use]
    pub fn is_case_insensitive<T: 'static>(&self) -> bool {
        self.entities
            .get(&TypeId::of::<T>())
            .and_then(|case| case.ignore_case)
            .unwrap_or(false)
    }

    /// Flag for one property of `T`. A property override wins over the
    /// entity-level flag.
    #[must_use]
    pub fn is_property_case_insensitive<T: 'static>(&self, property: &str) -> bool {
        let Some(case) = self.entities.get(&TypeId::of::<T>()) else {
            return false;
        };
        case.properties
            .get(&property.to_lowercase())
            .copied()
            .or(case.ignore_case)
            .unwrap_or(false)
    }
}

pub struct CaseSettingsBuilder {
    settings: CaseSettings,
}

impl CaseSettingsBuilder {
    /// Start configuring entity type `T`.
    #[must_use]
    pub fn entity<T: 'static>(mut self) -> EntityCaseBuilder<T> {
        let case = self
            .settings
            .entities
            .remove(&TypeId::of::<T>())
            .unwrap_or_default();
        EntityCaseBuilder {
            parent: self,
            case,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn build(self) -> CaseSettings {
        self.settings
    }

    /// Build and install process-wide.
    pub fn apply(self) {
        install(self.build());
    }
}

pub struct EntityCaseBuilder<T> {
    parent: CaseSettingsBuilder,
    case: EntityCase,
    _entity: PhantomData<fn() -> T>,
}

impl<T: 'static> EntityCaseBuilder<T> {
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.case.ignore_case = Some(ignore_case);
        self
    }

    /// Override the flag for one property path (matched case-insensitively).
    #[must_use]
    pub fn property(mut self, path: &str, ignore_case: bool) -> Self {
        self.case.properties.insert(path.to_lowercase(), ignore_case);
        self
    }

    #[must_use]
    pub fn done(mut self) -> CaseSettingsBuilder {
        self.parent.settings.entities.insert(TypeId::of::<T>(), self.case);
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Customer;
    struct Invoice;

    #[test]
    fn test_default_is_case_sensitive() {
        let settings = CaseSettings::default();
        assert!(!settings.is_case_insensitive::<Customer>());
        assert!(!settings.is_property_case_insensitive::<Customer>("name"));
    }

    #[test]
    fn test_entity_flag_applies_to_every_property() {
        let settings = CaseSettings::builder()
            .entity::<Customer>()
            .ignore_case(true)
            .done()
            .build();
        assert!(settings.is_case_insensitive::<Customer>());
        assert!(settings.is_property_case_insensitive::<Customer>("Name"));
        assert!(!settings.is_case_insensitive::<Invoice>());
    }

    #[test]
    fn test_property_override_wins() {
        let settings = CaseSettings::builder()
            .entity::<Customer>()
            .ignore_case(true)
            .property("Code", false)
            .done()
            .entity::<Invoice>()
            .property("reference", true)
            .done()
            .build();
        assert!(!settings.is_property_case_insensitive::<Customer>("code"));
        assert!(settings.is_property_case_insensitive::<Customer>("name"));
        assert!(settings.is_property_case_insensitive::<Invoice>("Reference"));
        assert!(!settings.is_property_case_insensitive::<Invoice>("number"));
    }

    #[test]
    fn test_reopening_an_entity_keeps_earlier_flags() {
        let settings = CaseSettings::builder()
            .entity::<Customer>()
            .ignore_case(true)
            .done()
            .entity::<Customer>()
            .property("Code", false)
            .done()
            .build();
        assert!(settings.is_case_insensitive::<Customer>());
        assert!(!settings.is_property_case_insensitive::<Customer>("code"));
    }
}
