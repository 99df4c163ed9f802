use sea_orm::Condition;
use std::fmt;
use std::sync::Arc;

/// A pure test over one entity.
///
/// Cheap to clone and safe to call from several threads at once; a predicate
/// holds no mutable state.
pub struct Predicate<T>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T: 'static> Predicate<T> {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    #[must_use]
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    #[must_use]
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::new(move |entity| self.test(entity) && other.test(entity))
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::new(move |entity| self.test(entity) || other.test(entity))
    }
}

impl<T> Predicate<T> {
    #[inline]
    pub fn test(&self, entity: &T) -> bool {
        (self.0)(entity)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// A compiled filter: the in-memory predicate and the equivalent SQL
/// condition for deferred query sources.
pub struct CompiledFilter<T> {
    predicate: Predicate<T>,
    condition: Condition,
}

impl<T: 'static> CompiledFilter<T> {
    #[must_use]
    pub fn new(predicate: Predicate<T>, condition: Condition) -> Self {
        Self {
            predicate,
            condition,
        }
    }

    /// Matches every entity; the identity of [`CompiledFilter::and`].
    #[must_use]
    pub fn always() -> Self {
        Self::new(Predicate::always(), Condition::all())
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            predicate: self.predicate.and(other.predicate),
            condition: Condition::all().add(self.condition).add(other.condition),
        }
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            predicate: self.predicate.or(other.predicate),
            condition: Condition::any().add(self.condition).add(other.condition),
        }
    }
}

impl<T> CompiledFilter<T> {
    #[inline]
    pub fn matches(&self, entity: &T) -> bool {
        self.predicate.test(entity)
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate<T> {
        &self.predicate
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[must_use]
    pub fn into_parts(self) -> (Predicate<T>, Condition) {
        (self.predicate, self.condition)
    }
}

impl<T> Clone for CompiledFilter<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            condition: self.condition.clone(),
        }
    }
}

impl<T> fmt::Debug for CompiledFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}
