//! # Query Operations
//!
//! This module applies compiled filters, sorters and pagination windows to
//! query sources.
//!
//! - **In-memory sources**: any iterator whose items borrow as the entity
//!   type gains [`GridQueryExt`]
//! - **Deferred sources**: any sea-orm query implementing `QueryFilter`,
//!   `QueryOrder` and `QuerySelect` receives the translated SQL through
//!   [`GridRequest::apply_to_query`]
//! - **JSON entry points**: [`filter_from_json`], [`sorting_from_json`] and
//!   [`pagination_from_json`] accept the raw grid request fragments
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridcrate::{GridQueryExt, GridRequest, filter_from_json};
//!
//! // One stage at a time
//! let adults = filter_from_json::<Person>(r#"{"Age": {"filterType": "number", "type": "greaterThanOrEqual", "filter": 18}}"#)?;
//! let names: Vec<&Person> = people.iter().with_filter(&adults).collect();
//!
//! // A whole grid request against an in-memory list
//! let request: GridRequest = serde_json::from_str(body)?;
//! let page = request.apply::<Person, _>(&people)?;
//!
//! // ... or against a database query
//! let rows = request.apply_to_query::<person::Model, _>(person::Entity::find())?.all(&db).await?;
//! ```
//!
//! Filtering runs before sorting, and sorting before pagination.

use sea_orm::{QueryFilter, QueryOrder, QuerySelect};
use std::borrow::Borrow;
use std::marker::PhantomData;

use crate::core::GridEntity;
use crate::errors::{FilterError, Result};
use crate::filtering::{CompiledFilter, FilterCompiler, Predicate, Sorter};
use crate::models::{FilterMap, GridRequest, Pagination, SortModel};

/// Lazy filtering adapter returned by [`GridQueryExt::with_filter`].
pub struct Filtered<I, T> {
    inner: I,
    predicate: Predicate<T>,
    _entity: PhantomData<fn(&T)>,
}

impl<I, T> Iterator for Filtered<I, T>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = &self.predicate;
        self.inner
            .by_ref()
            .find(|item| predicate.test(<I::Item as Borrow<T>>::borrow(item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

/// Grid stages for in-memory query sources.
pub trait GridQueryExt: Iterator + Sized {
    /// Keep items matching `filter`. Lazy; nothing is evaluated until the
    /// result is iterated.
    fn with_filter<T>(self, filter: &CompiledFilter<T>) -> Filtered<Self, T>
    where
        Self::Item: Borrow<T>,
    {
        Filtered {
            inner: self,
            predicate: filter.predicate().clone(),
            _entity: PhantomData,
        }
    }

    /// Collect and stably sort the items.
    fn with_sorting<T>(self, sorter: &Sorter<T>) -> std::vec::IntoIter<Self::Item>
    where
        Self::Item: Borrow<T>,
    {
        let mut items: Vec<Self::Item> = self.collect();
        sorter.sort(&mut items);
        items.into_iter()
    }

    /// Keep the rows of the pagination window.
    fn with_pagination(
        self,
        pagination: &Pagination,
    ) -> std::iter::Take<std::iter::Skip<Self>> {
        pagination.window(self)
    }
}

impl<I: Iterator> GridQueryExt for I {}

/// Compile a JSON filter map for `T` with the process-wide case settings.
/// `null` compiles to a filter matching everything.
///
/// # Errors
///
/// Returns [`FilterError::InvalidJson`] for malformed JSON and any compile
/// error of [`FilterCompiler::compile`].
pub fn filter_from_json<T: GridEntity>(json: &str) -> Result<CompiledFilter<T>> {
    let filters: Option<FilterMap> =
        serde_json::from_str(json).map_err(|e| FilterError::invalid_json("filter", &e))?;
    FilterCompiler::new().compile(&filters.unwrap_or_default())
}

/// Compile a JSON sort list for `T`. `null` yields an empty sorter.
///
/// # Errors
///
/// Returns [`FilterError::InvalidJson`] for malformed JSON.
pub fn sorting_from_json<T: GridEntity>(json: &str) -> Result<Sorter<T>> {
    let sorts: Option<Vec<SortModel>> =
        serde_json::from_str(json).map_err(|e| FilterError::invalid_json("sort", &e))?;
    Ok(Sorter::compile(&sorts.unwrap_or_default()))
}

/// Parse a JSON pagination window. `null` yields `None`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidJson`] for malformed JSON.
pub fn pagination_from_json(json: &str) -> Result<Option<Pagination>> {
    serde_json::from_str(json).map_err(|e| FilterError::invalid_json("pagination", &e))
}

impl GridRequest {
    /// Parse a whole grid request.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidJson`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FilterError::invalid_json("grid request", &e))
    }

    fn compile_filter<T: GridEntity>(&self, compiler: &FilterCompiler) -> Result<CompiledFilter<T>> {
        match &self.filter {
            Some(filters) => compiler.compile(filters),
            None => Ok(CompiledFilter::always()),
        }
    }

    /// Filter, sort and paginate an in-memory source.
    ///
    /// # Errors
    ///
    /// Returns any compile error of the filter map.
    pub fn apply<T, I>(&self, items: I) -> Result<Vec<I::Item>>
    where
        T: GridEntity,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.apply_with(&FilterCompiler::new(), items)
    }

    /// [`GridRequest::apply`] with an explicit compiler.
    ///
    /// # Errors
    ///
    /// Returns any compile error of the filter map.
    pub fn apply_with<T, I>(&self, compiler: &FilterCompiler, items: I) -> Result<Vec<I::Item>>
    where
        T: GridEntity,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let filter = self.compile_filter::<T>(compiler)?;
        let sorter = Sorter::<T>::compile(&self.sort);

        let sorted = items.into_iter().with_filter(&filter).with_sorting(&sorter);
        let rows = match &self.pagination {
            Some(pagination) => sorted.with_pagination(pagination).collect(),
            None => sorted.collect(),
        };
        Ok(rows)
    }

    /// Translate the request onto a deferred sea-orm query.
    ///
    /// # Errors
    ///
    /// Returns any compile error of the filter map.
    pub fn apply_to_query<T, Q>(&self, query: Q) -> Result<Q>
    where
        T: GridEntity,
        Q: QueryFilter + QueryOrder + QuerySelect,
    {
        self.apply_to_query_with::<T, Q>(&FilterCompiler::new(), query)
    }

    /// [`GridRequest::apply_to_query`] with an explicit compiler.
    ///
    /// # Errors
    ///
    /// Returns any compile error of the filter map.
    pub fn apply_to_query_with<T, Q>(&self, compiler: &FilterCompiler, query: Q) -> Result<Q>
    where
        T: GridEntity,
        Q: QueryFilter + QueryOrder + QuerySelect,
    {
        let filter = self.compile_filter::<T>(compiler)?;
        let mut query = query.filter(filter.condition().clone());

        for (column, order) in Sorter::<T>::compile(&self.sort).order_by() {
            query = query.order_by(column, order);
        }
        if let Some(pagination) = &self.pagination {
            query = query.offset(pagination.offset()).limit(pagination.limit());
        }
        Ok(query)
    }
}
