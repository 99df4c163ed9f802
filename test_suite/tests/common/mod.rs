#![allow(dead_code)]

use gridcrate::{CompiledFilter, FilterCompiler, FilterMap, GridEntity, Result};
use std::sync::Arc;

pub mod customer;
pub mod person_entity;
pub mod sample_entity;

pub use customer::{Address, Customer};
pub use sample_entity::{TestEntity, sample, with_strings};

/// Parse a JSON filter map, panicking on malformed test input.
pub fn filters(value: serde_json::Value) -> FilterMap {
    serde_json::from_value(value).expect("test filter map should deserialize")
}

/// A compiler with empty case settings, independent of whatever is installed
/// process-wide.
pub fn compiler() -> FilterCompiler {
    FilterCompiler::with_settings(Arc::default())
}

pub fn compile<T: GridEntity>(value: serde_json::Value) -> Result<CompiledFilter<T>> {
    compiler().compile(&filters(value))
}

pub fn select<'a, T: GridEntity>(items: &'a [T], filter: &CompiledFilter<T>) -> Vec<&'a T> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Route tracing output through the test writer. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gridcrate=debug")),
        )
        .with_test_writer()
        .try_init();
}
