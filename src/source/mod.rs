pub mod cache;
pub mod memory;

use crate::error::Result;
use crate::models::{CountRecord, FormFilter, GroupingDimension};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only provider of per-entity counts.
///
/// Implementations return at most one record per entity of the requested
/// dimension, return an empty list when there is no data, and only fail when
/// the underlying store cannot be reached.
#[async_trait]
pub trait CountSource: Send + Sync {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>>;
}

#[async_trait]
impl<T: CountSource + ?Sized> CountSource for Arc<T> {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>> {
        (**self).get_counts(dimension, form).await
    }
}

#[async_trait]
impl<T: CountSource + ?Sized> CountSource for Box<T> {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>> {
        (**self).get_counts(dimension, form).await
    }
}

/// Whether entities with nothing to count show up in results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCountPolicy {
    // Only entities with at least one counted row
    #[default]
    Omit,
    // Every known entity, with 0 where nothing matched
    Include,
}
