use crate::error::Result;
use crate::models::{CountRecord, FormFilter, GroupingDimension};
use crate::source::CountSource;
use async_trait::async_trait;
use std::collections::HashMap;

/// Count source backed by fixed, prebuilt record lists.
#[derive(Debug, Clone, Default)]
pub struct StaticCountSource {
    records: HashMap<(GroupingDimension, FormFilter), Vec<CountRecord>>,
}

impl StaticCountSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        dimension: GroupingDimension,
        form: FormFilter,
        records: Vec<CountRecord>,
    ) -> Self {
        self.records.insert((dimension, form), records);
        self
    }
}

#[async_trait]
impl CountSource for StaticCountSource {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>> {
        Ok(self
            .records
            .get(&(dimension, form.clone()))
            .cloned()
            .unwrap_or_default())
    }
}
