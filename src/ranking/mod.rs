pub mod order;
pub mod page;

use crate::error::{Result, StatsError};
use crate::models::{CountRecord, FormFilter, GroupingDimension, PageRequest, RankedEntry, RankedPage};
use crate::source::CountSource;
use log::debug;
use page::Window;
use std::collections::HashSet;
use std::time::Duration;

/// Ranks entities of one grouping dimension by the counts a [`CountSource`]
/// reports for them. Holds no state besides its source and is safe to share
/// between concurrent requests.
pub struct Ranker<S> {
    source: S,
    fetch_timeout: Option<Duration>,
}

impl<S: CountSource> Ranker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fetch_timeout: None,
        }
    }

    // Fail the fetch with SourceUnavailable once `timeout` elapses
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn rank(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
        page: PageRequest,
    ) -> Result<RankedPage> {
        // Reject bad paging before touching the source
        Window::validate(page)?;

        let fetch = self.source.get_counts(dimension, form);
        let records = match self.fetch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch).await.map_err(|_| {
                StatsError::SourceUnavailable(format!(
                    "fetching {} counts for {} timed out after {:?}",
                    dimension, form, timeout
                ))
            })??,
            None => fetch.await?,
        };

        debug!(
            "Ranking {} {} records for {} (page {}, size {})",
            records.len(),
            dimension,
            form,
            page.page,
            page.page_size
        );
        rank_records(records, page)
    }
}

/// Orders `records` and cuts out the requested page.
///
/// Ranks are 1-based positions in the full ordering, so equal counts still
/// get consecutive ranks. A page past the end yields no items but keeps the
/// totals, letting callers tell "past the end" apart from an error.
pub fn rank_records(mut records: Vec<CountRecord>, page: PageRequest) -> Result<RankedPage> {
    let window = Window::validate(page)?;
    check_unique(&records)?;

    records.sort_by(order::compare);

    let total_items = records.len();
    let total_pages = window.total_pages(total_items);
    let (start, end) = window.bounds(total_items);

    let items = records
        .drain(start..end)
        .enumerate()
        .map(|(offset, record)| RankedEntry {
            entity_id: record.entity.id,
            entity_name: record.entity.name,
            count: record.count,
            rank: start + offset + 1,
        })
        .collect();

    Ok(RankedPage {
        items,
        total_items,
        total_pages,
        current_page: window.page,
        page_size: window.page_size,
    })
}

fn check_unique(records: &[CountRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.entity.id.as_str()) {
            return Err(StatsError::ContractViolation(format!(
                "entity '{}' reported more than once",
                record.entity.id
            )));
        }
    }
    Ok(())
}
