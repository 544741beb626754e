use std::cmp::Ordering;
use std::collections::HashSet;

use proptest::prelude::*;

use monitor_stats::ranking::order::compare_names;
use monitor_stats::source::memory::StaticCountSource;
use monitor_stats::{
    rank_records, CountRecord, Entity, FormFilter, GroupingDimension, PageRequest, RankedPage,
    Ranker, StatsError,
};

fn build_records(raw: Vec<(String, u64)>) -> Vec<CountRecord> {
    // Ids are positional so duplicates never reach the ranker
    raw.into_iter()
        .enumerate()
        .map(|(idx, (name, count))| CountRecord::new(Entity::new(format!("E{idx}"), name), count))
        .collect()
}

fn records_strategy() -> impl Strategy<Value = Vec<CountRecord>> {
    // Small count range and mixed-case names so ties are common
    prop::collection::vec(("[a-dA-D]{1,3}", 0u64..4), 0..60).prop_map(build_records)
}

fn all_pages(records: &[CountRecord], page_size: i64) -> Vec<RankedPage> {
    let first = rank_records(records.to_vec(), PageRequest::new(1, page_size)).unwrap();
    let mut pages = vec![first.clone()];
    for page in 2..=first.total_pages as i64 {
        pages.push(rank_records(records.to_vec(), PageRequest::new(page, page_size)).unwrap());
    }
    pages
}

proptest! {
    #[test]
    fn ranking_is_deterministic_under_input_order(records in records_strategy(), page_size in 1i64..10) {
        let mut reversed = records.clone();
        reversed.reverse();
        let a = rank_records(records, PageRequest::new(1, page_size)).unwrap();
        let b = rank_records(reversed, PageRequest::new(1, page_size)).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn adjacent_items_follow_total_order(records in records_strategy()) {
        let page = rank_records(records, PageRequest::new(1, 100)).unwrap();
        for pair in page.items.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                prop_assert_ne!(
                    compare_names(&pair[0].entity_name, &pair[1].entity_name),
                    Ordering::Greater
                );
            }
        }
    }

    #[test]
    fn pages_cover_every_entity_once(records in records_strategy(), page_size in 1i64..8) {
        let full = rank_records(records.clone(), PageRequest::new(1, records.len().max(1) as i64)).unwrap();
        let pages = all_pages(&records, page_size);

        let concatenated: Vec<_> = pages.iter().flat_map(|p| p.items.clone()).collect();
        prop_assert_eq!(&concatenated, &full.items);

        let ids: HashSet<_> = concatenated.iter().map(|i| i.entity_id.clone()).collect();
        prop_assert_eq!(ids.len(), records.len());

        let ranks: Vec<_> = concatenated.iter().map(|i| i.rank).collect();
        prop_assert_eq!(ranks, (1..=records.len()).collect::<Vec<_>>());
    }

    #[test]
    fn past_end_keeps_totals(records in records_strategy(), page_size in 1i64..8) {
        let first = rank_records(records.clone(), PageRequest::new(1, page_size)).unwrap();
        let beyond = rank_records(records, PageRequest::new(first.total_pages as i64 + 5, page_size)).unwrap();
        prop_assert!(beyond.items.is_empty());
        prop_assert_eq!(beyond.total_items, first.total_items);
        prop_assert_eq!(beyond.total_pages, first.total_pages);
    }
}

#[test]
fn three_county_example() {
    let records = vec![
        CountRecord::new(Entity::new("B", "CountyB"), 10),
        CountRecord::new(Entity::new("C", "CountyC"), 3),
        CountRecord::new(Entity::new("A", "CountyA"), 10),
    ];
    let page = rank_records(records, PageRequest::new(1, 2)).unwrap();

    let items: Vec<_> = page
        .items
        .iter()
        .map(|i| (i.entity_name.as_str(), i.count, i.rank))
        .collect();
    assert_eq!(items, vec![("CountyA", 10, 1), ("CountyB", 10, 2)]);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn resolved_defaults() {
    assert_eq!(PageRequest::resolve(Some(0), Some(0)), PageRequest::new(1, 5));
    assert_eq!(PageRequest::resolve(Some(3), Some(0)), PageRequest::new(3, 5));
    assert_eq!(PageRequest::resolve(Some(0), Some(20)), PageRequest::new(1, 20));
}

#[tokio::test]
async fn empty_source_gives_empty_page() {
    let ranker = Ranker::new(StaticCountSource::new());
    let page = ranker
        .rank(GroupingDimension::PollingStation, &FormFilter::new(Some("C")), PageRequest::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn negative_page_size_is_invalid() {
    let ranker = Ranker::new(StaticCountSource::new());
    let result = ranker
        .rank(GroupingDimension::County, &FormFilter::all(), PageRequest::resolve(Some(1), Some(-1)))
        .await;
    assert!(matches!(result, Err(StatsError::InvalidParameter { .. })));
}

#[tokio::test]
async fn large_station_sets_rank_fully() {
    let records: Vec<_> = (0..20_000u64)
        .map(|n| CountRecord::new(Entity::new(format!("S{n}"), format!("Sectia {n}")), n % 97))
        .collect();
    let ranker = Ranker::new(StaticCountSource::new().with(
        GroupingDimension::PollingStation,
        FormFilter::all(),
        records,
    ));
    let page = ranker
        .rank(GroupingDimension::PollingStation, &FormFilter::all(), PageRequest::new(4000, 5))
        .await
        .unwrap();
    assert_eq!(page.total_items, 20_000);
    assert_eq!(page.total_pages, 4000);
    assert_eq!(page.items.len(), 5);
    assert!(page.items.iter().all(|i| i.count == 0));
    assert_eq!(page.items.last().map(|i| i.rank), Some(20_000));
}
