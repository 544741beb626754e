//! Ranking engine behind the election-monitoring statistics pages: counties
//! and polling stations ordered by observer coverage or incident reports,
//! one page at a time.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ranking;
pub mod reports;
pub mod source;
pub mod tasks;

pub use error::{Result, StatsError};
pub use models::{CountRecord, Entity, FormFilter, GroupingDimension, Metric, PageRequest, RankedEntry, RankedPage};
pub use ranking::{rank_records, Ranker};
pub use source::{CountSource, ZeroCountPolicy};
