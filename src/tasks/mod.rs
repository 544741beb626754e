pub mod cache_sweeper;
