use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::models::{CountRecord, Entity, FormFilter, GroupingDimension, Metric};
use crate::source::{CountSource, ZeroCountPolicy};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::{sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow}, Row};

pub struct Database {
    pool: SqlitePool,
    zero_counts: ZeroCountPolicy,
}

impl Database {
    pub async fn connect(config: &Config) -> Result<Self> {
        // The schema belongs to the reporting platform, so only connect
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        info!("Connected to {}", config.database_url);

        Ok(Self::from_pool(pool, config.zero_counts))
    }

    pub fn from_pool(pool: SqlitePool, zero_counts: ZeroCountPolicy) -> Self {
        Self { pool, zero_counts }
    }

    // Count source for one metric, sharing this database's pool
    pub fn counts(&self, metric: Metric) -> SqlCountSource {
        SqlCountSource {
            pool: self.pool.clone(),
            metric,
            zero_counts: self.zero_counts,
        }
    }
}

/// Counts incidents or observers straight from the reporting tables.
///
/// With [`ZeroCountPolicy::Include`] the query starts from the entity table
/// and left-joins the counted rows, so entities without matches come back
/// with a count of 0.
#[derive(Clone)]
pub struct SqlCountSource {
    pool: SqlitePool,
    metric: Metric,
    zero_counts: ZeroCountPolicy,
}

#[async_trait]
impl CountSource for SqlCountSource {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>> {
        if self.metric == Metric::Observers && dimension == GroupingDimension::County && !form.is_all() {
            debug!("Registered observers per county ignore {}", form);
        }

        let sql = count_query(self.metric, dimension, self.zero_counts);
        debug!("Fetching {:?} counts by {} for {}", self.metric, dimension, form);

        let mut query = sqlx::query(sql);
        if binds_form(self.metric, dimension) {
            query = query.bind(form.code()).bind(form.code());
        }

        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(to_record)
            .collect()
    }
}

fn binds_form(metric: Metric, dimension: GroupingDimension) -> bool {
    !(metric == Metric::Observers && dimension == GroupingDimension::County)
}

fn to_record(row: &SqliteRow) -> Result<CountRecord> {
    let id: String = row.try_get("entity_id")?;
    let name: String = row.try_get("entity_name")?;
    let count: i64 = row.try_get("entity_count")?;

    let count = u64::try_from(count).map_err(|_| {
        StatsError::ContractViolation(format!("negative count {} for entity '{}'", count, id))
    })?;

    Ok(CountRecord::new(Entity::new(id, name), count))
}

// Every query yields entity_id, entity_name, entity_count; form filters bind the code twice
fn count_query(metric: Metric, dimension: GroupingDimension, zero_counts: ZeroCountPolicy) -> &'static str {
    use GroupingDimension::{County, PollingStation};
    use ZeroCountPolicy::{Include, Omit};

    match (metric, dimension, zero_counts) {
        (Metric::Incidents, County, Omit) => {
            r#"
            SELECT c.code AS entity_id, c.name AS entity_name, COUNT(i.id) AS entity_count
            FROM incidents i
            JOIN polling_stations ps ON ps.code = i.polling_station_code
            JOIN counties c ON c.code = ps.county_code
            WHERE (? IS NULL OR i.form_code = ?)
            GROUP BY c.code, c.name
            "#
        }
        (Metric::Incidents, County, Include) => {
            r#"
            SELECT c.code AS entity_id, c.name AS entity_name, COUNT(i.id) AS entity_count
            FROM counties c
            LEFT JOIN polling_stations ps ON ps.county_code = c.code
            LEFT JOIN incidents i ON i.polling_station_code = ps.code
                AND (? IS NULL OR i.form_code = ?)
            GROUP BY c.code, c.name
            "#
        }
        (Metric::Incidents, PollingStation, Omit) => {
            r#"
            SELECT ps.code AS entity_id, ps.name AS entity_name, COUNT(i.id) AS entity_count
            FROM incidents i
            JOIN polling_stations ps ON ps.code = i.polling_station_code
            WHERE (? IS NULL OR i.form_code = ?)
            GROUP BY ps.code, ps.name
            "#
        }
        (Metric::Incidents, PollingStation, Include) => {
            r#"
            SELECT ps.code AS entity_id, ps.name AS entity_name, COUNT(i.id) AS entity_count
            FROM polling_stations ps
            LEFT JOIN incidents i ON i.polling_station_code = ps.code
                AND (? IS NULL OR i.form_code = ?)
            GROUP BY ps.code, ps.name
            "#
        }
        (Metric::Observers, County, Omit) => {
            r#"
            SELECT c.code AS entity_id, c.name AS entity_name, COUNT(o.id) AS entity_count
            FROM observers o
            JOIN counties c ON c.code = o.county_code
            GROUP BY c.code, c.name
            "#
        }
        (Metric::Observers, County, Include) => {
            r#"
            SELECT c.code AS entity_id, c.name AS entity_name, COUNT(o.id) AS entity_count
            FROM counties c
            LEFT JOIN observers o ON o.county_code = c.code
            GROUP BY c.code, c.name
            "#
        }
        (Metric::Observers, PollingStation, Omit) => {
            r#"
            SELECT ps.code AS entity_id, ps.name AS entity_name, COUNT(DISTINCT i.observer_id) AS entity_count
            FROM incidents i
            JOIN polling_stations ps ON ps.code = i.polling_station_code
            WHERE (? IS NULL OR i.form_code = ?)
            GROUP BY ps.code, ps.name
            "#
        }
        (Metric::Observers, PollingStation, Include) => {
            r#"
            SELECT ps.code AS entity_id, ps.name AS entity_name, COUNT(DISTINCT i.observer_id) AS entity_count
            FROM polling_stations ps
            LEFT JOIN incidents i ON i.polling_station_code = ps.code
                AND (? IS NULL OR i.form_code = ?)
            GROUP BY ps.code, ps.name
            "#
        }
    }
}
