use crate::error::Result;
use crate::models::{FormFilter, GroupingDimension, Metric, PageRequest, RankedPage};
use crate::ranking::Ranker;
use crate::source::CountSource;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// Counting-protocol form; the opening stage has no dedicated form by default
pub const COUNTING_FORM: &str = "C";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStage {
    Opening,
    Counting,
}

/// Form filter applied by the stage reports. Opening reports count every
/// form unless an opening form code is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageForms {
    pub opening: FormFilter,
    pub counting: FormFilter,
}

impl Default for StageForms {
    fn default() -> Self {
        Self {
            opening: FormFilter::all(),
            counting: FormFilter::new(Some(COUNTING_FORM)),
        }
    }
}

impl StageForms {
    pub fn form(&self, stage: IncidentStage) -> FormFilter {
        match stage {
            IncidentStage::Opening => self.opening.clone(),
            IncidentStage::Counting => self.counting.clone(),
        }
    }
}

/// The rankings offered to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    // Counties by registered observers
    ObserverCount,
    // Incidents grouped and filtered as requested
    Incidents {
        dimension: GroupingDimension,
        form: FormFilter,
    },
    IncidentsByCounty,
    IncidentsByStation,
    OpeningByCounty,
    OpeningByStation,
    CountingByCounty,
    CountingByStation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub metric: Metric,
    pub dimension: GroupingDimension,
    pub form: FormFilter,
}

impl Report {
    pub fn query(&self, forms: &StageForms) -> ReportQuery {
        use GroupingDimension::{County, PollingStation};
        use IncidentStage::{Counting, Opening};

        let (metric, dimension, form) = match self {
            Report::ObserverCount => (Metric::Observers, County, FormFilter::all()),
            Report::Incidents { dimension, form } => (Metric::Incidents, *dimension, form.clone()),
            Report::IncidentsByCounty => (Metric::Incidents, County, FormFilter::all()),
            Report::IncidentsByStation => (Metric::Incidents, PollingStation, FormFilter::all()),
            Report::OpeningByCounty => (Metric::Incidents, County, forms.form(Opening)),
            Report::OpeningByStation => (Metric::Incidents, PollingStation, forms.form(Opening)),
            Report::CountingByCounty => (Metric::Incidents, County, forms.form(Counting)),
            Report::CountingByStation => (Metric::Incidents, PollingStation, forms.form(Counting)),
        };
        ReportQuery {
            metric,
            dimension,
            form,
        }
    }
}

/// Runs catalog reports against one count source per metric.
pub struct Reports {
    observers: Ranker<Arc<dyn CountSource>>,
    incidents: Ranker<Arc<dyn CountSource>>,
    forms: StageForms,
}

impl Reports {
    pub fn new(
        observers: Arc<dyn CountSource>,
        incidents: Arc<dyn CountSource>,
        fetch_timeout: Option<Duration>,
    ) -> Self {
        let ranker = |source: Arc<dyn CountSource>| match fetch_timeout {
            Some(timeout) => Ranker::new(source).with_fetch_timeout(timeout),
            None => Ranker::new(source),
        };
        Self {
            observers: ranker(observers),
            incidents: ranker(incidents),
            forms: StageForms::default(),
        }
    }

    pub fn with_stage_forms(mut self, forms: StageForms) -> Self {
        self.forms = forms;
        self
    }

    // Resolve raw paging input, then rank
    pub async fn run(
        &self,
        report: &Report,
        raw_page: Option<i64>,
        raw_page_size: Option<i64>,
    ) -> Result<RankedPage> {
        let query = report.query(&self.forms);
        let page = PageRequest::resolve(raw_page, raw_page_size);
        info!(
            "Running {:?}: {:?} by {} for {} (page {}, size {})",
            report, query.metric, query.dimension, query.form, page.page, page.page_size
        );

        let ranker = match query.metric {
            Metric::Observers => &self.observers,
            Metric::Incidents => &self.incidents,
        };
        ranker.rank(query.dimension, &query.form, page).await
    }
}
