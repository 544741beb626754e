use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use monitor_stats::models::{FormFilter, GroupingDimension};
use monitor_stats::reports::Report;

/// Rankings of counties and polling stations by observer coverage and
/// incident reports.
#[derive(Debug, Parser)]
#[command(name = "monitor-stats", disable_help_subcommand = true)]
pub struct Args {
    #[command(subcommand)]
    pub report: ReportArg,

    #[command(flatten)]
    pub paging: Paging,

    /// Re-run the report every SECS seconds instead of once.
    #[arg(long, global = true, value_name = "SECS")]
    pub watch: Option<u64>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct Paging {
    /// Page number; 0 or omitted means the first page.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub page: Option<i64>,
    /// Rows per page; 0 or omitted means 5.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Grouping {
    County,
    Station,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportArg {
    /// Counties by registered observers
    Observers,
    /// Incidents by the chosen grouping, optionally for one form
    Incidents {
        #[arg(long, value_enum, default_value = "county")]
        group: Grouping,
        /// Form code; empty or omitted counts all forms.
        #[arg(long)]
        form: Option<String>,
    },
    IncidentsByCounty,
    IncidentsByStation,
    OpeningByCounty,
    OpeningByStation,
    CountingByCounty,
    CountingByStation,
}

impl From<&ReportArg> for Report {
    fn from(arg: &ReportArg) -> Self {
        match arg {
            ReportArg::Observers => Report::ObserverCount,
            ReportArg::Incidents { group, form } => Report::Incidents {
                dimension: match group {
                    Grouping::County => GroupingDimension::County,
                    Grouping::Station => GroupingDimension::PollingStation,
                },
                form: FormFilter::new(form.as_deref()),
            },
            ReportArg::IncidentsByCounty => Report::IncidentsByCounty,
            ReportArg::IncidentsByStation => Report::IncidentsByStation,
            ReportArg::OpeningByCounty => Report::OpeningByCounty,
            ReportArg::OpeningByStation => Report::OpeningByStation,
            ReportArg::CountingByCounty => Report::CountingByCounty,
            ReportArg::CountingByStation => Report::CountingByStation,
        }
    }
}
