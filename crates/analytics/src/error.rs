use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Row rejected while building the {report} report: {source}")]
    InvalidRow {
        report: &'static str,
        #[source]
        source: CoreError,
    },
}
