use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FetchFailed,
    DeliveryFailed,
    NotifyFailed,
    AcknowledgeFailed,
}

/// Failure of one step of the processing pipeline.
///
/// Only `FetchFailed` aborts an invocation; the per-record kinds are
/// collected into the summary and processing moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("failed to fetch pending records: {cause}")]
    FetchFailed { cause: String },
    #[error("failed to deliver notification for record {record_id}: {cause}")]
    DeliveryFailed { record_id: String, cause: String },
    #[error("failed to notify secondary service for record {record_id}: {cause}")]
    NotifyFailed { record_id: String, cause: String },
    #[error("failed to mark record {record_id} as processed: {cause}")]
    AcknowledgeFailed { record_id: String, cause: String },
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::DeliveryFailed { .. } => ErrorKind::DeliveryFailed,
            Self::NotifyFailed { .. } => ErrorKind::NotifyFailed,
            Self::AcknowledgeFailed { .. } => ErrorKind::AcknowledgeFailed,
        }
    }

    pub fn cause(&self) -> &str {
        match self {
            Self::FetchFailed { cause }
            | Self::DeliveryFailed { cause, .. }
            | Self::NotifyFailed { cause, .. }
            | Self::AcknowledgeFailed { cause, .. } => cause,
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::FetchFailed { .. } => None,
            Self::DeliveryFailed { record_id, .. }
            | Self::NotifyFailed { record_id, .. }
            | Self::AcknowledgeFailed { record_id, .. } => Some(record_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingOutcome {
    Delivered,
    DeliveryFailed,
    NotifyFailed,
    AcknowledgeFailed,
}

impl ProcessingOutcome {
    /// Whether the record's processed flag was set by this run.
    pub fn is_acknowledged(self) -> bool {
        matches!(self, Self::Delivered | Self::NotifyFailed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub record_id: String,
    pub outcome: ProcessingOutcome,
    /// Every step failure seen for this record, in pipeline order.
    pub errors: Vec<ProcessError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub total: usize,
    pub succeeded: usize,
    pub reports: Vec<RecordReport>,
}

impl ProcessingSummary {
    pub fn push(&mut self, report: RecordReport) {
        self.total += 1;
        if report.outcome.is_acknowledged() {
            self.succeeded += 1;
        }
        self.reports.push(report);
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProcessError> {
        self.reports.iter().flat_map(|report| report.errors.iter())
    }
}

/// Whether per-record failures are echoed in the invocation response or
/// only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureReporting {
    #[default]
    LogsOnly,
    InResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureEntry {
    pub record_id: String,
    pub kind: ErrorKind,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

pub fn success_body(summary: &ProcessingSummary, reporting: FailureReporting) -> SuccessBody {
    let failures = match reporting {
        FailureReporting::LogsOnly => Vec::new(),
        FailureReporting::InResponse => summary
            .failures()
            .map(|error| FailureEntry {
                record_id: error.record_id().unwrap_or_default().to_string(),
                kind: error.kind(),
                details: error.cause().to_string(),
            })
            .collect(),
    };

    SuccessBody {
        message: format!(
            "Processed {} of {} pending records",
            summary.succeeded, summary.total
        ),
        failures,
    }
}

pub fn fetch_error_body(error: &ProcessError) -> ErrorBody {
    ErrorBody::new("Failed to fetch pending records", error.cause())
}
