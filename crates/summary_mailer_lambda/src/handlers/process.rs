use tracing::{error, info, warn};

use crate::adapters::notification::{MailEnvelope, NotificationChannel, OutboundMessage};
use crate::adapters::record_store::RecordStore;
use crate::adapters::secondary::SecondaryNotifier;
use crate::runtime::contract::{
    ProcessError, ProcessingOutcome, ProcessingSummary, RecordReport,
};
use crate::runtime::record::MeetingRecord;
use crate::runtime::render::render_notification;

const COMPONENT: &str = "record_processor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub envelope: MailEnvelope,
    pub subject_prefix: String,
}

/// Runs one pass over every unprocessed record.
///
/// Records are handled strictly in store order. A delivery failure skips the
/// rest of that record's pipeline; a secondary-notify failure does not stop
/// acknowledgement. Only a failed initial fetch is returned as an error.
pub fn process_pending(
    config: &ProcessorConfig,
    store: &impl RecordStore,
    channel: &impl NotificationChannel,
    notifier: &impl SecondaryNotifier,
) -> Result<ProcessingSummary, ProcessError> {
    info!(component = COMPONENT, event = "fetch_started");
    let records = store.fetch_pending().map_err(|source| {
        let error = ProcessError::FetchFailed {
            cause: source.to_string(),
        };
        error!(component = COMPONENT, event = "fetch_failed", error = %error);
        error
    })?;
    info!(
        component = COMPONENT,
        event = "fetch_completed",
        pending = records.len()
    );

    let mut summary = ProcessingSummary::default();
    for record in &records {
        summary.push(process_record(config, record, store, channel, notifier));
    }

    info!(
        component = COMPONENT,
        event = "invocation_completed",
        total = summary.total,
        succeeded = summary.succeeded,
    );
    Ok(summary)
}

fn process_record(
    config: &ProcessorConfig,
    record: &MeetingRecord,
    store: &impl RecordStore,
    channel: &impl NotificationChannel,
    notifier: &impl SecondaryNotifier,
) -> RecordReport {
    let record_id = record.id.as_str();
    let mut errors = Vec::new();

    let notification = render_notification(record, &config.subject_prefix);
    let message = OutboundMessage {
        envelope: &config.envelope,
        notification: &notification,
    };

    if let Err(source) = channel.send(&message) {
        let failure = ProcessError::DeliveryFailed {
            record_id: record_id.to_string(),
            cause: source.to_string(),
        };
        error!(
            component = COMPONENT,
            event = "delivery_failed",
            record_id,
            error = %failure,
        );
        errors.push(failure);
        return RecordReport {
            record_id: record_id.to_string(),
            outcome: ProcessingOutcome::DeliveryFailed,
            errors,
        };
    }
    info!(component = COMPONENT, event = "record_delivered", record_id);

    let mut outcome = ProcessingOutcome::Delivered;
    if let Err(source) = notifier.notify(record_id) {
        let failure = ProcessError::NotifyFailed {
            record_id: record_id.to_string(),
            cause: source.to_string(),
        };
        warn!(
            component = COMPONENT,
            event = "notify_failed",
            record_id,
            error = %failure,
        );
        errors.push(failure);
        outcome = ProcessingOutcome::NotifyFailed;
    }

    match store.mark_processed(record_id) {
        Ok(()) => {
            info!(component = COMPONENT, event = "record_processed", record_id);
        }
        Err(source) => {
            let failure = ProcessError::AcknowledgeFailed {
                record_id: record_id.to_string(),
                cause: source.to_string(),
            };
            error!(
                component = COMPONENT,
                event = "acknowledge_failed",
                record_id,
                error = %failure,
            );
            errors.push(failure);
            outcome = ProcessingOutcome::AcknowledgeFailed;
        }
    }

    RecordReport {
        record_id: record_id.to_string(),
        outcome,
        errors,
    }
}
