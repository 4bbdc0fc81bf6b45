use crate::adapters::AdapterError;
use crate::runtime::record::{CreatedRecord, MeetingRecord, NewRecord};

pub trait RecordStore {
    /// Every record whose processed flag is false, in store order. Paging is
    /// the implementation's concern.
    fn fetch_pending(&self) -> Result<Vec<MeetingRecord>, AdapterError>;

    fn mark_processed(&self, record_id: &str) -> Result<(), AdapterError>;

    fn create_record(&self, record: &NewRecord) -> Result<CreatedRecord, AdapterError>;
}
