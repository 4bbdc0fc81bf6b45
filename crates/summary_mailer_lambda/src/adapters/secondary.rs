use crate::adapters::AdapterError;

pub trait SecondaryNotifier {
    fn notify(&self, record_id: &str) -> Result<(), AdapterError>;
}

/// Stand-in used when no secondary endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl SecondaryNotifier for NoopNotifier {
    fn notify(&self, _record_id: &str) -> Result<(), AdapterError> {
        Ok(())
    }
}
