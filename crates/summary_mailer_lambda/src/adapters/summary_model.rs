use crate::adapters::AdapterError;

pub trait SummaryModel {
    /// Sends a single-turn prompt and returns the model's text reply.
    fn complete(&self, prompt: &str) -> Result<String, AdapterError>;
}
