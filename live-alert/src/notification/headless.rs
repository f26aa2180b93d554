use super::{AlertText, Notifier};
use crate::error::AlertError;

/// Headless backend: writes the notification to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, text: &AlertText) -> Result<(), AlertError> {
        tracing::info!(body = %text.body, "{}", text.summary);
        Ok(())
    }
}
