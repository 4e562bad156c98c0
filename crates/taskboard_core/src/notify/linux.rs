use super::{APP_NAME, Notifier, deadline_message};
use crate::error::AppError;
use crate::model::Task;
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, task: &Task) -> Result<(), AppError> {
        Notification::new()
            .summary(APP_NAME)
            .body(&deadline_message(task))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
