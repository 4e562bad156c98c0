use super::{APP_NAME, Notifier, deadline_message};
use crate::error::AppError;
use crate::model::Task;
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, task: &Task) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(APP_NAME)
            .text1(&deadline_message(task))
            .text2(&task.id.to_string())
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
