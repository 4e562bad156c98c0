use crate::error::AppError;
use crate::model::Task;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "TASKBOARD_DISABLE_NOTIFICATIONS";
const APP_NAME: &str = "taskboard";

/// Out-of-band alert raised when a task's deadline elapses.
pub trait Notifier {
    fn notify(&self, task: &Task) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _task: &Task) -> Result<(), AppError> {
        Ok(())
    }
}

/// Picks the platform notifier when `enabled`, unless the environment
/// disables notifications. Unsupported platforms get a no-op notifier.
pub fn notifier_for(enabled: bool) -> Result<Box<dyn Notifier>, AppError> {
    if !enabled || std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

pub fn deadline_message(task: &Task) -> String {
    if task.completed {
        format!("Deadline passed for completed task: {} ({})", task.text, task.id)
    } else {
        format!("Deadline passed: {} ({})", task.text, task.id)
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
