use std::cell::Cell;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;
use time::OffsetDateTime;

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, value: OffsetDateTime) {
        self.now.set(value);
    }

    pub fn advance(&self, by: time::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.now.get()
    }
}

/// Sends `event` on `sender` every `interval`, starting one interval from
/// now. The thread exits once the receiving side is dropped.
pub fn spawn_ticker<T>(interval: Duration, sender: Sender<T>, event: T) -> JoinHandle<()>
where
    T: Clone + Send + 'static,
{
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            if sender.send(event.clone()).is_err() {
                tracing::debug!("ticker receiver dropped");
                break;
            }
        }
    })
}
