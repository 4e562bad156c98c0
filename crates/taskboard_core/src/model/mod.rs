pub mod task;

pub use task::{Section, SurfaceId, Task, TaskId};
