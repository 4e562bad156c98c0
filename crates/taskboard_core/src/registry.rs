//! Canonical task records keyed by sequential id.

use crate::model::{Section, Task, TaskId};
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, Default)]
pub struct Registry {
    tasks: BTreeMap<TaskId, Task>,
    last_issued: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are never reissued, even after the owning task is deleted.
    fn next_id(&mut self) -> TaskId {
        self.last_issued += 1;
        TaskId::new(self.last_issued)
    }

    /// Inserts a new pending task. Blank text is ignored and returns `None`.
    pub fn create_task(
        &mut self,
        text: &str,
        section: Section,
        deadline: Option<OffsetDateTime>,
    ) -> Option<TaskId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let id = self.next_id();
        self.tasks.insert(
            id,
            Task {
                id,
                text: trimmed.to_string(),
                section,
                deadline,
                completed: false,
                handled: false,
            },
        );
        Some(id)
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn get_task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.remove(&id)
    }

    /// Tasks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
