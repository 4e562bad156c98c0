//! Rendered copies of tasks and the index that keeps them in step with the
//! registry.
//!
//! A task can be shown on several surfaces at once ("all", its section and
//! sometimes "upcoming"). Copies never own task data: each one carries the
//! task id, and the synchronizer's index maps an id back to every surface
//! holding a copy so that completion, relabelling and deletion fan out to all
//! of them.

use crate::model::{SurfaceId, Task, TaskId};
use std::collections::HashMap;

mod memory;

pub use memory::MemorySurfaces;

/// One rendered copy of a task on a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub task_id: TaskId,
    pub label: String,
    pub struck: bool,
    pub delete_control: bool,
}

/// Display capability required from whatever shows the surfaces.
pub trait Surfaces {
    fn insert(&mut self, surface: SurfaceId, item: RenderedItem);

    fn relabel(&mut self, surface: SurfaceId, task_id: TaskId, label: &str);

    fn strike(&mut self, surface: SurfaceId, task_id: TaskId);

    fn attach_delete_control(&mut self, surface: SurfaceId, task_id: TaskId);

    fn remove(&mut self, surface: SurfaceId, task_id: TaskId);

    fn has_items(&self, surface: SurfaceId) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CopyHandle {
    surface: SurfaceId,
    delete_control: bool,
}

pub struct ViewSynchronizer<S> {
    surfaces: S,
    copies: HashMap<TaskId, Vec<CopyHandle>>,
}

impl<S: Surfaces> ViewSynchronizer<S> {
    pub fn new(surfaces: S) -> Self {
        Self {
            surfaces,
            copies: HashMap::new(),
        }
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    /// Renders `task` onto `surface` with `label`. A surface holds at most one
    /// copy of a task; returns `false` when the copy already exists.
    pub fn render_copy(&mut self, surface: SurfaceId, task: &Task, label: String) -> bool {
        if self.has_copy(surface, task.id) {
            return false;
        }

        self.surfaces.insert(
            surface,
            RenderedItem {
                task_id: task.id,
                label,
                struck: task.completed,
                delete_control: false,
            },
        );
        self.copies.entry(task.id).or_default().push(CopyHandle {
            surface,
            delete_control: false,
        });
        tracing::debug!(task_id = %task.id, %surface, "rendered copy");
        true
    }

    pub fn has_copy(&self, surface: SurfaceId, task_id: TaskId) -> bool {
        self.handle(surface, task_id).is_some()
    }

    /// Surfaces currently holding a copy of `task_id`, in render order.
    pub fn surfaces_of(&self, task_id: TaskId) -> Vec<SurfaceId> {
        self.copies
            .get(&task_id)
            .map(|handles| handles.iter().map(|handle| handle.surface).collect())
            .unwrap_or_default()
    }

    pub fn strike_all(&mut self, task_id: TaskId) {
        for surface in self.surfaces_of(task_id) {
            self.surfaces.strike(surface, task_id);
        }
    }

    pub fn relabel_all(&mut self, task_id: TaskId, label: &str) {
        for surface in self.surfaces_of(task_id) {
            self.surfaces.relabel(surface, task_id, label);
        }
    }

    /// Attaches a delete control to the copy on `surface` unless it already
    /// has one. Returns `false` when there is no such copy.
    pub fn attach_delete_control(&mut self, surface: SurfaceId, task_id: TaskId) -> bool {
        let Some(handle) = self.handle_mut(surface, task_id) else {
            return false;
        };
        if !handle.delete_control {
            handle.delete_control = true;
            self.surfaces.attach_delete_control(surface, task_id);
        }
        true
    }

    pub fn has_delete_control(&self, surface: SurfaceId, task_id: TaskId) -> bool {
        self.handle(surface, task_id)
            .is_some_and(|handle| handle.delete_control)
    }

    pub fn remove_copy(&mut self, surface: SurfaceId, task_id: TaskId) -> bool {
        let Some(handles) = self.copies.get_mut(&task_id) else {
            return false;
        };
        let before = handles.len();
        handles.retain(|handle| handle.surface != surface);
        let removed = handles.len() != before;
        if handles.is_empty() {
            self.copies.remove(&task_id);
        }
        if removed {
            self.surfaces.remove(surface, task_id);
        }
        removed
    }

    /// Drops every copy of `task_id` and forgets it from the index.
    pub fn remove_all(&mut self, task_id: TaskId) {
        if let Some(handles) = self.copies.remove(&task_id) {
            for handle in handles {
                self.surfaces.remove(handle.surface, task_id);
            }
        }
    }

    pub fn has_items(&self, surface: SurfaceId) -> bool {
        self.surfaces.has_items(surface)
    }

    fn handle(&self, surface: SurfaceId, task_id: TaskId) -> Option<&CopyHandle> {
        self.copies
            .get(&task_id)?
            .iter()
            .find(|handle| handle.surface == surface)
    }

    fn handle_mut(&mut self, surface: SurfaceId, task_id: TaskId) -> Option<&mut CopyHandle> {
        self.copies
            .get_mut(&task_id)?
            .iter_mut()
            .find(|handle| handle.surface == surface)
    }
}
