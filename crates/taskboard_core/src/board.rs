//! The single owned state object: registry plus rendered views.
//!
//! Every mutation goes through `Board`, which updates the canonical record in
//! the registry first and then fans the change out to the rendered copies.
//! Operations on ids that no longer exist are no-ops reported as `None` or
//! `false`.

use crate::config::{Config, DEFAULT_UPCOMING_WINDOW_HOURS};
use crate::deadline::{compose_display_text, parse_deadline, within_window};
use crate::model::{Section, SurfaceId, Task, TaskId};
use crate::registry::Registry;
use crate::view::{Surfaces, ViewSynchronizer};
use time::{Duration, OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub offset: UtcOffset,
    pub default_section: Section,
    pub upcoming_window: Duration,
}

impl BoardSettings {
    pub fn from_config(config: &Config, offset: UtcOffset) -> Self {
        Self {
            offset,
            default_section: config.default_section.unwrap_or_default(),
            upcoming_window: Duration::hours(config.upcoming_window_hours()),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            offset: UtcOffset::UTC,
            default_section: Section::default(),
            upcoming_window: Duration::hours(DEFAULT_UPCOMING_WINDOW_HOURS),
        }
    }
}

pub struct Board<S> {
    registry: Registry,
    views: ViewSynchronizer<S>,
    settings: BoardSettings,
}

impl<S: Surfaces> Board<S> {
    pub fn new(surfaces: S, settings: BoardSettings) -> Self {
        Self {
            registry: Registry::new(),
            views: ViewSynchronizer::new(surfaces),
            settings,
        }
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn surfaces(&self) -> &S {
        self.views.surfaces()
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.registry.get_task(id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.registry.iter()
    }

    /// Surfaces holding a copy of `id`, in render order.
    pub fn copies_of(&self, id: TaskId) -> Vec<SurfaceId> {
        self.views.surfaces_of(id)
    }

    pub fn has_items(&self, surface: SurfaceId) -> bool {
        self.views.has_items(surface)
    }

    /// Creates a task and renders it into "all", its section and, when the
    /// deadline falls inside the upcoming window, "upcoming".
    ///
    /// An unparseable `deadline` means the task has no deadline. Blank text is
    /// ignored.
    pub fn add_task(
        &mut self,
        text: &str,
        section: Option<Section>,
        deadline: Option<&str>,
        now: OffsetDateTime,
    ) -> Option<TaskId> {
        let section = section.unwrap_or(self.settings.default_section);
        let deadline = deadline.and_then(|raw| parse_deadline(raw, self.settings.offset));
        let id = self.registry.create_task(text, section, deadline)?;

        self.render(SurfaceId::All, id);
        self.render(SurfaceId::Section(section), id);
        if deadline.is_some_and(|value| self.in_upcoming_window(value, now)) {
            self.render(SurfaceId::Upcoming, id);
        }

        tracing::info!(task_id = %id, %section, has_deadline = deadline.is_some(), "task created");
        Some(id)
    }

    /// Marks the task completed and strikes through every copy of it.
    pub fn complete_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.registry.get_task_mut(id) else {
            return false;
        };
        task.completed = true;
        self.views.strike_all(id);
        tracing::info!(task_id = %id, "task completed");
        true
    }

    /// Secondary activation on the copy shown on `surface`. Only completed
    /// tasks get a delete control; returns whether the copy now has one.
    pub fn reveal_delete(&mut self, surface: SurfaceId, id: TaskId) -> bool {
        match self.registry.get_task(id) {
            Some(task) if task.completed => self.views.attach_delete_control(surface, id),
            _ => false,
        }
    }

    /// Activates the delete control on the copy shown on `surface`.
    pub fn activate_delete(&mut self, surface: SurfaceId, id: TaskId) -> Option<Task> {
        if !self.views.has_delete_control(surface, id) {
            return None;
        }
        self.delete_task(id)
    }

    /// Removes the task from the registry and every surface.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        self.views.remove_all(id);
        let removed = self.registry.delete_task(id)?;
        tracing::info!(task_id = %id, "task deleted");
        Some(removed)
    }

    /// Replaces the deadline from user text. Unparseable text leaves the task
    /// untouched and returns `false`.
    pub fn update_deadline(&mut self, id: TaskId, raw: &str, now: OffsetDateTime) -> bool {
        match parse_deadline(raw, self.settings.offset) {
            Some(deadline) => self.set_deadline(id, deadline, now),
            None => {
                tracing::debug!(task_id = %id, input = raw, "ignored unparseable deadline");
                false
            }
        }
    }

    /// Sets a new deadline, clears `handled`, relabels every copy and
    /// re-evaluates the "upcoming" copy.
    pub fn set_deadline(&mut self, id: TaskId, deadline: OffsetDateTime, now: OffsetDateTime) -> bool {
        let Some(task) = self.registry.get_task_mut(id) else {
            return false;
        };
        task.deadline = Some(deadline);
        task.handled = false;

        let label = compose_display_text(task, self.settings.offset);
        self.views.relabel_all(id, &label);

        let upcoming = self.in_upcoming_window(deadline, now);
        let listed = self.views.has_copy(SurfaceId::Upcoming, id);
        if upcoming && !listed {
            self.render(SurfaceId::Upcoming, id);
        } else if !upcoming && listed {
            self.views.remove_copy(SurfaceId::Upcoming, id);
        }

        tracing::info!(task_id = %id, upcoming, "deadline updated");
        true
    }

    /// Sets `handled`; used by the deadline monitor.
    pub(crate) fn mark_handled(&mut self, id: TaskId) -> bool {
        match self.registry.get_task_mut(id) {
            Some(task) => {
                task.handled = true;
                true
            }
            None => false,
        }
    }

    fn in_upcoming_window(&self, deadline: OffsetDateTime, now: OffsetDateTime) -> bool {
        within_window(deadline, now, self.settings.upcoming_window)
    }

    fn render(&mut self, surface: SurfaceId, id: TaskId) {
        if let Some(task) = self.registry.get_task(id) {
            let label = compose_display_text(task, self.settings.offset);
            self.views.render_copy(surface, task, label);
        }
    }
}
