use super::{RenderedItem, Surfaces};
use crate::model::{SurfaceId, TaskId};
use std::collections::BTreeMap;

/// In-process surfaces: one ordered item list per surface.
#[derive(Debug, Default, Clone)]
pub struct MemorySurfaces {
    lists: BTreeMap<SurfaceId, Vec<RenderedItem>>,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self, surface: SurfaceId) -> &[RenderedItem] {
        self.lists.get(&surface).map(Vec::as_slice).unwrap_or_default()
    }

    fn item_mut(&mut self, surface: SurfaceId, task_id: TaskId) -> Option<&mut RenderedItem> {
        self.lists
            .get_mut(&surface)?
            .iter_mut()
            .find(|item| item.task_id == task_id)
    }
}

impl Surfaces for MemorySurfaces {
    fn insert(&mut self, surface: SurfaceId, item: RenderedItem) {
        self.lists.entry(surface).or_default().push(item);
    }

    fn relabel(&mut self, surface: SurfaceId, task_id: TaskId, label: &str) {
        if let Some(item) = self.item_mut(surface, task_id) {
            item.label = label.to_string();
        }
    }

    fn strike(&mut self, surface: SurfaceId, task_id: TaskId) {
        if let Some(item) = self.item_mut(surface, task_id) {
            item.struck = true;
        }
    }

    fn attach_delete_control(&mut self, surface: SurfaceId, task_id: TaskId) {
        if let Some(item) = self.item_mut(surface, task_id) {
            item.delete_control = true;
        }
    }

    fn remove(&mut self, surface: SurfaceId, task_id: TaskId) {
        if let Some(items) = self.lists.get_mut(&surface) {
            items.retain(|item| item.task_id != task_id);
        }
    }

    fn has_items(&self, surface: SurfaceId) -> bool {
        !self.items(surface).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySurfaces;
    use crate::model::{SurfaceId, TaskId};
    use crate::view::{RenderedItem, Surfaces};

    fn item(sequence: u64, label: &str) -> RenderedItem {
        RenderedItem {
            task_id: TaskId::new(sequence),
            label: label.to_string(),
            struck: false,
            delete_control: false,
        }
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut surfaces = MemorySurfaces::new();
        surfaces.insert(SurfaceId::All, item(2, "b"));
        surfaces.insert(SurfaceId::All, item(1, "a"));

        let labels: Vec<_> = surfaces
            .items(SurfaceId::All)
            .iter()
            .map(|item| item.label.as_str())
            .collect();
        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn operations_on_missing_items_are_ignored() {
        let mut surfaces = MemorySurfaces::new();
        surfaces.relabel(SurfaceId::All, TaskId::new(1), "x");
        surfaces.strike(SurfaceId::All, TaskId::new(1));
        surfaces.remove(SurfaceId::Upcoming, TaskId::new(1));

        assert!(!surfaces.has_items(SurfaceId::All));
        assert!(surfaces.items(SurfaceId::Upcoming).is_empty());
    }

    #[test]
    fn relabel_and_remove_target_one_surface() {
        let mut surfaces = MemorySurfaces::new();
        surfaces.insert(SurfaceId::All, item(1, "old"));
        surfaces.insert(SurfaceId::Upcoming, item(1, "old"));

        surfaces.relabel(SurfaceId::All, TaskId::new(1), "new");
        surfaces.remove(SurfaceId::Upcoming, TaskId::new(1));

        assert_eq!(surfaces.items(SurfaceId::All)[0].label, "new");
        assert!(!surfaces.has_items(SurfaceId::Upcoming));
    }
}
