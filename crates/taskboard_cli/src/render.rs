use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::config::Palette;
use taskboard_core::model::SurfaceId;
use taskboard_core::view::RenderedItem;

pub const EMPTY_SURFACE_MESSAGE: &str = "No tasks here ✨";

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "task")]
    task: String,
    #[tabled(rename = "done")]
    done: &'static str,
    #[tabled(rename = "delete")]
    delete: &'static str,
}

pub fn surface_title(surface: SurfaceId) -> String {
    match surface {
        SurfaceId::All => "All Tasks".to_string(),
        SurfaceId::Upcoming => "Upcoming Deadlines".to_string(),
        SurfaceId::Section(section) => {
            let name = section.as_str();
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

pub fn surface_table(surface: SurfaceId, items: &[RenderedItem], palette: &Palette) -> String {
    let title = palette.accent(&surface_title(surface));
    if items.is_empty() {
        return format!("{title}\n{}", palette.muted(EMPTY_SURFACE_MESSAGE));
    }

    let rows = items.iter().map(|item| ItemRow {
        id: item.task_id.to_string(),
        task: if item.struck {
            palette.muted(&item.label)
        } else {
            item.label.clone()
        },
        done: if item.struck { "✅" } else { "" },
        delete: if item.delete_control { "❌" } else { "" },
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{title}\n{table}")
}

pub fn surface_json(surface: SurfaceId, items: &[RenderedItem]) -> serde_json::Value {
    let items: Vec<_> = items
        .iter()
        .map(|item| {
            serde_json::json!({
                "id": item.task_id.to_string(),
                "label": item.label,
                "completed": item.struck,
                "delete_control": item.delete_control,
            })
        })
        .collect();
    serde_json::json!({
        "surface": surface.as_str(),
        "items": items,
    })
}
