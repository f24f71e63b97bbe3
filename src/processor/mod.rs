//! The functional core: formatting and indenting event commands.
pub mod formatter;
pub mod indent;
pub mod move_route;
pub mod params;
pub mod render;

use crate::model::{MapEvents, ProcessedProject, RenderedPage};
use anyhow::{Result, anyhow};
use log::info;

/// Which events/pages to render; `None` means all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    pub event: Option<u32>,
    /// 1-based page number.
    pub page: Option<usize>,
}

/// Render every selected page and return a read-only structure for writers.
pub fn run(map: &MapEvents, sel: Selection) -> Result<ProcessedProject> {
    let mut pages = Vec::new();

    for event in &map.events {
        if sel.event.is_some_and(|id| id != event.id) {
            continue;
        }
        for (i, page) in event.pages.iter().enumerate() {
            let number = i + 1;
            if sel.page.is_some_and(|p| p != number) {
                continue;
            }
            pages.push(RenderedPage {
                event_id: event.id,
                event_name: event.name.clone(),
                page: number,
                rows: render::render_list(page.list.as_slice()),
                list: page.list.clone(),
            });
        }
    }

    if pages.is_empty() && (sel.event.is_some() || sel.page.is_some()) {
        return Err(anyhow!(
            "no page matches event {:?} / page {:?}",
            sel.event,
            sel.page
        ));
    }

    info!("rendered {} page(s)", pages.len());
    Ok(ProcessedProject { pages })
}
