use thread_jump_core::{
    HorizontalAnchor, ListView, PanelPhase, PanelView, RowView, VerticalAnchor, Viewport,
};

use super::constants::*;
use super::overlay::OverlayDom;

/// Text rendition of the overlay, one entry per output line.
pub fn render(view: &PanelView, overlay: &OverlayDom, viewport: Viewport) -> Vec<String> {
    if !overlay.has_toggle() {
        return vec!["(overlay removed)".to_string()];
    }
    let mut lines = Vec::new();

    match view.phase {
        PanelPhase::Absent => lines.push(format!("{TOGGLE_LABEL} panel not built")),
        PanelPhase::Loading => lines.push(format!("{TOGGLE_LABEL} loading panel settings...")),
        PanelPhase::Hidden => lines.push(format!("{TOGGLE_LABEL} panel hidden")),
        PanelPhase::Visible => {
            let rect = view.anchor.place(view.width, view.height, viewport);
            lines.push(format!(
                "{PANEL_TITLE}  {:.0}x{:.0} at ({:.0}, {:.0}) pinned {}{}",
                view.width,
                view.height,
                rect.left,
                rect.top,
                describe_anchor(view),
                if view.resizing || overlay.page_pointer_events_suspended() {
                    "  (resizing)"
                } else {
                    ""
                },
            ));
            lines.push(render_tabs(view));
            lines.push(render_search(view, overlay));
            match &view.list {
                ListView::Rows(rows) => lines.extend(
                    rows.iter()
                        .enumerate()
                        .map(|(index, row)| render_row(index + 1, row)),
                ),
                ListView::Empty { notice } => lines.push(format!("    {notice}")),
            }
            lines.push(format!("{:>width$}", RESIZE_HANDLE, width = 4));
        }
    }
    lines
}

fn render_tabs(view: &PanelView) -> String {
    view.tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("[{}]", tab.label)
            } else {
                format!(" {} ", tab.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_search(view: &PanelView, overlay: &OverlayDom) -> String {
    let focused = overlay
        .panel()
        .map(|panel| panel.search_focused)
        .unwrap_or(false);
    let cursor = if focused { "_" } else { "" };
    if view.search_text.is_empty() {
        format!("Search: {cursor}({})", view.placeholder)
    } else {
        format!("Search: {}{cursor}", view.search_text)
    }
}

fn render_row(number: usize, row: &RowView) -> String {
    let snippet: String = row
        .segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                format!("{HIGHLIGHT_START}{}{HIGHLIGHT_END}", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect();
    format!("{number:>3}. {} {snippet}", row.badge)
}

fn describe_anchor(view: &PanelView) -> String {
    let horizontal = match view.anchor.horizontal {
        HorizontalAnchor::Left(offset) => format!("left {offset:.0}"),
        HorizontalAnchor::Right(offset) => format!("right {offset:.0}"),
    };
    let vertical = match view.anchor.vertical {
        VerticalAnchor::Top(offset) => format!("top {offset:.0}"),
        VerticalAnchor::Bottom(offset) => format!("bottom {offset:.0}"),
    };
    format!("{horizontal} / {vertical}")
}
