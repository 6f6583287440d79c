use crate::highlight::highlight_segments;
use crate::{AppState, Category, MessageId, PanelAnchor, PanelPhase, Role, SnippetSegment};

pub const NO_MESSAGES_NOTICE: &str = "No messages found";

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub phase: PanelPhase,
    pub tabs: Vec<TabView>,
    pub active_category: Category,
    pub search_text: String,
    pub placeholder: &'static str,
    pub width: f64,
    pub height: f64,
    pub anchor: PanelAnchor,
    pub resizing: bool,
    pub list: ListView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub category: Category,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Rows(Vec<RowView>),
    /// Same notice whether the tab or the search term emptied the list.
    Empty { notice: &'static str },
}

impl ListView {
    pub fn rows(&self) -> &[RowView] {
        match self {
            ListView::Rows(rows) => rows,
            ListView::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: MessageId,
    pub role: Role,
    pub badge: &'static str,
    pub segments: Vec<SnippetSegment>,
}

impl PanelView {
    pub(crate) fn build(state: &AppState) -> Self {
        let filter = state.filter();
        let active_category = filter.category();
        let needle = filter.needle();
        let rows: Vec<RowView> = filter
            .apply(state.messages())
            .into_iter()
            .map(|message| RowView {
                id: message.id.clone(),
                role: message.role,
                badge: message.role.badge(),
                segments: highlight_segments(&message.snippet, needle.as_deref()),
            })
            .collect();
        let list = if rows.is_empty() {
            ListView::Empty {
                notice: NO_MESSAGES_NOTICE,
            }
        } else {
            ListView::Rows(rows)
        };
        let (width, height) = state.panel_size();

        Self {
            phase: state.phase(),
            tabs: Category::TABS
                .iter()
                .map(|&category| TabView {
                    category,
                    label: category.label(),
                    active: category == active_category,
                })
                .collect(),
            active_category,
            search_text: filter.search_term().to_string(),
            placeholder: active_category.placeholder(),
            width,
            height,
            anchor: state.anchor(),
            resizing: state.is_resizing(),
            list,
            dirty: state.is_dirty(),
        }
    }
}
