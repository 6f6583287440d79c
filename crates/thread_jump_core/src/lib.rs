//! Thread jump core: pure panel state machine, filtering and view-model helpers.
mod effect;
mod filter;
mod geometry;
mod highlight;
mod message;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{filter_by_category, filter_by_term, normalize_term, Category, FilterState};
pub use geometry::{
    clamp_extent, HorizontalAnchor, PanelAnchor, PanelGeometry, PanelRect, Point, ResizeDrag,
    VerticalAnchor, Viewport, CORNER_HIT_ZONE, DEFAULT_BOTTOM_OFFSET, DEFAULT_PANEL_HEIGHT,
    DEFAULT_PANEL_WIDTH, DEFAULT_RIGHT_OFFSET, MAX_VIEWPORT_FRACTION, MIN_PANEL_EXTENT,
};
pub use highlight::{find_case_insensitive, highlight_segments, SnippetSegment};
pub use message::{MessageEntry, MessageId, Role};
pub use msg::{Msg, PointerTarget};
pub use state::{AppState, PanelPhase};
pub use update::update;
pub use view_model::{ListView, PanelView, RowView, TabView, NO_MESSAGES_NOTICE};
