use crate::view_model::PanelView;
use crate::{Category, FilterState, MessageEntry, MessageId, PanelAnchor, PanelGeometry, ResizeDrag};

/// Lifecycle of the panel nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// Not built yet.
    #[default]
    Absent,
    /// Waiting for the stored geometry before building.
    Loading,
    Hidden,
    Visible,
}

/// Work deferred to the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PendingFrame {
    focus_search: bool,
    arm_outside_click: bool,
}

impl PendingFrame {
    fn is_empty(&self) -> bool {
        !self.focus_search && !self.arm_outside_click
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: PanelPhase,
    filter: FilterState,
    messages: Vec<MessageEntry>,
    geometry: PanelGeometry,
    anchor: PanelAnchor,
    resize: Option<ResizeDrag>,
    pending_frame: PendingFrame,
    outside_click_armed: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelView {
        PanelView::build(self)
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == PanelPhase::Visible
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    pub fn anchor(&self) -> PanelAnchor {
        self.anchor
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Current panel size, following an active drag.
    pub fn panel_size(&self) -> (f64, f64) {
        match &self.resize {
            Some(drag) => drag.size(),
            None => (
                f64::from(self.geometry.width),
                f64::from(self.geometry.height),
            ),
        }
    }

    pub fn outside_click_armed(&self) -> bool {
        self.outside_click_armed
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn begin_loading(&mut self) {
        self.phase = PanelPhase::Loading;
    }

    pub(crate) fn set_geometry(&mut self, geometry: PanelGeometry) {
        self.geometry = geometry;
        self.mark_dirty();
    }

    pub(crate) fn show(&mut self) {
        self.phase = PanelPhase::Visible;
        self.pending_frame = PendingFrame {
            focus_search: true,
            arm_outside_click: true,
        };
        self.mark_dirty();
    }

    pub(crate) fn hide(&mut self) {
        self.phase = PanelPhase::Hidden;
        self.pending_frame = PendingFrame::default();
        self.outside_click_armed = false;
        self.mark_dirty();
    }

    /// Consumes deferred work; returns whether the search box should take focus.
    pub(crate) fn run_pending_frame(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending_frame);
        if pending.is_empty() || !self.is_visible() {
            return false;
        }
        if pending.arm_outside_click {
            self.outside_click_armed = true;
        }
        pending.focus_search
    }

    pub(crate) fn switch_tab(&mut self, category: Category) {
        self.filter.switch_tab(category);
        self.mark_dirty();
    }

    pub(crate) fn set_search_term(&mut self, term: String) {
        self.filter.set_search_term(term);
        self.mark_dirty();
    }

    pub(crate) fn set_messages(&mut self, messages: Vec<MessageEntry>) {
        if self.messages != messages {
            self.messages = messages;
            self.mark_dirty();
        }
    }

    pub(crate) fn knows_message(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|message| &message.id == id)
    }

    pub(crate) fn resize_mut(&mut self) -> Option<&mut ResizeDrag> {
        self.resize.as_mut()
    }

    pub(crate) fn start_resize(&mut self, drag: ResizeDrag) {
        self.resize = Some(drag);
        self.mark_dirty();
    }

    pub(crate) fn take_resize(&mut self) -> Option<ResizeDrag> {
        let drag = self.resize.take();
        if drag.is_some() {
            self.mark_dirty();
        }
        drag
    }

    pub(crate) fn set_anchor(&mut self, anchor: PanelAnchor) {
        self.anchor = anchor;
    }
}
