//! The overlay nodes added to the host page: the floating toggle and the panel.

use overlay_logging::overlay_debug;
use thread_jump_core::PanelGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelNode {
    pub visible: bool,
    pub geometry: PanelGeometry,
    pub search_focused: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayDom {
    toggle: bool,
    panel: Option<PanelNode>,
    page_pointer_events_suspended: bool,
}

impl OverlayDom {
    pub fn install_toggle(&mut self) {
        self.toggle = true;
    }

    pub fn has_toggle(&self) -> bool {
        self.toggle
    }

    pub fn panel(&self) -> Option<&PanelNode> {
        self.panel.as_ref()
    }

    /// Creates the panel hidden. An existing panel is replaced.
    pub fn build_panel(&mut self, geometry: PanelGeometry) {
        overlay_debug!("Building panel {}x{}", geometry.width, geometry.height);
        self.panel = Some(PanelNode {
            visible: false,
            geometry,
            search_focused: false,
        });
    }

    /// Returns false when there is no panel to show or hide.
    pub fn set_panel_visible(&mut self, visible: bool) -> bool {
        match self.panel.as_mut() {
            Some(panel) => {
                panel.visible = visible;
                if !visible {
                    panel.search_focused = false;
                }
                true
            }
            None => false,
        }
    }

    pub fn set_panel_geometry(&mut self, geometry: PanelGeometry) {
        if let Some(panel) = self.panel.as_mut() {
            panel.geometry = geometry;
        }
    }

    /// Focus only lands on a visible panel.
    pub fn focus_search(&mut self) -> bool {
        match self.panel.as_mut() {
            Some(panel) if panel.visible => {
                panel.search_focused = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_page_pointer_events_suspended(&mut self, suspended: bool) {
        self.page_pointer_events_suspended = suspended;
    }

    pub fn page_pointer_events_suspended(&self) -> bool {
        self.page_pointer_events_suspended
    }

    /// Removes the toggle and the panel. Safe to call repeatedly.
    pub fn remove_all(&mut self) {
        *self = Self::default();
    }
}
