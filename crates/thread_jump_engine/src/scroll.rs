//! Scroll-root detection and centering.
//!
//! Chat pages rarely scroll the window itself; the message list usually lives in some
//! nested container. The navigator walks up from the target, tries each candidate, and
//! centers the target in the first one that actually scrolls.

use std::fmt;

use overlay_logging::overlay_debug;

/// Computed `overflow-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
    Overlay,
}

impl Overflow {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Overflow::Visible),
            "hidden" => Some(Overflow::Hidden),
            "clip" => Some(Overflow::Clip),
            "auto" => Some(Overflow::Auto),
            "scroll" => Some(Overflow::Scroll),
            "overlay" => Some(Overflow::Overlay),
            _ => None,
        }
    }

    /// Whether the user can scroll a box with this overflow.
    pub fn allows_scrolling(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll | Overflow::Overlay)
    }
}

/// Vertical extent of a box, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRoot<N> {
    Window,
    Element(N),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOutcome<N> {
    pub root: ScrollRoot<N>,
    pub top: f64,
}

/// Geometry and scrolling access to a host page.
pub trait ScrollSurface {
    type Node: Copy + Eq + fmt::Debug;

    /// Parent element, `None` at the document root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    /// Well-known page-level containers (main content regions), most specific first.
    fn landmark_containers(&self) -> Vec<Self::Node>;
    /// The element whose scroll offset is the window's.
    fn scrolling_element(&self) -> Option<Self::Node>;
    fn overflow_y(&self, node: Self::Node) -> Overflow;
    fn scroll_top(&self, node: Self::Node) -> f64;
    /// Sets the scroll offset; the surface clamps it like a browser would.
    fn set_scroll_top(&mut self, node: Self::Node, top: f64);
    /// Visible height of the node's scrollport.
    fn client_height(&self, node: Self::Node) -> f64;
    fn rect(&self, node: Self::Node) -> ElementRect;
    fn window_scroll_y(&self) -> f64;
    fn window_height(&self) -> f64;
    fn scroll_to(&mut self, root: ScrollRoot<Self::Node>, top: f64, behavior: ScrollBehavior);
}

/// Ancestors of `target` (nearest first), then landmark containers and the scrolling element.
pub fn scroll_candidates<S: ScrollSurface>(surface: &S, target: S::Node) -> Vec<S::Node> {
    let mut candidates = Vec::new();
    let mut cursor = surface.parent(target);
    while let Some(node) = cursor {
        candidates.push(node);
        cursor = surface.parent(node);
    }
    let fallbacks = surface
        .landmark_containers()
        .into_iter()
        .chain(surface.scrolling_element());
    for node in fallbacks {
        if !candidates.contains(&node) {
            candidates.push(node);
        }
    }
    candidates
}

/// Probes whether `node` really scrolls by nudging its offset one unit.
///
/// Leaves no trace: the original offset is restored before returning.
pub fn can_scroll<S: ScrollSurface>(surface: &mut S, node: S::Node) -> bool {
    let original = surface.scroll_top(node);
    surface.set_scroll_top(node, original + 1.0);
    let mut moved = surface.scroll_top(node) != original;
    if !moved && original > 0.0 {
        // Already at the bottom; try the other direction.
        surface.set_scroll_top(node, original - 1.0);
        moved = surface.scroll_top(node) != original;
    }
    surface.set_scroll_top(node, original);
    moved
}

/// First candidate that is overflow-scrollable and passes [`can_scroll`], else the window.
pub fn find_scroll_root<S: ScrollSurface>(surface: &mut S, target: S::Node) -> ScrollRoot<S::Node> {
    let scrolling_element = surface.scrolling_element();
    for candidate in scroll_candidates(surface, target) {
        if !surface.overflow_y(candidate).allows_scrolling() || !can_scroll(surface, candidate) {
            continue;
        }
        if Some(candidate) == scrolling_element {
            return ScrollRoot::Window;
        }
        return ScrollRoot::Element(candidate);
    }
    ScrollRoot::Window
}

/// Smoothly scrolls `target` to the vertical center of its scroll root.
pub fn scroll_to_element<S: ScrollSurface>(surface: &mut S, target: S::Node) -> ScrollOutcome<S::Node> {
    let root = find_scroll_root(surface, target);
    let target_rect = surface.rect(target);
    let (offset, visible_height) = match root {
        ScrollRoot::Window => (
            target_rect.top + surface.window_scroll_y(),
            surface.window_height(),
        ),
        ScrollRoot::Element(container) => (
            target_rect.top - surface.rect(container).top + surface.scroll_top(container),
            surface.client_height(container),
        ),
    };
    let top = (offset - visible_height / 2.0).max(0.0);
    overlay_debug!("Scrolling {:?} to {:.1} for {:?}", root, top, target);
    surface.scroll_to(root, top, ScrollBehavior::Smooth);
    ScrollOutcome { root, top }
}
