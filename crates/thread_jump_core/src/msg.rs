use crate::{Category, MessageEntry, MessageId, PanelGeometry, PanelRect, Point, Viewport};

/// Where a pointer press landed, as far as outside-click dismissal cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Panel,
    ToggleButton,
    Page,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User clicked the floating toggle control.
    ToggleClicked,
    /// Open the panel regardless of its current state.
    OpenRequested,
    /// Close the panel if it is open.
    CloseRequested,
    /// Stored panel size arrived (or defaults after a failed read).
    SettingsLoaded(PanelGeometry),
    /// Escape key pressed anywhere on the page.
    EscapePressed,
    /// Pointer pressed somewhere on the page.
    PointerDown { target: PointerTarget },
    /// One animation frame has elapsed since the last request.
    AnimationFrame,
    /// User picked a tab.
    TabSelected(Category),
    /// User edited the search box.
    SearchChanged(String),
    /// The host page reported a content change.
    DocumentChanged,
    /// Result of an extraction pass, in document order.
    MessagesExtracted(Vec<MessageEntry>),
    /// User clicked a result row.
    RowClicked(MessageId),
    /// Pointer pressed inside the resize affordance.
    ResizeStarted { pointer: Point, panel: PanelRect },
    /// Pointer moved while a resize drag may be active.
    ResizeMoved { pointer: Point, viewport: Viewport },
    /// Pointer released.
    ResizeEnded,
    /// Remove the overlay from the page.
    Teardown,
}
