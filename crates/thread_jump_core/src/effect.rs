use crate::{MessageId, PanelGeometry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the stored panel size; answer with `Msg::SettingsLoaded`.
    LoadSettings,
    /// Create the panel nodes with the given size.
    BuildPanel { geometry: PanelGeometry },
    ShowPanel,
    HidePanel,
    /// Run the extractor; answer with `Msg::MessagesExtracted`.
    RescanMessages,
    /// Deliver `Msg::AnimationFrame` after the next frame.
    RequestAnimationFrame,
    FocusSearch,
    ScrollToMessage { id: MessageId },
    SuspendPagePointerEvents,
    RestorePagePointerEvents,
    PersistGeometry(PanelGeometry),
    RemoveOverlay,
}
