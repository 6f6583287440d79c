pub const PANEL_TITLE: &str = "Thread Jump";
pub const TOGGLE_LABEL: &str = "[≡ Jump]";
pub const HIGHLIGHT_START: &str = "**";
pub const HIGHLIGHT_END: &str = "**";
pub const RESIZE_HANDLE: &str = "◢";
pub const PROMPT_HINT: &str = "Commands: toggle open close esc frame tab <all|user|ai> search <text> click <row> outside drag <dx> <dy> reload reinit show help quit";
