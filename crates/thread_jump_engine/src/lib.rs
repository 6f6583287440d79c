//! Thread jump engine: host-page access, extraction, scrolling and settings storage.
mod changes;
mod config;
mod decode;
mod document;
mod extract;
mod layout;
mod origin;
mod scroll;
mod settings;
mod snippet;
mod types;

pub use changes::{ChangeFeed, ChangeSink, ChannelChangeSink, DocumentChange, SubscriptionId};
pub use config::ExtractorConfig;
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use document::ConversationPage;
pub use extract::{Extractor, MessageExtractor};
pub use layout::{LayoutMetrics, PageLayout, ScrollCommand};
pub use origin::{origin_key, origin_store_filename};
pub use scroll::{
    can_scroll, find_scroll_root, scroll_candidates, scroll_to_element, ElementRect, Overflow,
    ScrollBehavior, ScrollOutcome, ScrollRoot, ScrollSurface,
};
pub use settings::{
    load_settings, save_settings, ExtensionStorage, FallbackStore, MemoryStore, OriginLocalStore,
    PanelSettings, SettingValues, SettingsError, SettingsStore, PANEL_HEIGHT_KEY, PANEL_WIDTH_KEY,
};
pub use snippet::{make_snippet, ELLIPSIS, SNIPPET_CHARS};
pub use types::{ConfigError, ExtractError, ExtractedMessage, NodeHandle, Role, RoleSource};
