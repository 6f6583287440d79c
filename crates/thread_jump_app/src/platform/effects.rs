use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{anyhow, Context};
use overlay_logging::{overlay_debug, overlay_info, overlay_warn};
use thread_jump_core::{Effect, MessageEntry, MessageId, Msg, Role};
use thread_jump_engine::{
    scroll_to_element, ConversationPage, ExtractedMessage, Extractor, LayoutMetrics,
    MessageExtractor, NodeHandle, PageLayout, ScrollOutcome, SettingsStore,
};

use super::persistence;
use super::ui::overlay::OverlayDom;

/// The loaded conversation page with its layout and the last extraction's node map.
pub struct PageHost {
    source: Option<PathBuf>,
    charset: Option<String>,
    page: ConversationPage,
    layout: PageLayout,
    metrics: LayoutMetrics,
    extractor: MessageExtractor,
    nodes: HashMap<MessageId, NodeHandle>,
}

impl PageHost {
    pub fn load(
        path: PathBuf,
        charset: Option<String>,
        extractor: MessageExtractor,
        metrics: LayoutMetrics,
    ) -> anyhow::Result<Self> {
        let page = read_page(&path, charset.as_deref())?;
        overlay_info!("Loaded {:?} as {}", path, page.encoding_label());
        let layout = PageLayout::compute(page.html(), metrics);
        Ok(Self {
            source: Some(path),
            charset,
            page,
            layout,
            metrics,
            extractor,
            nodes: HashMap::new(),
        })
    }

    pub fn from_markup(markup: &str, extractor: MessageExtractor, metrics: LayoutMetrics) -> Self {
        let page = ConversationPage::parse(markup);
        let layout = PageLayout::compute(page.html(), metrics);
        Self {
            source: None,
            charset: None,
            page,
            layout,
            metrics,
            extractor,
            nodes: HashMap::new(),
        }
    }

    /// Re-reads the page from disk. Node handles from earlier passes become invalid.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let path = self
            .source
            .clone()
            .ok_or_else(|| anyhow!("page was not loaded from a file"))?;
        let page = read_page(&path, self.charset.as_deref())?;
        self.replace_page(page);
        Ok(())
    }

    pub fn replace_page(&mut self, page: ConversationPage) {
        self.layout = PageLayout::compute(page.html(), self.metrics);
        self.page = page;
        self.nodes.clear();
    }

    #[cfg(test)]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn node_of(&self, id: &MessageId) -> Option<NodeHandle> {
        self.nodes.get(id).copied()
    }

    /// Extracts messages and remembers where each one lives in the page.
    pub fn rescan(&mut self) -> Vec<MessageEntry> {
        let extracted = self.extractor.extract(self.page.html());
        self.nodes = extracted
            .iter()
            .map(|message| (MessageId::new(message.id.clone()), message.node))
            .collect();
        extracted.into_iter().map(to_entry).collect()
    }

    pub fn scroll_to(&mut self, id: &MessageId) -> Option<ScrollOutcome<NodeHandle>> {
        let node = self.node_of(id)?;
        Some(scroll_to_element(&mut self.layout, node))
    }
}

fn read_page(path: &Path, charset: Option<&str>) -> anyhow::Result<ConversationPage> {
    let bytes = fs::read(path).with_context(|| format!("reading page {:?}", path))?;
    ConversationPage::from_bytes(&bytes, charset).with_context(|| format!("decoding page {:?}", path))
}

fn to_entry(message: ExtractedMessage) -> MessageEntry {
    MessageEntry {
        id: MessageId::new(message.id),
        role: map_role(message.role),
        normalized_text: message.normalized_text,
        snippet: message.snippet,
    }
}

fn map_role(role: thread_jump_engine::Role) -> Role {
    match role {
        thread_jump_engine::Role::User => Role::User,
        thread_jump_engine::Role::Assistant => Role::Assistant,
    }
}

/// Executes core effects against the page, the overlay nodes and the settings store.
///
/// Effects that produce an answer post it as a [`Msg`] on the session channel.
pub struct EffectRunner {
    host: PageHost,
    overlay: OverlayDom,
    store: Box<dyn SettingsStore>,
    msg_tx: mpsc::Sender<Msg>,
    frame_requested: bool,
}

impl EffectRunner {
    pub fn new(host: PageHost, store: Box<dyn SettingsStore>, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            host,
            overlay: OverlayDom::default(),
            store,
            msg_tx,
            frame_requested: false,
        }
    }

    #[cfg(test)]
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut PageHost {
        &mut self.host
    }

    pub fn overlay(&self) -> &OverlayDom {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayDom {
        &mut self.overlay
    }

    /// Consumes the pending frame request, if any.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            overlay_debug!("Effect {:?}", effect);
            match effect {
                Effect::LoadSettings => {
                    let geometry = persistence::load_geometry(self.store.as_ref());
                    self.post(Msg::SettingsLoaded(geometry));
                }
                Effect::BuildPanel { geometry } => self.overlay.build_panel(geometry),
                Effect::ShowPanel => self.set_panel_visible(true),
                Effect::HidePanel => self.set_panel_visible(false),
                Effect::RescanMessages => {
                    let messages = self.host.rescan();
                    self.post(Msg::MessagesExtracted(messages));
                }
                Effect::RequestAnimationFrame => self.frame_requested = true,
                Effect::FocusSearch => {
                    if !self.overlay.focus_search() {
                        overlay_debug!("No visible search box to focus");
                    }
                }
                Effect::ScrollToMessage { id } => match self.host.scroll_to(&id) {
                    Some(outcome) => {
                        overlay_info!("Jumped to {} ({:?} at {:.0})", id, outcome.root, outcome.top)
                    }
                    None => overlay_warn!("Message {} is no longer on the page", id),
                },
                Effect::SuspendPagePointerEvents => {
                    self.overlay.set_page_pointer_events_suspended(true)
                }
                Effect::RestorePagePointerEvents => {
                    self.overlay.set_page_pointer_events_suspended(false)
                }
                Effect::PersistGeometry(geometry) => {
                    self.overlay.set_panel_geometry(geometry);
                    persistence::save_geometry(self.store.as_mut(), geometry);
                }
                Effect::RemoveOverlay => {
                    self.overlay.remove_all();
                    self.frame_requested = false;
                }
            }
        }
    }

    fn set_panel_visible(&mut self, visible: bool) {
        if !self.overlay.set_panel_visible(visible) {
            overlay_debug!("No panel to {}", if visible { "show" } else { "hide" });
        }
    }

    fn post(&self, msg: Msg) {
        // The session owns the receiver for as long as this runner exists.
        let _ = self.msg_tx.send(msg);
    }
}
