use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use overlay_logging::{overlay_debug, overlay_warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::{
    make_snippet, ConfigError, ExtractError, ExtractedMessage, ExtractorConfig, Role, RoleSource,
};

/// Elements whose text is never visible.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub trait Extractor {
    /// Messages in document order. Never fails as a whole; bad elements are skipped.
    fn extract(&self, document: &Html) -> Vec<ExtractedMessage>;
}

/// Extractor driven by the attribute and markup markers of an [`ExtractorConfig`].
///
/// Role inference, in order:
/// - the explicit role attribute on the message element
/// - indicator markup inside the message, when it points at exactly one role
/// - alternation by position among all message elements (even: user, odd: assistant).
///   This last step is a best-effort guess and can misclassify.
#[derive(Debug)]
pub struct MessageExtractor {
    config: ExtractorConfig,
    message_selector: Selector,
    user_indicators: Vec<Selector>,
    assistant_indicators: Vec<Selector>,
    chrome: Vec<Selector>,
}

impl MessageExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        let message_selector = compile(&format!("[{}]", config.id_attribute))?;
        let user_indicators = compile_all(&config.user_indicators)?;
        let assistant_indicators = compile_all(&config.assistant_indicators)?;
        let chrome = compile_all(&config.chrome_selectors)?;
        Ok(Self {
            config,
            message_selector,
            user_indicators,
            assistant_indicators,
            chrome,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn extract_one(
        &self,
        element: ElementRef<'_>,
        index: usize,
        seen: &HashSet<String>,
    ) -> Result<Option<ExtractedMessage>, ExtractError> {
        let id = element
            .value()
            .attr(&self.config.id_attribute)
            .map(str::trim)
            .unwrap_or_default();
        if id.is_empty() {
            return Err(ExtractError::MissingId);
        }
        if seen.contains(id) {
            return Err(ExtractError::DuplicateId(id.to_string()));
        }

        let (role, role_source) = self.infer_role(element, index)?;
        let raw_text = self.visible_text(element);
        if raw_text.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExtractedMessage {
            id: id.to_string(),
            role,
            role_source,
            normalized_text: raw_text.to_lowercase(),
            snippet: make_snippet(&raw_text),
            raw_text,
            node: element.id(),
        }))
    }

    fn infer_role(
        &self,
        element: ElementRef<'_>,
        index: usize,
    ) -> Result<(Role, RoleSource), ExtractError> {
        if let Some(value) = element.value().attr(&self.config.role_attribute) {
            if !value.trim().is_empty() {
                return Role::parse(value)
                    .map(|role| (role, RoleSource::Attribute))
                    .ok_or_else(|| ExtractError::UnsupportedRole(value.trim().to_string()));
            }
        }

        let user = matches_any(element, &self.user_indicators);
        let assistant = matches_any(element, &self.assistant_indicators);
        match (user, assistant) {
            (true, false) => Ok((Role::User, RoleSource::Markup)),
            (false, true) => Ok((Role::Assistant, RoleSource::Markup)),
            _ => Ok((Role::by_position(index), RoleSource::Position)),
        }
    }

    /// Text content as if chrome sub-elements had been removed from a copy of the subtree.
    fn visible_text(&self, element: ElementRef<'_>) -> String {
        let chrome: HashSet<NodeId> = self
            .chrome
            .iter()
            .flat_map(|selector| element.select(selector))
            .map(|found| found.id())
            .filter(|id| *id != element.id())
            .collect();
        let mut text = TextCollector::default();
        collect_text(*element, &chrome, &mut text);
        text.finish()
    }
}

impl Extractor for MessageExtractor {
    fn extract(&self, document: &Html) -> Vec<ExtractedMessage> {
        let mut seen = HashSet::new();
        let mut messages = Vec::new();
        for (index, element) in document.select(&self.message_selector).enumerate() {
            match self.extract_one(element, index, &seen) {
                Ok(Some(message)) => {
                    seen.insert(message.id.clone());
                    messages.push(message);
                }
                Ok(None) => overlay_debug!("Message element #{} has no visible text", index),
                Err(err) => overlay_warn!("Skipping message element #{}: {}", index, err),
            }
        }
        overlay_debug!("Extracted {} messages", messages.len());
        messages
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|err| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{err:?}"),
    })
}

fn compile_all(selectors: &[String]) -> Result<Vec<Selector>, ConfigError> {
    selectors.iter().map(|selector| compile(selector)).collect()
}

fn matches_any(element: ElementRef<'_>, selectors: &[Selector]) -> bool {
    selectors
        .iter()
        .any(|selector| element.select(selector).next().is_some())
}

fn collect_text(node: NodeRef<'_, Node>, chrome: &HashSet<NodeId>, out: &mut TextCollector) {
    for child in node.children() {
        if chrome.contains(&child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.append(text),
            Node::Element(element) if NON_CONTENT_TAGS.contains(&element.name()) => {}
            Node::Element(_) => collect_text(child, chrome, out),
            _ => {}
        }
    }
}

/// Accumulates text with runs of whitespace collapsed to one space.
#[derive(Default)]
struct TextCollector {
    text: String,
    pending_space: bool,
}

impl TextCollector {
    fn append(&mut self, fragment: &str) {
        for ch in fragment.chars() {
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.text.is_empty() {
                self.text.push(' ');
            }
            self.pending_space = false;
            self.text.push(ch);
        }
    }

    fn finish(self) -> String {
        self.text
    }
}
