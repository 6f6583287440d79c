//! A coarse block-flow layout of a parsed page.
//!
//! Every element stacks its children vertically; text contributes whole lines from its
//! character count. Inline `height`, `overflow`, `overflow-y` and `display: none` are
//! honored, which is enough to model pages whose message list lives in a fixed-height
//! scroll container.

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::scroll::{ElementRect, Overflow, ScrollBehavior, ScrollRoot, ScrollSurface};

/// Page-level containers tried after the ancestor chain.
const SCROLL_LANDMARKS: &[&str] = &["main", r#"[role="main"]"#];
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub line_height: f64,
    pub chars_per_line: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            line_height: 20.0,
            chars_per_line: 90,
        }
    }
}

/// A scroll performed through [`ScrollSurface::scroll_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub root: ScrollRoot<NodeId>,
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Copy)]
struct LayoutBox {
    /// Offset from the document top with every scroll offset at zero.
    top: f64,
    height: f64,
    content_height: f64,
    overflow_y: Overflow,
}

#[derive(Debug, Default)]
struct InlineStyle {
    height: Option<f64>,
    overflow_y: Overflow,
    hidden: bool,
}

impl InlineStyle {
    fn parse(style: Option<&str>) -> Self {
        let mut parsed = Self::default();
        for declaration in style.unwrap_or_default().split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            match property.trim().to_ascii_lowercase().as_str() {
                "height" => parsed.height = parse_px(value),
                // `overflow: <x> <y>` or a single value for both axes.
                "overflow" => {
                    if let Some(overflow) = value.split_whitespace().last().and_then(Overflow::parse)
                    {
                        parsed.overflow_y = overflow;
                    }
                }
                "overflow-y" => {
                    if let Some(overflow) = Overflow::parse(value) {
                        parsed.overflow_y = overflow;
                    }
                }
                "display" => parsed.hidden = value.trim().eq_ignore_ascii_case("none"),
                _ => {}
            }
        }
        parsed
    }
}

fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|px| px.is_finite() && *px >= 0.0)
}

fn visible_chars(text: &str) -> usize {
    let words: Vec<usize> = text.split_whitespace().map(|w| w.chars().count()).collect();
    if words.is_empty() {
        0
    } else {
        words.iter().sum::<usize>() + words.len() - 1
    }
}

/// Layout plus live scroll state for one page.
#[derive(Debug)]
pub struct PageLayout {
    metrics: LayoutMetrics,
    boxes: HashMap<NodeId, LayoutBox>,
    parents: HashMap<NodeId, NodeId>,
    root: NodeId,
    landmarks: Vec<NodeId>,
    scroll_offsets: HashMap<NodeId, f64>,
    window_scroll_y: f64,
    history: Vec<ScrollCommand>,
}

impl PageLayout {
    pub fn compute(document: &Html, metrics: LayoutMetrics) -> Self {
        let root = document.root_element();
        let landmarks = SCROLL_LANDMARKS
            .iter()
            .filter_map(|selector| Selector::parse(selector).ok())
            .flat_map(|selector| {
                document
                    .select(&selector)
                    .map(|element| element.id())
                    .collect::<Vec<_>>()
            })
            .collect();
        let mut layout = Self {
            metrics,
            boxes: HashMap::new(),
            parents: HashMap::new(),
            root: root.id(),
            landmarks,
            scroll_offsets: HashMap::new(),
            window_scroll_y: 0.0,
            history: Vec::new(),
        };
        layout.place(root, 0.0, None);
        layout
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn document_height(&self) -> f64 {
        self.boxes
            .get(&self.root)
            .map(|root| root.height)
            .unwrap_or_default()
    }

    /// Current offset of an element scroll container (the window's for the root).
    pub fn scroll_offset(&self, node: NodeId) -> f64 {
        self.scroll_top(node)
    }

    pub fn history(&self) -> &[ScrollCommand] {
        &self.history
    }

    fn place(&mut self, element: ElementRef<'_>, top: f64, parent: Option<NodeId>) -> f64 {
        if let Some(parent) = parent {
            self.parents.insert(element.id(), parent);
        }
        let style = InlineStyle::parse(element.value().attr("style"));
        if style.hidden || SKIPPED_TAGS.contains(&element.value().name()) {
            self.boxes.insert(
                element.id(),
                LayoutBox {
                    top,
                    height: 0.0,
                    content_height: 0.0,
                    overflow_y: Overflow::Visible,
                },
            );
            return 0.0;
        }

        let mut cursor = top;
        let mut pending_chars = 0;
        for child in element.children() {
            match child.value() {
                Node::Text(text) => pending_chars += visible_chars(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        cursor += self.text_height(std::mem::take(&mut pending_chars));
                        cursor += self.place(child, cursor, Some(element.id()));
                    }
                }
                _ => {}
            }
        }
        cursor += self.text_height(pending_chars);

        let content_height = cursor - top;
        let height = style.height.unwrap_or(content_height);
        self.boxes.insert(
            element.id(),
            LayoutBox {
                top,
                height,
                content_height,
                overflow_y: style.overflow_y,
            },
        );
        height
    }

    fn text_height(&self, chars: usize) -> f64 {
        if chars == 0 {
            return 0.0;
        }
        let per_line = self.metrics.chars_per_line.max(1);
        chars.div_ceil(per_line) as f64 * self.metrics.line_height
    }

    fn max_window_scroll(&self) -> f64 {
        (self.document_height() - self.metrics.viewport_height).max(0.0)
    }

    fn set_window_scroll(&mut self, top: f64) {
        self.window_scroll_y = top.clamp(0.0, self.max_window_scroll());
    }
}

impl ScrollSurface for PageLayout {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    fn landmark_containers(&self) -> Vec<NodeId> {
        self.landmarks.clone()
    }

    fn scrolling_element(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn overflow_y(&self, node: NodeId) -> Overflow {
        self.boxes
            .get(&node)
            .map(|layout| layout.overflow_y)
            .unwrap_or_default()
    }

    fn scroll_top(&self, node: NodeId) -> f64 {
        if node == self.root {
            return self.window_scroll_y;
        }
        self.scroll_offsets.get(&node).copied().unwrap_or_default()
    }

    fn set_scroll_top(&mut self, node: NodeId, top: f64) {
        if node == self.root {
            self.set_window_scroll(top);
            return;
        }
        let Some(layout) = self.boxes.get(&node).copied() else {
            return;
        };
        if layout.overflow_y == Overflow::Visible {
            return;
        }
        let max = (layout.content_height - layout.height).max(0.0);
        self.scroll_offsets.insert(node, top.clamp(0.0, max));
    }

    fn client_height(&self, node: NodeId) -> f64 {
        if node == self.root {
            return self.metrics.viewport_height;
        }
        self.boxes
            .get(&node)
            .map(|layout| layout.height)
            .unwrap_or_default()
    }

    fn rect(&self, node: NodeId) -> ElementRect {
        let Some(layout) = self.boxes.get(&node) else {
            return ElementRect::default();
        };
        let mut top = layout.top - self.window_scroll_y;
        let mut cursor = self.parent(node);
        while let Some(ancestor) = cursor {
            if ancestor != self.root {
                top -= self.scroll_offsets.get(&ancestor).copied().unwrap_or_default();
            }
            cursor = self.parent(ancestor);
        }
        ElementRect {
            top,
            height: layout.height,
        }
    }

    fn window_scroll_y(&self) -> f64 {
        self.window_scroll_y
    }

    fn window_height(&self) -> f64 {
        self.metrics.viewport_height
    }

    fn scroll_to(&mut self, root: ScrollRoot<NodeId>, top: f64, behavior: ScrollBehavior) {
        // Animation is not modeled; the final position is applied at once.
        match root {
            ScrollRoot::Window => self.set_window_scroll(top),
            ScrollRoot::Element(node) => self.set_scroll_top(node, top),
        }
        self.history.push(ScrollCommand {
            root,
            top,
            behavior,
        });
    }
}
