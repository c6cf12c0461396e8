use std::collections::HashMap;

use ego_tree::NodeId;
use overlay_logging::overlay_warn;
use scraper::{ElementRef, Html, Selector};

use crate::decode::{decode_page, DecodeError};
use crate::dom::{ButtonTemplate, HostDom};

/// Handle to an element of a [`PageDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageNode {
    /// Element parsed from the host page.
    Host(NodeId),
    /// Button added through [`HostDom::append_button`].
    Injected(usize),
}

#[derive(Debug, Clone)]
struct InjectedButton {
    parent: PageNode,
    classes: Vec<String>,
    icon_src: String,
}

/// In-memory host document.
///
/// The parsed `scraper` tree is kept read-only; class, text and display
/// mutations and injected buttons live in side tables keyed by node. Selector
/// matching runs against the parsed tree, so host selectors must not depend
/// on classes the overlay adds.
#[derive(Debug)]
pub struct PageDocument {
    html: Html,
    classes: HashMap<NodeId, Vec<String>>,
    texts: HashMap<PageNode, String>,
    displayed: HashMap<PageNode, bool>,
    injected: HashMap<usize, InjectedButton>,
    next_injected: usize,
    revision: u64,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            classes: HashMap::new(),
            texts: HashMap::new(),
            displayed: HashMap::new(),
            injected: HashMap::new(),
            next_injected: 0,
            revision: 0,
        }
    }

    /// Decodes saved page bytes (see [`decode_page`]) and parses them.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self, DecodeError> {
        let decoded = decode_page(bytes, content_type)?;
        Ok(Self::parse(&decoded.html))
    }

    /// Swaps in a re-rendered page. Every overlay mutation and injected
    /// button is dropped with the old tree; injected handles are never reused.
    pub fn replace_html(&mut self, html: &str) {
        self.html = Html::parse_document(html);
        self.classes.clear();
        self.texts.clear();
        self.displayed.clear();
        self.injected.clear();
        self.revision += 1;
    }

    /// Number of mutations applied since parsing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn injected_buttons(&self) -> Vec<PageNode> {
        let mut ids: Vec<usize> = self.injected.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().map(PageNode::Injected).collect()
    }

    /// `src` of the icon image inside an injected button.
    pub fn button_icon(&self, node: &PageNode) -> Option<&str> {
        match node {
            PageNode::Injected(id) => self.injected.get(id).map(|b| b.icon_src.as_str()),
            PageNode::Host(_) => None,
        }
    }

    /// Effective class list of a node, including overlay changes.
    pub fn classes(&self, node: &PageNode) -> Vec<String> {
        match node {
            PageNode::Host(id) => self.host_classes(*id),
            PageNode::Injected(id) => self
                .injected
                .get(id)
                .map(|b| b.classes.clone())
                .unwrap_or_default(),
        }
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn host_classes(&self, id: NodeId) -> Vec<String> {
        if let Some(classes) = self.classes.get(&id) {
            return classes.clone();
        }
        self.element(id)
            .map(|el| el.value().classes().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn is_within(&self, node: &PageNode, scope: NodeId) -> bool {
        match node {
            PageNode::Host(id) => self
                .html
                .tree
                .get(*id)
                .is_some_and(|n| n.ancestors().any(|a| a.id() == scope)),
            PageNode::Injected(id) => self
                .injected
                .get(id)
                .is_some_and(|b| b.parent == PageNode::Host(scope) || self.is_within(&b.parent, scope)),
        }
    }

    fn injected_matching<'a>(
        &'a self,
        selector: &'a str,
    ) -> impl Iterator<Item = (usize, &'a InjectedButton)> + 'a {
        let mut matching: Vec<(usize, &InjectedButton)> = self
            .injected
            .iter()
            .filter(|(_, button)| matches_button(selector, &button.classes))
            .map(|(id, button)| (*id, button))
            .collect();
        matching.sort_unstable_by_key(|(id, _)| *id);
        matching.into_iter()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Injected buttons only answer compound `button.class` / `.class` selectors.
fn matches_button(selector: &str, classes: &[String]) -> bool {
    let selector = selector.trim();
    if selector.is_empty() || selector.contains([' ', '>', '+', '~', '#', '[', ':', ',']) {
        return false;
    }
    let mut parts = selector.split('.');
    let tag = parts.next().unwrap_or_default();
    if !tag.is_empty() && !tag.eq_ignore_ascii_case("button") {
        return false;
    }
    parts.all(|class| !class.is_empty() && classes.iter().any(|c| c == class))
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(err) => {
            overlay_warn!("invalid selector {:?}: {:?}", selector, err);
            None
        }
    }
}

fn inline_display_none(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let mut pair = declaration.splitn(2, ':');
        let property = pair.next().unwrap_or_default().trim();
        let value = pair.next().unwrap_or_default().trim();
        property.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
    })
}

impl HostDom for PageDocument {
    type Node = PageNode;

    fn query_all(&self, selector: &str) -> Vec<PageNode> {
        let mut found: Vec<PageNode> = match parse_selector(selector) {
            Some(sel) => self
                .html
                .select(&sel)
                .map(|el| PageNode::Host(el.id()))
                .collect(),
            None => Vec::new(),
        };
        found.extend(self.injected_matching(selector).map(|(id, _)| PageNode::Injected(id)));
        found
    }

    fn query_all_within(&self, scope: &PageNode, selector: &str) -> Vec<PageNode> {
        let PageNode::Host(scope_id) = *scope else {
            return Vec::new();
        };
        let Some(scope_el) = self.element(scope_id) else {
            return Vec::new();
        };
        let mut found: Vec<PageNode> = match parse_selector(selector) {
            Some(sel) => scope_el
                .select(&sel)
                .map(|el| PageNode::Host(el.id()))
                .collect(),
            None => Vec::new(),
        };
        found.extend(
            self.injected_matching(selector)
                .filter(|(_, button)| {
                    button.parent == *scope || self.is_within(&button.parent, scope_id)
                })
                .map(|(id, _)| PageNode::Injected(id)),
        );
        found
    }

    fn parent(&self, node: &PageNode) -> Option<PageNode> {
        match node {
            PageNode::Host(id) => self
                .html
                .tree
                .get(*id)?
                .parent()
                .and_then(ElementRef::wrap)
                .map(|el| PageNode::Host(el.id())),
            PageNode::Injected(id) => self.injected.get(id).map(|b| b.parent),
        }
    }

    fn text(&self, node: &PageNode) -> String {
        if let Some(text) = self.texts.get(node) {
            return text.clone();
        }
        match node {
            PageNode::Host(id) => self
                .element(*id)
                .map(|el| el.text().collect())
                .unwrap_or_default(),
            PageNode::Injected(_) => String::new(),
        }
    }

    fn set_text(&mut self, node: &PageNode, text: &str) {
        self.texts.insert(*node, text.to_string());
        self.touch();
    }

    fn has_class(&self, node: &PageNode, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &PageNode, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        match node {
            PageNode::Host(id) => {
                let mut classes = self.host_classes(*id);
                classes.push(class.to_string());
                self.classes.insert(*id, classes);
            }
            PageNode::Injected(id) => {
                if let Some(button) = self.injected.get_mut(id) {
                    button.classes.push(class.to_string());
                }
            }
        }
        self.touch();
    }

    fn remove_class(&mut self, node: &PageNode, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        match node {
            PageNode::Host(id) => {
                let mut classes = self.host_classes(*id);
                classes.retain(|c| c != class);
                self.classes.insert(*id, classes);
            }
            PageNode::Injected(id) => {
                if let Some(button) = self.injected.get_mut(id) {
                    button.classes.retain(|c| c != class);
                }
            }
        }
        self.touch();
    }

    fn is_displayed(&self, node: &PageNode) -> bool {
        match self.displayed.get(node) {
            Some(displayed) => *displayed,
            None => !self.is_hidden_by_page(node),
        }
    }

    fn set_displayed(&mut self, node: &PageNode, visible: bool) {
        if self.is_displayed(node) == visible {
            return;
        }
        self.displayed.insert(*node, visible);
        self.touch();
    }

    fn is_hidden_by_page(&self, node: &PageNode) -> bool {
        match node {
            PageNode::Host(id) => self
                .element(*id)
                .and_then(|el| el.value().attr("style"))
                .is_some_and(inline_display_none),
            PageNode::Injected(_) => false,
        }
    }

    fn append_button(&mut self, parent: &PageNode, button: &ButtonTemplate) -> PageNode {
        let id = self.next_injected;
        self.next_injected += 1;
        self.injected.insert(
            id,
            InjectedButton {
                parent: *parent,
                classes: vec![button.class.to_string()],
                icon_src: button.icon_src.to_string(),
            },
        );
        self.touch();
        PageNode::Injected(id)
    }
}
