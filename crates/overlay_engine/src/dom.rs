use std::fmt;

/// Shape of an injected control: a `<button>` carrying `class` with an
/// `<img src=icon_src>` child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTemplate {
    pub class: &'static str,
    pub icon_src: &'static str,
}

/// The slice of a host document the overlay reads and mutates.
///
/// Selectors are CSS selector strings. Query methods return matches in
/// document order; an invalid selector matches nothing.
pub trait HostDom {
    type Node: Clone + PartialEq + fmt::Debug;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Descendants of `scope` (not `scope` itself) matching `selector`.
    fn query_all_within(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_all_within(scope, selector).into_iter().next()
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Concatenated text content.
    fn text(&self, node: &Self::Node) -> String;

    /// Replaces the whole text content.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// False when the node's inline style is `display: none`.
    fn is_displayed(&self, node: &Self::Node) -> bool;
    fn set_displayed(&mut self, node: &Self::Node, visible: bool);

    /// True when the page itself hid the node. Ignores [`HostDom::set_displayed`].
    fn is_hidden_by_page(&self, node: &Self::Node) -> bool;

    /// Appends a new button as the last child of `parent`.
    fn append_button(&mut self, parent: &Self::Node, button: &ButtonTemplate) -> Self::Node;
}
