use overlay_logging::{overlay_error, overlay_trace};

use crate::dom::{ButtonTemplate, HostDom};
use crate::variant::{EntryView, PageVariant, VariantDescriptor};

/// Label shown on a status control marked "not interested".
pub const NOT_INTERESTED_LABEL: &str = "Not interested";

/// Restored when no original status text was ever captured.
pub const FALLBACK_STATUS_TEXT: &str = "Add to list";

pub const INJECTED_BUTTON: ButtonTemplate = ButtonTemplate {
    class: "not-interested-button",
    icon_src: "images/not-interested.svg",
};

/// Applies and reverts the "not interested" look of status controls and
/// creates the injected controls.
///
/// Only controls of entries in no list are ever transformed, and those all
/// share one label, so a single captured text serves every control of the page.
#[derive(Debug, Clone)]
pub struct ButtonTransformer {
    descriptor: &'static VariantDescriptor,
    original_text: Option<String>,
}

impl ButtonTransformer {
    pub fn new(variant: PageVariant) -> Self {
        Self {
            descriptor: variant.descriptor(),
            original_text: None,
        }
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }

    pub fn transform<D: HostDom>(&mut self, dom: &mut D, control: &D::Node) {
        let already_marked = dom.has_class(control, self.descriptor.marker_class);
        dom.add_class(control, self.descriptor.marker_class);
        if self.original_text.is_none() && !already_marked {
            self.original_text = Some(dom.text(control));
        }
        dom.set_text(control, NOT_INTERESTED_LABEL);

        if let Some(parent_class) = self.descriptor.parent_marker_class {
            if let Some(parent) = dom.parent(control) {
                dom.add_class(&parent, parent_class);
            }
        }
    }

    pub fn undo<D: HostDom>(&mut self, dom: &mut D, control: &D::Node) {
        dom.remove_class(control, self.descriptor.marker_class);
        let text = match &self.original_text {
            Some(text) => text.clone(),
            None => {
                overlay_error!(
                    "status text was never captured, restoring {:?}",
                    FALLBACK_STATUS_TEXT
                );
                let fallback = FALLBACK_STATUS_TEXT.to_string();
                self.original_text = Some(fallback.clone());
                fallback
            }
        };
        dom.set_text(control, &text);

        if let Some(parent_class) = self.descriptor.parent_marker_class {
            if let Some(parent) = dom.parent(control) {
                dom.remove_class(&parent, parent_class);
            }
        }
    }

    /// Injects a control next to the entry's status control.
    pub fn create_button<D: HostDom>(
        &self,
        dom: &mut D,
        entry: &EntryView<D::Node>,
        visible: bool,
    ) -> D::Node {
        let button = dom.append_button(&entry.status_parent, &INJECTED_BUTTON);
        dom.set_displayed(&button, visible);
        overlay_trace!("injected control for {:?} visible={}", entry.name, visible);
        button
    }

    /// Injected control and status control share the same parent.
    pub fn find_injected_button<D: HostDom>(
        &self,
        dom: &D,
        status_parent: &D::Node,
    ) -> Option<D::Node> {
        let selector = format!(".{}", INJECTED_BUTTON.class);
        dom.query_within(status_parent, &selector)
    }

    /// DOM half of a click on an injected control: marks the sibling status
    /// control and hides the clicked control. Returns false if the button has
    /// no status control next to it.
    pub fn on_click<D: HostDom>(&mut self, dom: &mut D, button: &D::Node) -> bool {
        let control = dom
            .parent(button)
            .and_then(|parent| dom.query_within(&parent, self.descriptor.status_control));
        let Some(control) = control else {
            return false;
        };
        self.transform(dom, &control);
        dom.set_displayed(button, false);
        true
    }
}
