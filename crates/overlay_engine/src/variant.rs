use overlay_logging::{overlay_debug, overlay_warn};

use crate::dom::HostDom;

/// Selectors describing one supported host layout.
#[derive(Debug, PartialEq, Eq)]
pub struct VariantDescriptor {
    /// Element(s) holding all entries. Its presence identifies the layout.
    pub container: &'static str,
    pub entry: &'static str,
    pub status_control: &'static str,
    pub name: &'static str,
    /// Class a status control carries while the entry is in no list.
    pub not_watched_class: &'static str,
    /// Class added to a status control transformed to "Not interested".
    pub marker_class: &'static str,
    pub parent_marker_class: Option<&'static str>,
    /// Layout clutter hidden on every pass, searched inside the containers.
    pub removable: Option<&'static str>,
}

// <table class="top-ranking-table">
//   <tr class="ranking-list"> ... <h3 class="anime_ranking_h3"><a>NAME</a></h3>
//     ... <a class="js-anime-watch-status notinmylist">Add to list</a>
static TOP_RANKING: VariantDescriptor = VariantDescriptor {
    container: "table.top-ranking-table",
    entry: "tr.ranking-list",
    status_control: "a.js-anime-watch-status",
    name: "h3.anime_ranking_h3 > a",
    not_watched_class: "notinmylist",
    marker_class: "not-interested-status-top-table",
    parent_marker_class: None,
    removable: None,
};

// <div class="seasonal-anime-list">
//   <div class="js-anime-category-producer seasonal-anime">
//     ... <h2 class="h2_anime_title"><a>NAME</a></h2>
//     ... <a class="js-anime-watch-status notinmylist"><span>Add to list</span></a>
//   <div class="js-middle_ad">...</div>
static SEASONAL_GRID: VariantDescriptor = VariantDescriptor {
    container: "div.seasonal-anime-list",
    entry: "div.js-anime-category-producer.seasonal-anime",
    status_control: "a.js-anime-watch-status",
    name: "h2.h2_anime_title > a",
    not_watched_class: "notinmylist",
    marker_class: "not-interested-status-search-table",
    parent_marker_class: Some("not-interested-status-parent-search-table"),
    removable: Some("div.js-middle_ad"),
};

// <h1 class="title-name"><strong>NAME</strong></h1>
// <div class="anime-detail-header-stats">
//   <div class="user-status-block">
//     <a id="myinfo_status" class="myinfo_addtolist">Add to list</a>
static ENTRY_DETAIL: VariantDescriptor = VariantDescriptor {
    container: "div.anime-detail-header-stats",
    entry: "div.user-status-block",
    status_control: "#myinfo_status",
    name: "h1.title-name",
    not_watched_class: "myinfo_addtolist",
    marker_class: "not-interested-status-signle-entry",
    parent_marker_class: None,
    removable: None,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageVariant {
    TopRanking,
    SeasonalGrid,
    EntryDetail,
}

impl PageVariant {
    /// Resolution order.
    pub const PRIORITY: [PageVariant; 3] = [
        PageVariant::TopRanking,
        PageVariant::SeasonalGrid,
        PageVariant::EntryDetail,
    ];

    pub fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            PageVariant::TopRanking => &TOP_RANKING,
            PageVariant::SeasonalGrid => &SEASONAL_GRID,
            PageVariant::EntryDetail => &ENTRY_DETAIL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("entry has no status control matching {selector:?}")]
    MissingStatusControl { selector: &'static str },
    #[error("status control has no parent element")]
    MissingStatusParent,
    #[error("entry has no name matching {selector:?}")]
    MissingName { selector: &'static str },
}

/// One entry as read during a pass. Never kept across mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<N> {
    pub entry: N,
    pub name: String,
    pub status_control: N,
    pub status_parent: N,
    pub in_list: bool,
}

/// Page Model: extraction operations over the resolved layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageModel {
    variant: PageVariant,
}

impl PageModel {
    pub fn new(variant: PageVariant) -> Self {
        Self { variant }
    }

    /// First variant, in [`PageVariant::PRIORITY`] order, whose container
    /// selector matches at least one element.
    pub fn resolve<D: HostDom>(dom: &D) -> Option<Self> {
        PageVariant::PRIORITY
            .into_iter()
            .map(Self::new)
            .find(|model| model.matches(dom))
    }

    pub fn variant(&self) -> PageVariant {
        self.variant
    }

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.variant.descriptor()
    }

    pub fn matches<D: HostDom>(&self, dom: &D) -> bool {
        dom.query(self.descriptor().container).is_some()
    }

    fn containers<D: HostDom>(&self, dom: &D) -> Vec<D::Node> {
        let mut containers = dom.query_all(self.descriptor().container);
        if self.variant == PageVariant::EntryDetail && containers.len() > 1 {
            overlay_warn!(
                "{} detail containers on single entry page, using the first",
                containers.len()
            );
            containers.truncate(1);
        }
        containers
    }

    /// Entry elements in document order, re-read from the DOM on every call.
    pub fn entries<D: HostDom>(&self, dom: &D) -> Vec<D::Node> {
        let selector = self.descriptor().entry;
        let entries = self
            .containers(dom)
            .into_iter()
            .flat_map(|container| dom.query_all_within(&container, selector));
        match self.variant {
            // The detail page keeps a hidden copy of the status block around.
            // Blocks the overlay hid are still entries.
            PageVariant::EntryDetail => entries.filter(|e| !dom.is_hidden_by_page(e)).collect(),
            _ => entries.collect(),
        }
    }

    pub fn entry_name<D: HostDom>(&self, dom: &D, entry: &D::Node) -> Option<String> {
        let selector = self.descriptor().name;
        let heading = match self.variant {
            PageVariant::EntryDetail => dom.query(selector),
            _ => dom.query_within(entry, selector),
        }?;
        Some(dom.text(&heading).trim().to_string())
    }

    /// Status control under `scope`, which is an entry or a status parent.
    pub fn status_control<D: HostDom>(&self, dom: &D, scope: &D::Node) -> Option<D::Node> {
        dom.query_within(scope, self.descriptor().status_control)
    }

    /// A marked control counts as in list even though list membership did not change.
    pub fn is_in_list<D: HostDom>(&self, dom: &D, control: &D::Node) -> bool {
        let descriptor = self.descriptor();
        dom.has_class(control, descriptor.marker_class)
            || !dom.has_class(control, descriptor.not_watched_class)
    }

    pub fn removable_elements<D: HostDom>(&self, dom: &D) -> Vec<D::Node> {
        let Some(selector) = self.descriptor().removable else {
            return Vec::new();
        };
        self.containers(dom)
            .iter()
            .flat_map(|container| dom.query_all_within(container, selector))
            .collect()
    }

    pub fn describe_entry<D: HostDom>(
        &self,
        dom: &D,
        entry: &D::Node,
    ) -> Result<EntryView<D::Node>, EntryError> {
        let descriptor = self.descriptor();
        let status_control =
            self.status_control(dom, entry)
                .ok_or(EntryError::MissingStatusControl {
                    selector: descriptor.status_control,
                })?;
        let status_parent = dom
            .parent(&status_control)
            .ok_or(EntryError::MissingStatusParent)?;
        let name = self
            .entry_name(dom, entry)
            .ok_or(EntryError::MissingName {
                selector: descriptor.name,
            })?;
        let in_list = self.is_in_list(dom, &status_control);
        Ok(EntryView {
            entry: entry.clone(),
            name,
            status_control,
            status_parent,
            in_list,
        })
    }

    /// Readable entries of the current page. Malformed entries are logged and skipped.
    pub fn entry_views<D: HostDom>(&self, dom: &D) -> Vec<EntryView<D::Node>> {
        self.entries(dom)
            .iter()
            .filter_map(|entry| match self.describe_entry(dom, entry) {
                Ok(view) => Some(view),
                Err(err) => {
                    overlay_warn!("skipping {:?} entry {:?}: {}", self.variant, entry, err);
                    None
                }
            })
            .collect()
    }

    /// Calls `f` for every readable entry. Entries are read before the first
    /// call, so `f` may mutate the document.
    pub fn for_each_entry<D: HostDom>(
        &self,
        dom: &mut D,
        mut f: impl FnMut(&mut D, &EntryView<D::Node>),
    ) -> usize {
        let views = self.entry_views(dom);
        overlay_debug!("{:?}: {} entries", self.variant, views.len());
        for view in &views {
            f(dom, view);
        }
        views.len()
    }
}
