mod common;

use common::*;
use overlay_core::{Effect, EntryVisibility, IgnoredNames, Msg, Phase};
use overlay_engine::{
    EntryReport, HostDom, PageController, PageDocument, PageVariant, NOT_INTERESTED_LABEL,
};
use pretty_assertions::assert_eq;

type Controller = PageController<PageDocument>;

fn loaded(dom: &mut PageDocument, visibility: EntryVisibility, ignored: &[&str]) -> Controller {
    let mut controller = Controller::new();
    let effects = controller.dispatch(
        dom,
        Msg::PreferencesLoaded {
            visibility,
            ignored: ignored.iter().copied().collect(),
        },
    );
    assert!(effects.is_empty());
    controller
}

fn scanned(dom: &mut PageDocument, visibility: EntryVisibility, ignored: &[&str]) -> Controller {
    let mut controller = loaded(dom, visibility, ignored);
    controller.dispatch(dom, Msg::DomMutated);
    controller
}

fn report_for<'a>(reports: &'a [EntryReport], name: &str) -> &'a EntryReport {
    reports
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))
}

fn names(list: &[&str]) -> IgnoredNames {
    list.iter().copied().collect()
}

#[test]
fn nothing_happens_before_preferences_load() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A"]));
    let mut controller = Controller::new();

    controller.dispatch(&mut dom, Msg::DomMutated);

    assert_eq!(dom.revision(), 0);
    assert_eq!(controller.variant(), None);
}

#[test]
fn fresh_page_gets_one_visible_control_per_entry() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B", "C"]));
    let controller = scanned(&mut dom, EntryVisibility::Default, &[]);

    assert_eq!(controller.state().phase(), Phase::Ready);
    assert_eq!(controller.variant(), Some(PageVariant::TopRanking));
    assert_eq!(dom.injected_buttons().len(), 3);

    let reports = controller.report(&dom);
    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!(report.visible, "{} hidden", report.name);
        assert_eq!(report.control_visible, Some(true));
        assert_eq!(report.status_text, "Add to list");
    }
}

#[test]
fn ignored_entry_is_transformed_but_stays_visible_in_default_mode() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B", "C"]));
    let controller = scanned(&mut dom, EntryVisibility::Default, &["B"]);

    let reports = controller.report(&dom);
    let b = report_for(&reports, "B");
    assert!(b.visible);
    assert!(b.ignored);
    assert_eq!(b.status_text, NOT_INTERESTED_LABEL);
    assert_eq!(b.control_visible, Some(false));

    let a = report_for(&reports, "A");
    assert_eq!(a.status_text, "Add to list");
    assert_eq!(a.control_visible, Some(true));
}

#[test]
fn in_list_entries_get_no_control() {
    init_logging();
    let mut dom = PageDocument::parse(&top_ranking_page(&[
        ("Watched", "completed", "Completed"),
        ("Fresh", NOT_IN_LIST, "Add to list"),
    ]));
    let controller = scanned(&mut dom, EntryVisibility::Default, &[]);

    let reports = controller.report(&dom);
    assert_eq!(report_for(&reports, "Watched").control_visible, None);
    assert_eq!(report_for(&reports, "Fresh").control_visible, Some(true));
    assert_eq!(controller.controls().len(), 1);
}

#[test]
fn visibility_modes_filter_entries() {
    init_logging();
    let rows = [
        ("InList", "watching", "Watching"),
        ("Ignored", NOT_IN_LIST, "Add to list"),
        ("Open", NOT_IN_LIST, "Add to list"),
    ];
    let cases = [
        (EntryVisibility::Default, [true, true, true]),
        (EntryVisibility::NotInListOnly, [false, false, true]),
        (EntryVisibility::HideNotInterestedOnly, [true, false, true]),
        (EntryVisibility::InListOnly, [true, false, false]),
    ];
    for (mode, expected) in cases {
        let mut dom = PageDocument::parse(&top_ranking_page(&rows));
        let controller = scanned(&mut dom, mode, &["Ignored"]);
        let visible: Vec<bool> = controller.report(&dom).iter().map(|r| r.visible).collect();
        assert_eq!(visible, expected.to_vec(), "mode {mode}");
    }
}

#[test]
fn external_mode_change_hides_ignored_entries_live() {
    init_logging();
    let mut dom = PageDocument::parse(&top_ranking_page(&[
        ("InList", "watching", "Watching"),
        ("Ignored", NOT_IN_LIST, "Add to list"),
        ("Open", NOT_IN_LIST, "Add to list"),
    ]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &["Ignored"]);
    let buttons_before = dom.injected_buttons().len();

    controller.dispatch(
        &mut dom,
        Msg::VisibilityChanged {
            old: EntryVisibility::Default,
            new: EntryVisibility::HideNotInterestedOnly,
        },
    );

    let visible: Vec<(String, bool)> = controller
        .report(&dom)
        .into_iter()
        .map(|r| (r.name, r.visible))
        .collect();
    assert_eq!(
        visible,
        vec![
            ("InList".to_string(), true),
            ("Ignored".to_string(), false),
            ("Open".to_string(), true),
        ]
    );
    assert_eq!(dom.injected_buttons().len(), buttons_before);
}

#[test]
fn external_removal_restores_entry_and_control() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B"]));
    let mut controller = scanned(&mut dom, EntryVisibility::HideNotInterestedOnly, &["B"]);
    assert!(!report_for(&controller.report(&dom), "B").visible);

    controller.dispatch(
        &mut dom,
        Msg::IgnoredNamesChanged {
            old: names(&["B"]),
            new: names(&[]),
        },
    );

    let reports = controller.report(&dom);
    let b = report_for(&reports, "B");
    assert!(b.visible);
    assert!(!b.ignored);
    assert!(!b.in_list);
    assert_eq!(b.status_text, "Add to list");
    assert_eq!(b.control_visible, Some(true));
}

#[test]
fn removal_of_name_not_on_page_is_harmless() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A"]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &["Elsewhere"]);
    let revision = dom.revision();

    controller.dispatch(
        &mut dom,
        Msg::IgnoredNamesChanged {
            old: names(&["Elsewhere"]),
            new: names(&[]),
        },
    );
    assert_eq!(dom.revision(), revision);
}

#[test]
fn unsupported_page_is_left_untouched() {
    init_logging();
    let mut dom = PageDocument::parse(&unsupported_page());
    let controller = scanned(&mut dom, EntryVisibility::InListOnly, &["A"]);

    assert_eq!(dom.revision(), 0);
    assert_eq!(controller.state().phase(), Phase::Unloaded);
    assert!(controller.report(&dom).is_empty());
}

#[test]
fn click_marks_entry_and_requests_persistence() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B"]));
    let mut controller = scanned(&mut dom, EntryVisibility::HideNotInterestedOnly, &[]);
    let button = *controller.control_for("A").expect("control for A");

    let effects = controller.click(&mut dom, &button);

    assert_eq!(
        effects,
        vec![Effect::PersistIgnoredName {
            name: "A".to_string()
        }]
    );
    assert!(controller.state().is_ignored("A"));
    let reports = controller.report(&dom);
    let a = report_for(&reports, "A");
    assert!(!a.visible);
    assert_eq!(a.status_text, NOT_INTERESTED_LABEL);
    assert_eq!(a.control_visible, Some(false));
    assert!(report_for(&reports, "B").visible);
}

#[test]
fn later_mutations_refresh_without_new_controls() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B"]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &[]);
    let button = *controller.control_for("A").expect("control for A");
    controller.click(&mut dom, &button);

    for _ in 0..3 {
        controller.dispatch(&mut dom, Msg::DomMutated);
    }

    assert_eq!(dom.injected_buttons().len(), 2);
    let reports = controller.report(&dom);
    assert_eq!(report_for(&reports, "A").status_text, NOT_INTERESTED_LABEL);
    // The marked control now reads as in list.
    assert!(report_for(&reports, "A").in_list);
}

#[test]
fn rerendered_page_is_not_reinjected_once_ready() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A", "B"]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &["A"]);

    dom.replace_html(&plain_ranking(&["A", "B", "C"]));
    controller.dispatch(&mut dom, Msg::DomMutated);

    assert!(dom.injected_buttons().is_empty());
    let reports = controller.report(&dom);
    assert_eq!(reports.len(), 3);
    assert_eq!(report_for(&reports, "A").status_text, NOT_INTERESTED_LABEL);
}

#[test]
fn navigating_to_another_layout_starts_a_new_session() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A"]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &[]);

    dom.replace_html(&seasonal_page(&[("S", NOT_IN_LIST, "Add to list")]));
    controller.dispatch(&mut dom, Msg::DomMutated);

    assert_eq!(controller.variant(), Some(PageVariant::SeasonalGrid));
    assert_eq!(dom.injected_buttons().len(), 1);
    assert!(controller.control_for("S").is_some());
    assert!(controller.control_for("A").is_none());
}

#[test]
fn leaving_supported_pages_unloads() {
    init_logging();
    let mut dom = PageDocument::parse(&plain_ranking(&["A"]));
    let mut controller = scanned(&mut dom, EntryVisibility::Default, &[]);

    dom.replace_html(&unsupported_page());
    controller.dispatch(&mut dom, Msg::DomMutated);
    assert_eq!(controller.state().phase(), Phase::Unloaded);
    assert_eq!(controller.variant(), None);

    dom.replace_html(&plain_ranking(&["A"]));
    controller.dispatch(&mut dom, Msg::DomMutated);
    assert_eq!(controller.state().phase(), Phase::Ready);
    assert_eq!(dom.injected_buttons().len(), 1);
}

#[test]
fn seasonal_ads_are_hidden() {
    init_logging();
    let mut dom = PageDocument::parse(&seasonal_page(&[("S", NOT_IN_LIST, "Add to list")]));
    scanned(&mut dom, EntryVisibility::Default, &[]);

    let ads = dom.query_all("div.js-middle_ad");
    assert_eq!(ads.len(), 1);
    assert!(!dom.is_displayed(&ads[0]));
}

#[test]
fn detail_page_marks_single_entry() {
    init_logging();
    let mut dom = PageDocument::parse(&detail_page(
        "Mushishi",
        "myinfo_addtolist",
        "Add to list",
    ));
    let controller = scanned(&mut dom, EntryVisibility::Default, &["Mushishi"]);

    let reports = controller.report(&dom);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status_text, NOT_INTERESTED_LABEL);
    assert_eq!(reports[0].control_visible, Some(false));
}

#[test]
fn hidden_detail_entry_comes_back_when_mode_returns_to_default() {
    init_logging();
    let mut dom = PageDocument::parse(&detail_page(
        "Mushishi",
        "myinfo_addtolist",
        "Add to list",
    ));
    let mut controller = scanned(&mut dom, EntryVisibility::HideNotInterestedOnly, &["Mushishi"]);
    assert!(!report_for(&controller.report(&dom), "Mushishi").visible);

    controller.dispatch(
        &mut dom,
        Msg::VisibilityChanged {
            old: EntryVisibility::HideNotInterestedOnly,
            new: EntryVisibility::Default,
        },
    );
    controller.dispatch(&mut dom, Msg::DomMutated);

    let reports = controller.report(&dom);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].visible);
    assert_eq!(reports[0].status_text, NOT_INTERESTED_LABEL);
}

#[test]
fn hidden_detail_entry_is_restored_on_external_removal() {
    init_logging();
    let mut dom = PageDocument::parse(&detail_page(
        "Mushishi",
        "myinfo_addtolist",
        "Add to list",
    ));
    let mut controller = scanned(&mut dom, EntryVisibility::HideNotInterestedOnly, &["Mushishi"]);

    controller.dispatch(
        &mut dom,
        Msg::IgnoredNamesChanged {
            old: names(&["Mushishi"]),
            new: names(&[]),
        },
    );

    let reports = controller.report(&dom);
    assert_eq!(reports.len(), 1);
    let entry = &reports[0];
    assert!(entry.visible);
    assert!(!entry.ignored);
    assert_eq!(entry.status_text, "Add to list");
    assert_eq!(entry.control_visible, Some(true));

    // The host's own hidden copy of the status block stays out.
    let blocks = dom.query_all("div.user-status-block");
    assert_eq!(blocks.len(), 2);
    assert!(!dom.is_displayed(&blocks[1]));
}
