use std::fmt::Write;

use overlay_core::EntryVisibility;
use overlay_engine::{EntryReport, PageVariant};

/// Plain-text table of every entry, one line each, in page order.
pub fn render(
    variant: Option<PageVariant>,
    visibility: EntryVisibility,
    entries: &[EntryReport],
) -> String {
    let mut out = String::new();
    let Some(variant) = variant else {
        out.push_str("no supported layout on this page\n");
        return out;
    };

    let hidden = entries.iter().filter(|e| !e.visible).count();
    let _ = writeln!(
        out,
        "{:?} page, visibility {}: {} entries, {} hidden",
        variant,
        visibility,
        entries.len(),
        hidden
    );
    for entry in entries {
        let control = match entry.control_visible {
            Some(true) => "button",
            Some(false) => "button hidden",
            None => "-",
        };
        let _ = writeln!(
            out,
            "{} {:<40} {:<16} {:<8} {}",
            if entry.visible { "+" } else { "-" },
            entry.name,
            entry.status_text,
            flags(entry),
            control
        );
    }
    out
}

fn flags(entry: &EntryReport) -> String {
    let mut flags = String::new();
    if entry.in_list {
        flags.push('L');
    }
    if entry.ignored {
        flags.push('I');
    }
    if flags.is_empty() {
        flags.push('.');
    }
    flags
}
