//! Text rendering of the browser chrome.

use wayfarer_nav::{HistoryListing, Toolbar};

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    }
}

/// One-line toolbar: disabled buttons lose their brackets.
pub fn toolbar_line(bar: &Toolbar) -> String {
    let spinner = if bar.spinner_visible { " ..." } else { "" };
    format!(
        "{}{}{}{} {}{spinner}",
        button("<", bar.back_enabled),
        button(">", bar.forward_enabled),
        button("R", bar.reload_enabled),
        button("H", bar.history_enabled),
        bar.address,
    )
}

/// Numbered history panel, most recent visit first.
pub fn history_panel(listing: &HistoryListing) -> String {
    if listing.entries.is_empty() {
        return "History is empty".to_string();
    }
    listing
        .entries
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{:>3}. {url}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
