//! Terminal rendering of the UI model.

use std::fmt::Write as _;

use colored::Colorize;
use platewatch_core::UiModel;

/// Renders the checklist: unseen states, a "Seen" separator, seen states,
/// then a progress line.
pub fn render_model(model: &UiModel) -> String {
    let mut out = String::new();

    for label in &model.non_viewed {
        let _ = writeln!(out, "  {}", label);
    }

    let _ = writeln!(out, "{}", "── Seen ──────────────".bright_black().bold());

    for label in &model.viewed {
        let _ = writeln!(out, "  {}", label.name().bright_black());
    }

    let _ = write!(out, "{}", render_progress(model));
    if model.has_undo {
        let _ = write!(out, " {}", "(undo available)".bright_black());
    }
    out.push('\n');
    out
}

/// `seen N/50`, or a celebration once everything is seen.
pub fn render_progress(model: &UiModel) -> String {
    if model.is_complete() {
        format!("All {} states seen!", model.total()).bright_green().bold().to_string()
    } else {
        format!("seen {}/{}", model.seen_count(), model.total())
            .bright_cyan()
            .to_string()
    }
}

pub fn render_json(model: &UiModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}
