//! # Rendering Module
//!
//! Plain-text rendering of pass reports and compiled queries, styled with `console`.
//! Whether colors show is decided once, globally, by `console::set_colors_enabled`.

use console::Style;
use sieveapp::commands::highlight::{HighlightSheet, MatchSegment};
use sieveapp::commands::{CmdMessage, MessageLevel, PassOutcome, SkipReason, TargetOutcome};
use sieveapp::model::Document;
use sieveapp::query::RejectedField;
use std::fmt::Write;

pub const FOUND_MARKER: &str = "+";
pub const HIDDEN_MARKER: &str = "-";

struct Styles {
    heading: Style,
    found: Style,
    hidden: Style,
    mark: Style,
    muted: Style,
    info: Style,
    warning: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            heading: Style::new().bold(),
            found: Style::new().green(),
            hidden: Style::new().dim(),
            mark: Style::new().black().on_yellow(),
            muted: Style::new().color256(246).italic(),
            info: Style::new(),
            warning: Style::new().yellow(),
        }
    }
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let styles = Styles::new();
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &styles.info,
            MessageLevel::Warning => &styles.warning,
        };
        let _ = writeln!(out, "{}", style.apply_to(&message.content));
    }
    out
}

fn render_segments(segments: &[MatchSegment], styles: &Styles) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            MatchSegment::Plain(text) => text.clone(),
            MatchSegment::Match(text) => styles.mark.apply_to(text).to_string(),
        })
        .collect()
}

/// Renders a pass report against the document it ran on.
pub fn render_report(
    report: &sieveapp::commands::PassReport,
    document: &Document,
    sheet: Option<&HighlightSheet>,
) -> String {
    let styles = Styles::new();
    let mut out = String::new();

    if let PassOutcome::Skipped(reason) = &report.outcome {
        let why = match reason {
            SkipReason::NoFieldSource => "no form found",
            SkipReason::NoTargets => "no target collections",
        };
        let _ = writeln!(out, "{}", styles.muted.apply_to(format!("Skipped: {}", why)));
        out.push_str(&render_messages(&report.messages));
        return out;
    }

    for target in &report.targets {
        let status = match target.outcome {
            TargetOutcome::Applied { changed } => format!("{} changed", changed),
            TargetOutcome::Cancelled => "cancelled".to_string(),
        };
        let _ = writeln!(
            out,
            "{} {}",
            styles.heading.apply_to(&target.target),
            styles.muted.apply_to(format!(
                "({} found, {} hidden, {})",
                target.found.len(),
                target.hidden.len(),
                status
            ))
        );

        let Some(collection) = document.collection(&target.target) else {
            continue;
        };
        for item in &collection.items {
            let found = target.found.contains(&item.id);
            let marked = sheet
                .and_then(|s| s.marked(&target.target).iter().find(|m| m.id == item.id));
            let text = match marked {
                Some(m) => render_segments(&m.segments, &styles),
                None => item.text_content(),
            };
            if found {
                let _ = writeln!(out, "  {} {}", styles.found.apply_to(FOUND_MARKER), text);
            } else {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    styles.hidden.apply_to(HIDDEN_MARKER),
                    styles.hidden.apply_to(text)
                );
            }
        }
    }

    if let Some(rule) = &report.highlight_rule {
        let _ = writeln!(out, "{}", styles.muted.apply_to(rule));
    }
    out.push_str(&render_messages(&report.messages));
    out
}

pub fn render_query(selector: &str, rule: Option<&str>, rejected: &[RejectedField]) -> String {
    let styles = Styles::new();
    let mut out = String::new();

    let selector = if selector.is_empty() { "*" } else { selector };
    let _ = writeln!(out, "{}", selector);
    if let Some(rule) = rule {
        let _ = writeln!(out, "{}", styles.muted.apply_to(rule));
    }
    for field in rejected {
        let _ = writeln!(
            out,
            "{}",
            styles.warning.apply_to(format!(
                "Ignoring field \"{}\": {}",
                field.raw_name, field.error
            ))
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selector_renders_as_universal() {
        console::set_colors_enabled(false);
        assert_eq!(render_query("", None, &[]), "*\n");
    }

    #[test]
    fn test_segments_without_color() {
        console::set_colors_enabled(false);
        let segments = vec![
            MatchSegment::Plain("a ".into()),
            MatchSegment::Match("red".into()),
        ];
        assert_eq!(render_segments(&segments, &Styles::new()), "a red");
    }
}
