//! # Filter Pass
//!
//! One synchronous pass: read → compile → match → notify → apply, per target.
//!
//! ## Configuration Absence
//!
//! A pass without a resolvable form or without any live target is skipped: it logs a
//! warning, changes nothing and dispatches nothing. The report says why.
//!
//! ## Per-target Independence
//!
//! Each target gets its own notification. A veto on one target leaves its items as they
//! were and does not affect the others.

use super::highlight::{mark, HighlightSheet, MarkedItem};
use super::matcher::match_target;
use super::visibility::apply;
use super::{CmdMessage, PassReport, SkipReason, TargetOutcome, TargetReport};
use crate::config::FilterConfig;
use crate::error::{Result, SieveError};
use crate::fields::read;
use crate::notify::Notifier;
use crate::query::QueryCompiler;
use crate::store::DocumentStore;
use std::collections::{BTreeMap, HashSet};

/// Runs one filter pass over the store's document.
///
/// `sheet` is created on the first pass that has highlight terms and cleared by later
/// passes that have none.
pub fn run<S: DocumentStore + ?Sized>(
    store: &mut S,
    config: &FilterConfig,
    notifier: &mut Notifier,
    sheet: &mut Option<HighlightSheet>,
) -> Result<PassReport> {
    let host = config.host.as_deref();

    let Some(form_name) = store
        .document()
        .resolve_form_name(config.form.as_deref(), host)
    else {
        tracing::warn!(tag = %config.tag, "no form found, skipping filter pass");
        let mut report = PassReport::skipped(SkipReason::NoFieldSource, None);
        report.add_message(CmdMessage::warning(format!(
            "No form found for {}",
            config.tag
        )));
        return Ok(report);
    };

    let compiled = {
        let form = store
            .document()
            .form(&form_name)
            .ok_or_else(|| SieveError::FormNotFound(form_name.clone()))?;
        let snapshot = read(form, &config.read_options());
        QueryCompiler::new(config.delimiter()).compile_snapshot(&snapshot)
    };

    let targets = store.resolve_targets(&config.target_ids(), host);
    if targets.is_empty() {
        tracing::warn!(tag = %config.tag, "no target collections, skipping filter pass");
        let mut report = PassReport::skipped(SkipReason::NoTargets, Some(form_name));
        report.add_message(CmdMessage::warning(format!(
            "No targets found for {}",
            config.tag
        )));
        return Ok(report);
    }

    tracing::debug!(
        form = %form_name,
        targets = targets.len(),
        fields = compiled.fields.len(),
        "starting filter pass"
    );

    let mut report = PassReport::completed(form_name);
    for rejected in &compiled.rejected {
        report.add_message(CmdMessage::warning(format!(
            "Ignoring field \"{}\": {}",
            rejected.raw_name, rejected.error
        )));
    }

    let mut marks: BTreeMap<String, Vec<MarkedItem>> = BTreeMap::new();
    for target in targets {
        let collection = store
            .document_mut()
            .collection_mut(&target)
            .ok_or_else(|| SieveError::TargetNotFound(target.clone()))?;

        let outcome = match_target(collection, &compiled.predicate);
        let marked = mark(collection, &compiled.highlights);

        let proceed = notifier.notify(&target, &outcome.found, &outcome.hidden);
        let target_outcome = if proceed {
            let found: HashSet<_> = outcome.found.iter().copied().collect();
            TargetOutcome::Applied {
                changed: apply(collection, &found),
            }
        } else {
            report.add_message(CmdMessage::info(format!(
                "Filtering of {} was cancelled",
                target
            )));
            TargetOutcome::Cancelled
        };

        tracing::debug!(
            target_id = %target,
            found = outcome.found.len(),
            hidden = outcome.hidden.len(),
            outcome = ?target_outcome,
            "filtered target"
        );

        report.targets.push(TargetReport {
            target: target.clone(),
            found: outcome.found,
            hidden: outcome.hidden,
            marked: marked.iter().map(|m| m.id).collect(),
            outcome: target_outcome,
        });
        if !marked.is_empty() {
            marks.insert(target, marked);
        }
    }

    if !compiled.highlights.is_empty() {
        let sheet = sheet.get_or_insert_with(|| HighlightSheet::new(&config.tag, &config.rows));
        sheet.update(&compiled.highlights, marks);
        report.highlight_rule = sheet.rule().map(str::to_string);
    } else if let Some(sheet) = sheet.as_mut() {
        sheet.clear();
    }

    report.rejected = compiled.rejected;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PassOutcome;
    use crate::model::{Control, Form};
    use crate::notify::{FilterEvent, ListenerScope};
    use crate::store::memory::fixtures::DocumentFixture;
    use crate::store::memory::InMemoryStore;

    fn config_for(host: &str) -> FilterConfig {
        FilterConfig {
            host: Some(host.to_string()),
            ..Default::default()
        }
    }

    fn status_store(value: &str) -> InMemoryStore {
        DocumentFixture::new()
            .with_form(Form::new("filters").with_control(Control::new("status", value)))
            .with_indexed("list", "status", &["open", "open urgent", "closed"])
            .build()
    }

    fn hidden_flags(store: &InMemoryStore, id: &str) -> Vec<bool> {
        store
            .document()
            .collection(id)
            .unwrap()
            .items
            .iter()
            .map(|i| i.hidden)
            .collect()
    }

    #[test]
    fn test_pass_hides_non_matching_items() {
        let mut store = status_store("open");
        let mut notifier = Notifier::new("sieve-filter");

        let report = run(&mut store, &config_for("list"), &mut notifier, &mut None).unwrap();

        assert_eq!(report.outcome, PassOutcome::Completed);
        assert_eq!(report.form.as_deref(), Some("filters"));
        let target = report.target("list").unwrap();
        assert_eq!(target.found.len(), 2);
        assert_eq!(target.outcome, TargetOutcome::Applied { changed: 1 });
        assert_eq!(hidden_flags(&store, "list"), vec![false, false, true]);
    }

    #[test]
    fn test_empty_form_reveals_everything() {
        let mut store = status_store("closed");
        let mut notifier = Notifier::new("sieve-filter");
        let config = config_for("list");
        run(&mut store, &config, &mut notifier, &mut None).unwrap();
        assert_eq!(hidden_flags(&store, "list"), vec![true, true, false]);

        store.document_mut().forms[0].controls[0].value = "  ".to_string();
        run(&mut store, &config, &mut notifier, &mut None).unwrap();
        assert_eq!(hidden_flags(&store, "list"), vec![false, false, false]);
    }

    #[test]
    fn test_cancelled_target_is_untouched() {
        let mut store = status_store("closed");
        let mut notifier = Notifier::new("sieve-filter");
        notifier.listen(ListenerScope::Document, |e: &mut FilterEvent| {
            e.prevent_default()
        });

        let report = run(&mut store, &config_for("list"), &mut notifier, &mut None).unwrap();

        let target = report.target("list").unwrap();
        assert_eq!(target.outcome, TargetOutcome::Cancelled);
        assert_eq!(target.hidden.len(), 2);
        assert_eq!(hidden_flags(&store, "list"), vec![false, false, false]);
    }

    #[test]
    fn test_no_form_skips_without_notifying() {
        let mut store = DocumentFixture::new()
            .with_texts("list", &["a"])
            .build();
        let mut notifier = Notifier::new("sieve-filter");
        notifier.listen(ListenerScope::Document, |_: &mut FilterEvent| {
            panic!("no notification expected");
        });

        let report = run(&mut store, &config_for("list"), &mut notifier, &mut None).unwrap();

        assert_eq!(report.outcome, PassOutcome::Skipped(SkipReason::NoFieldSource));
        assert_eq!(report.messages.len(), 1);
    }

    #[test]
    fn test_no_targets_skips() {
        let mut store = status_store("open");
        let mut notifier = Notifier::new("sieve-filter");

        let report = run(
            &mut store,
            &FilterConfig::default(),
            &mut notifier,
            &mut None,
        )
        .unwrap();

        assert_eq!(report.outcome, PassOutcome::Skipped(SkipReason::NoTargets));
        assert_eq!(hidden_flags(&store, "list"), vec![false, false, false]);
    }

    #[test]
    fn test_rejected_field_does_not_abort_pass() {
        let mut store = DocumentFixture::new()
            .with_form(
                Form::new("filters")
                    .with_control(Control::new("bad name", "x"))
                    .with_control(Control::new("status", "closed")),
            )
            .with_indexed("list", "status", &["open", "closed"])
            .build();
        let mut notifier = Notifier::new("sieve-filter");

        let report = run(&mut store, &config_for("list"), &mut notifier, &mut None).unwrap();

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].raw_name, "bad name");
        assert_eq!(hidden_flags(&store, "list"), vec![true, false]);
    }

    #[test]
    fn test_highlight_sheet_is_created_lazily() {
        let mut store = DocumentFixture::new()
            .with_form(Form::new("filters").with_control(Control::new("status:hi", "")))
            .with_indexed("list", "status", &["open", "closed"])
            .build();
        let mut notifier = Notifier::new("x-filter");
        let config = FilterConfig {
            tag: "x-filter".to_string(),
            ..config_for("list")
        };
        let mut sheet = None;

        run(&mut store, &config, &mut notifier, &mut sheet).unwrap();
        assert!(sheet.is_none());

        store.document_mut().forms[0].controls[0].value = "open".to_string();
        let report = run(&mut store, &config, &mut notifier, &mut sheet).unwrap();

        let created = sheet.as_ref().unwrap();
        let first = store.document().collections[0].items[0].id;
        assert!(created.is_marked("list", first));
        assert_eq!(report.target("list").unwrap().marked, vec![first]);
        assert!(report.highlight_rule.unwrap().starts_with("x-filter * :is("));

        store.document_mut().forms[0].controls[0].value = String::new();
        run(&mut store, &config, &mut notifier, &mut sheet).unwrap();
        assert!(sheet.as_ref().unwrap().rule().is_none());
    }
}
