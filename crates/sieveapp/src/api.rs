//! # API Facade
//!
//! [`SieveApi`] is one filtering component. It is the single entry point hosts use, and
//! a thin layer over the command layer: it decides **when** a pass runs and delegates the
//! pass itself to [`commands::filter`].
//!
//! ## Role and Responsibilities
//!
//! The facade owns all per-component state:
//! - the [`FilterConfig`]
//! - the [`Notifier`] its listeners are registered with
//! - the [`Debouncer`] and the [`Subscription`]
//! - the active index field
//! - the lazily created [`HighlightSheet`]
//!
//! Two components over the same document share nothing but the document.
//!
//! ## Lifecycle
//!
//! | Host signal | Effect |
//! |-------------|--------|
//! | [`connect`](SieveApi::connect) | attach the listener, activate the index, schedule a pass |
//! | [`disconnect`](SieveApi::disconnect) | detach the listener, drop any pending pass |
//! | [`relocate`](SieveApi::relocate) | move the listener, drop the old pending pass, schedule a pass |
//! | [`update_config`](SieveApi::update_config) | index transition if needed, schedule a pass |
//! | [`handle_event`](SieveApi::handle_event) | schedule a pass if the event is relevant |
//! | [`tick`](SieveApi::tick) | run the pass once the debounce window has elapsed |
//! | [`refilter`](SieveApi::refilter) | run a pass now |
//!
//! ## Generic Over DocumentStore
//!
//! `SieveApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `SieveApi<FileStore>`
//! - Testing: `SieveApi<InMemoryStore>`

use crate::commands::highlight::HighlightSheet;
use crate::commands::index::{self, IndexMode, IndexStash};
use crate::commands::{self, PassReport};
use crate::config::FilterConfig;
use crate::error::{Result, SieveError};
use crate::model::ControlId;
use crate::notify::{FilterListener, ListenerId, ListenerScope, Notifier};
use crate::schedule::{Debouncer, FieldEvent, Subscription};
use crate::store::DocumentStore;
use std::time::Instant;

pub struct SieveApi<S: DocumentStore> {
    store: S,
    config: FilterConfig,
    notifier: Notifier,
    debouncer: Debouncer,
    subscription: Subscription,
    active_index: Option<ActiveIndex>,
    sheet: Option<HighlightSheet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveIndex {
    field: String,
    targets: Vec<String>,
    stash: IndexStash,
}

impl ActiveIndex {
    fn new(field: String) -> Self {
        Self {
            field,
            targets: Vec::new(),
            stash: IndexStash::new(),
        }
    }
}

impl<S: DocumentStore> SieveApi<S> {
    pub fn new(store: S, config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            notifier: Notifier::new(config.tag.clone()),
            debouncer: Debouncer::new(config.debounce_window()),
            store,
            config,
            subscription: Subscription::new(),
            active_index: None,
            sheet: None,
        })
    }

    /// Attaches to `context`, activates the configured index and schedules a pass.
    pub fn connect(&mut self, context: &str, now: Instant) -> Result<()> {
        self.subscription.start(context);
        self.sync_index()?;
        self.debouncer.trigger(now);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.subscription.stop();
        self.debouncer.cancel();
    }

    /// Moves the listener to `context`. A pass pending for the old context is dropped and
    /// a fresh one is scheduled.
    pub fn relocate(&mut self, context: &str, now: Instant) {
        self.subscription.restart(context);
        self.debouncer.cancel();
        self.debouncer.trigger(now);
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_active()
    }

    /// Schedules a pass when `event` comes from this component's form. Returns whether
    /// it did.
    pub fn handle_event(&mut self, event: &FieldEvent, now: Instant) -> bool {
        let relevant = self
            .store
            .document()
            .resolve_form(self.config.form.as_deref(), self.config.host.as_deref())
            .is_some_and(|form| self.subscription.is_relevant(event, form));

        if relevant {
            self.debouncer.trigger(now);
        } else {
            tracing::trace!(control = %event.control, "ignoring irrelevant field event");
        }
        relevant
    }

    /// Sets a control of the component's form the way a user would, then delivers the
    /// resulting input event. Returns whether a pass got scheduled.
    pub fn input(&mut self, name: &str, value: &str, now: Instant) -> Result<bool> {
        let changed = self.apply_input(name, value)?;
        let (Some(control), Some(context)) = (changed, self.subscription.context()) else {
            return Ok(false);
        };
        let event = FieldEvent::input(context, control);
        Ok(self.handle_event(&event, now))
    }

    /// Sets a control of the component's form without scheduling anything.
    pub fn apply_input(&mut self, name: &str, value: &str) -> Result<Option<ControlId>> {
        let form_name = self
            .store
            .document()
            .resolve_form_name(self.config.form.as_deref(), self.config.host.as_deref())
            .ok_or_else(|| {
                SieveError::FormNotFound(self.config.form.clone().unwrap_or_default())
            })?;
        Ok(self
            .store
            .document_mut()
            .form_mut(&form_name)
            .and_then(|form| form.apply_input(name, value)))
    }

    /// Runs the scheduled pass if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Result<Option<PassReport>> {
        if self.debouncer.poll(now) {
            self.run_pass().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Runs a pass immediately, replacing any scheduled one.
    pub fn refilter(&mut self) -> Result<PassReport> {
        self.debouncer.cancel();
        self.run_pass()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn run_pass(&mut self) -> Result<PassReport> {
        commands::filter::run(
            &mut self.store,
            &self.config,
            &mut self.notifier,
            &mut self.sheet,
        )
    }

    /// Replaces the configuration. Runs an index transition when the index field or its
    /// targets changed and schedules a pass.
    pub fn update_config(&mut self, config: FilterConfig, now: Instant) -> Result<()> {
        config.validate()?;
        if config.tag != self.config.tag || config.rows != self.config.rows {
            self.sheet = None;
        }
        self.notifier.set_event_name(config.tag.clone());
        self.debouncer.set_window(config.debounce_window());
        self.config = config;
        self.sync_index()?;
        self.debouncer.trigger(now);
        Ok(())
    }

    pub fn set_index(&mut self, field: Option<&str>, now: Instant) -> Result<()> {
        let config = FilterConfig {
            index: field.map(str::to_string),
            ..self.config.clone()
        };
        self.update_config(config, now)
    }

    pub fn index_field(&self) -> Option<&str> {
        self.active_index.as_ref().map(|a| a.field.as_str())
    }

    /// Brings indexed attributes in line with `config.index` and the resolved targets.
    ///
    /// A changed field deactivates the old one everywhere. With the field unchanged,
    /// only dropped targets are deactivated and only new targets activated.
    fn sync_index(&mut self) -> Result<()> {
        let desired = self.config.index_field().map(str::to_string);
        let mut active = self.active_index.take();

        if let Some(old) = active.as_mut() {
            if desired.as_deref() != Some(old.field.as_str()) {
                let live = self.live_targets(&old.targets);
                index::transition(
                    &mut self.store,
                    &live,
                    &old.field,
                    IndexMode::Remove,
                    &mut old.stash,
                )?;
                active = None;
            }
        }

        let Some(field) = desired else {
            return Ok(());
        };
        let targets = self
            .store
            .resolve_targets(&self.config.target_ids(), self.config.host.as_deref());
        let mut active = active.unwrap_or_else(|| ActiveIndex::new(field));

        let dropped: Vec<String> = self
            .live_targets(&active.targets)
            .into_iter()
            .filter(|t| !targets.contains(t))
            .collect();
        let added: Vec<String> = targets
            .iter()
            .filter(|t| !active.targets.contains(t))
            .cloned()
            .collect();

        index::transition(
            &mut self.store,
            &dropped,
            &active.field,
            IndexMode::Remove,
            &mut active.stash,
        )?;
        index::transition(
            &mut self.store,
            &added,
            &active.field,
            IndexMode::Add,
            &mut active.stash,
        )?;
        active.targets = targets;
        self.active_index = Some(active);
        Ok(())
    }

    fn live_targets(&self, targets: &[String]) -> Vec<String> {
        targets
            .iter()
            .filter(|t| self.store.document().collection(t).is_some())
            .cloned()
            .collect()
    }

    pub fn listen<L: FilterListener + 'static>(
        &mut self,
        scope: ListenerScope,
        listener: L,
    ) -> ListenerId {
        self.notifier.listen(scope, listener)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.notifier.unlisten(id)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn highlight_sheet(&self) -> Option<&HighlightSheet> {
        self.sheet.as_ref()
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save()
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
