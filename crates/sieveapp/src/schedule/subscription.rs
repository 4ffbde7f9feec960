//! Trigger listener lifecycle.
//!
//! A [`Subscription`] stands for the single `input`/`change` listener a component keeps
//! on its context (the document it currently lives in). Starting twice is a no-op, so a
//! component never holds more than one registration. Relocating stops the old
//! registration before starting the new one.
//!
//! A trigger is relevant only when it arrives on the subscribed context and its
//! originating control belongs to the component's field source.

use crate::fields::FieldSource;
use crate::model::ControlId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEventKind {
    Input,
    Change,
}

/// A user edit of a control, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvent {
    pub context: String,
    pub control: ControlId,
    pub kind: FieldEventKind,
}

impl FieldEvent {
    pub fn input(context: impl Into<String>, control: ControlId) -> Self {
        Self {
            context: context.into(),
            control,
            kind: FieldEventKind::Input,
        }
    }

    pub fn change(context: impl Into<String>, control: ControlId) -> Self {
        Self {
            context: context.into(),
            control,
            kind: FieldEventKind::Change,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Subscription {
    context: Option<String>,
    attached: usize,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers on `context`. Returns `false` when already registered there.
    ///
    /// Starting on a different context while active moves the registration.
    pub fn start(&mut self, context: &str) -> bool {
        match self.context.as_deref() {
            Some(current) if current == context => false,
            Some(_) => self.restart(context),
            None => {
                tracing::debug!(context, "attaching field listener");
                self.context = Some(context.to_string());
                self.attached += 1;
                true
            }
        }
    }

    /// Removes the registration. Returns `false` when there was none.
    pub fn stop(&mut self) -> bool {
        match self.context.take() {
            Some(context) => {
                tracing::debug!(context = %context, "detaching field listener");
                true
            }
            None => false,
        }
    }

    pub fn restart(&mut self, context: &str) -> bool {
        self.stop();
        self.start(context)
    }

    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Live registrations: always 0 or 1.
    pub fn registrations(&self) -> usize {
        usize::from(self.context.is_some())
    }

    /// How many times a registration was attached over this subscription's lifetime.
    pub fn attach_count(&self) -> usize {
        self.attached
    }

    /// Whether `event` reaches this subscription and comes from one of `source`'s controls.
    pub fn is_relevant<S: FieldSource + ?Sized>(&self, event: &FieldEvent, source: &S) -> bool {
        self.context() == Some(event.context.as_str()) && source.owns(event.control)
    }
}
