//! Output event stream
//!
//! A block invocation produces an ordered, lazy sequence of named values.
//! The host routes each event along the graph edges leaving the output port
//! with the same name. A stream represents a single invocation and cannot be
//! restarted.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// One named value emitted by a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Output field name
    pub field: String,
    /// Emitted value
    pub value: JsonValue,
}

impl OutputEvent {
    /// Create a new event
    pub fn new(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Lazy stream of output events
pub struct BlockOutput {
    events: Box<dyn Iterator<Item = OutputEvent> + Send>,
}

impl BlockOutput {
    /// A stream that emits nothing
    pub fn empty() -> Self {
        Self::lazy(std::iter::empty())
    }

    /// A stream with exactly one event
    pub fn single(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::from_events(vec![OutputEvent::new(field, value)])
    }

    /// A stream over already computed events, in order
    pub fn from_events(events: Vec<OutputEvent>) -> Self {
        Self::lazy(events.into_iter())
    }

    /// A stream whose events are produced on demand
    pub fn lazy<I>(events: I) -> Self
    where
        I: Iterator<Item = OutputEvent> + Send + 'static,
    {
        Self {
            events: Box::new(events),
        }
    }

    /// Append one event after everything already in the stream
    pub fn then(self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let next = OutputEvent::new(field, value);
        Self::lazy(self.events.chain(std::iter::once(next)))
    }

    /// Drain the stream into a vector
    pub fn collect_events(self) -> Vec<OutputEvent> {
        self.events.collect()
    }

    /// Consume events until one named `field` is seen, returning its value
    pub fn first_on(&mut self, field: &str) -> Option<JsonValue> {
        self.events
            .by_ref()
            .find(|event| event.field == field)
            .map(|event| event.value)
    }
}

impl Iterator for BlockOutput {
    type Item = OutputEvent;

    fn next(&mut self) -> Option<OutputEvent> {
        self.events.next()
    }
}

impl fmt::Debug for BlockOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockOutput").finish_non_exhaustive()
    }
}
