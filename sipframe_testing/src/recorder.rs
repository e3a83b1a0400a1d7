//! Recording callbacks with scriptable suspension.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use sipframe::{DecoderCallbacks, DecoderEventHandler, FilterStatus, MessageMetadata};

/// Lifecycle callback observed by a [`RecordingHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    TransportBegin,
    MessageBegin,
    MessageEnd,
    TransportEnd,
}

/// Every callback of one uninterrupted lifecycle, in order.
pub const FULL_LIFECYCLE: [Event; 4] = [
    Event::TransportBegin,
    Event::MessageBegin,
    Event::MessageEnd,
    Event::TransportEnd,
];

/// Callback log shared by a [`Recorder`] and the handlers it creates,
/// tagged with the zero-based message index.
pub type EventLog = Rc<RefCell<Vec<(usize, Event)>>>;

/// [`DecoderCallbacks`] that keep every decoded message and log every
/// lifecycle event.
///
/// Handlers answer [`FilterStatus::StopIteration`] at the scripted
/// `(message index, event)` points and [`FilterStatus::Continue`]
/// everywhere else.
#[derive(Debug, Default)]
pub struct Recorder {
    messages: Vec<Arc<MessageMetadata>>,
    events: EventLog,
    suspend_on: Vec<(usize, Event)>,
}

impl Recorder {
    /// Recorder suspending at each `(message index, event)` pair.
    pub fn suspending(suspend_on: impl IntoIterator<Item = (usize, Event)>) -> Self {
        Self {
            suspend_on: suspend_on.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Metadata of every message handed to the callbacks, in order.
    pub fn messages(&self) -> &[Arc<MessageMetadata>] { &self.messages }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<(usize, Event)> { self.events.borrow().clone() }

    /// Events observed for one message.
    pub fn events_for(&self, index: usize) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, event)| *event)
            .collect()
    }
}

impl DecoderCallbacks for Recorder {
    type Handler = RecordingHandler;

    fn new_decoder_event_handler(&mut self, metadata: &Arc<MessageMetadata>) -> RecordingHandler {
        let index = self.messages.len();
        self.messages.push(Arc::clone(metadata));
        RecordingHandler {
            index,
            metadata: None,
            events: Rc::clone(&self.events),
            suspend_on: self
                .suspend_on
                .iter()
                .filter(|(i, _)| *i == index)
                .map(|(_, event)| *event)
                .collect(),
        }
    }
}

/// Per-message handler created by [`Recorder`].
#[derive(Debug)]
pub struct RecordingHandler {
    index: usize,
    metadata: Option<Arc<MessageMetadata>>,
    events: EventLog,
    suspend_on: Vec<Event>,
}

impl RecordingHandler {
    /// Index of the message this handler serves.
    pub fn index(&self) -> usize { self.index }

    /// Metadata retained from `transport_begin`.
    pub fn metadata(&self) -> Option<&MessageMetadata> { self.metadata.as_deref() }

    fn record(&mut self, event: Event) -> FilterStatus {
        self.events.borrow_mut().push((self.index, event));
        if self.suspend_on.contains(&event) {
            FilterStatus::StopIteration
        } else {
            FilterStatus::Continue
        }
    }
}

impl DecoderEventHandler for RecordingHandler {
    fn transport_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus {
        self.metadata = Some(Arc::clone(metadata));
        self.record(Event::TransportBegin)
    }

    fn message_begin(&mut self, _metadata: &Arc<MessageMetadata>) -> FilterStatus {
        self.record(Event::MessageBegin)
    }

    fn message_end(&mut self) -> FilterStatus { self.record(Event::MessageEnd) }

    fn transport_end(&mut self) -> FilterStatus { self.record(Event::TransportEnd) }
}
