//! Test-only helpers shared by the unit tests.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use crate::{
    decoder::DecoderCallbacks,
    metadata::MessageMetadata,
    state_machine::{DecoderEventHandler, FilterStatus},
};

/// Lifecycle callback observed by a [`RecordingHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    TransportBegin,
    MessageBegin,
    MessageEnd,
    TransportEnd,
}

pub const FULL_LIFECYCLE: [Event; 4] = [
    Event::TransportBegin,
    Event::MessageBegin,
    Event::MessageEnd,
    Event::TransportEnd,
];

/// Callback log shared by a [`Recorder`] and every handler it creates.
pub type EventLog = Rc<RefCell<Vec<(usize, Event)>>>;

/// Build a message with a correct `Content-Length` for `body`.
pub fn sip_message(top_line: &str, headers: &[&str], body: &str) -> String {
    let mut message = format!("{top_line}\r\n");
    for header in headers {
        message.push_str(header);
        message.push_str("\r\n");
    }
    message.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    message
}

/// Callbacks retaining every decoded message and logging each lifecycle
/// event tagged with the message index.
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<Arc<MessageMetadata>>,
    pub events: EventLog,
    /// `(message index, event)` pairs that answer with `StopIteration`.
    pub suspend_on: Vec<(usize, Event)>,
}

impl Recorder {
    pub fn suspending(suspend_on: Vec<(usize, Event)>) -> Self {
        Self {
            suspend_on,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<(usize, Event)> { self.events.borrow().clone() }

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

#[derive(Debug)]
pub struct RecordingHandler {
    index: usize,
    events: EventLog,
    suspend_on: Vec<Event>,
}

impl RecordingHandler {
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
    fn transport_begin(&mut self, _metadata: &Arc<MessageMetadata>) -> FilterStatus {
        self.record(Event::TransportBegin)
    }

    fn message_begin(&mut self, _metadata: &Arc<MessageMetadata>) -> FilterStatus {
        self.record(Event::MessageBegin)
    }

    fn message_end(&mut self) -> FilterStatus { self.record(Event::MessageEnd) }

    fn transport_end(&mut self) -> FilterStatus { self.record(Event::TransportEnd) }
}
