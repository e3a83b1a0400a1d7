//! Per-message lifecycle driver.
//!
//! A [`DecoderStateMachine`] walks one decoded message through
//! `TransportBegin → MessageBegin → MessageEnd → TransportEnd → Done`,
//! invoking one [`DecoderEventHandler`] callback per state. A callback that
//! returns [`FilterStatus::StopIteration`] suspends the machine: `run`
//! returns [`RunStatus::Suspended`] with the cursor already advanced, so the
//! next `run` resumes at the following state instead of repeating the
//! callback.

use std::{fmt, sync::Arc};

use crate::metadata::MessageMetadata;

/// Signal returned by every lifecycle callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterStatus {
    /// Proceed to the next state.
    Continue,
    /// Suspend until the caller resumes.
    StopIteration,
}

/// Lifecycle states in the order they are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    TransportBegin,
    MessageBegin,
    MessageEnd,
    TransportEnd,
    Done,
}

impl State {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TransportBegin => "TransportBegin",
            Self::MessageBegin => "MessageBegin",
            Self::MessageEnd => "MessageEnd",
            Self::TransportEnd => "TransportEnd",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Outcome of [`DecoderStateMachine::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every lifecycle callback has run.
    Done,
    /// A callback asked to stop; the machine can be resumed.
    Suspended,
}

/// Receiver of per-message lifecycle events.
///
/// A fresh handler is created for every message by
/// [`DecoderCallbacks::new_decoder_event_handler`](crate::DecoderCallbacks::new_decoder_event_handler).
pub trait DecoderEventHandler {
    /// The message has been framed and decoded.
    fn transport_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus;

    fn message_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus;

    fn message_end(&mut self) -> FilterStatus;

    /// Last callback for the message.
    fn transport_end(&mut self) -> FilterStatus;
}

impl<H: DecoderEventHandler + ?Sized> DecoderEventHandler for Box<H> {
    fn transport_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus {
        (**self).transport_begin(metadata)
    }

    fn message_begin(&mut self, metadata: &Arc<MessageMetadata>) -> FilterStatus {
        (**self).message_begin(metadata)
    }

    fn message_end(&mut self) -> FilterStatus { (**self).message_end() }

    fn transport_end(&mut self) -> FilterStatus { (**self).transport_end() }
}

/// Resumable cursor over one message's lifecycle.
#[derive(Debug)]
pub struct DecoderStateMachine<H> {
    metadata: Arc<MessageMetadata>,
    handler: H,
    state: State,
}

impl<H: DecoderEventHandler> DecoderStateMachine<H> {
    /// Bind a decoded message to its handler, starting at
    /// [`State::TransportBegin`].
    #[must_use]
    pub fn new(metadata: Arc<MessageMetadata>, handler: H) -> Self {
        Self {
            metadata,
            handler,
            state: State::TransportBegin,
        }
    }

    /// Next state to be handled.
    #[must_use]
    pub const fn state(&self) -> State { self.state }

    #[must_use]
    pub const fn metadata(&self) -> &Arc<MessageMetadata> { &self.metadata }

    #[must_use]
    pub const fn handler(&self) -> &H { &self.handler }

    pub const fn handler_mut(&mut self) -> &mut H { &mut self.handler }

    /// Consume the machine, returning its handler.
    #[must_use]
    pub fn into_handler(self) -> H { self.handler }

    fn handle_state(&mut self) -> (State, FilterStatus) {
        match self.state {
            State::TransportBegin => (
                State::MessageBegin,
                self.handler.transport_begin(&self.metadata),
            ),
            State::MessageBegin => (
                State::MessageEnd,
                self.handler.message_begin(&self.metadata),
            ),
            State::MessageEnd => (State::TransportEnd, self.handler.message_end()),
            State::TransportEnd => (State::Done, self.handler.transport_end()),
            State::Done => unreachable!("state machine driven past Done"),
        }
    }

    /// Run until every state has been handled or a callback suspends.
    ///
    /// Running a machine that is already done returns [`RunStatus::Done`]
    /// without invoking the handler.
    pub fn run(&mut self) -> RunStatus {
        while self.state != State::Done {
            tracing::trace!(state = %self.state, "sip: state");

            let (next, status) = self.handle_state();
            self.state = next;

            if status == FilterStatus::StopIteration {
                crate::metrics::inc_suspended();
                return RunStatus::Suspended;
            }
        }
        RunStatus::Done
    }
}
