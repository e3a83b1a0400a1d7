//! Rewrite instructions recorded against the raw message.

/// Whether an [`Operation`] inserts or deletes bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Insert,
    Delete,
}

/// Payload of an [`Operation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationValue {
    /// Text to splice in at the operation's offset.
    Insert(String),
    /// Number of bytes to remove starting at the operation's offset.
    Delete(usize),
}

/// A planned rewrite of the raw message at a byte offset.
///
/// Operations are appended during decoding and consumed, in order, by a
/// rewriter outside the decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    position: usize,
    value: OperationValue,
}

impl Operation {
    /// Plan an insertion of `text` at `position`.
    #[must_use]
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            value: OperationValue::Insert(text.into()),
        }
    }

    /// Plan the removal of `len` bytes starting at `position`.
    #[must_use]
    pub const fn delete(position: usize, len: usize) -> Self {
        Self {
            position,
            value: OperationValue::Delete(len),
        }
    }

    /// Byte offset into the raw message.
    #[must_use]
    pub const fn position(&self) -> usize { self.position }

    #[must_use]
    pub const fn value(&self) -> &OperationValue { &self.value }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self.value {
            OperationValue::Insert(_) => OperationKind::Insert,
            OperationValue::Delete(_) => OperationKind::Delete,
        }
    }
}
