//! Protocol-level errors for netlink message processing
//!
//! Each variant carries the context needed to debug malformed traffic:
//! what was declared, what was available, and where in the stream it
//! happened.

use thiserror::Error;

/// Errors raised while building or walking netlink messages
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Raw bytes are too short to contain the expected record
    #[error("Message too small: need {need} bytes, got {got} (context: {context})")]
    MessageTooSmall {
        need: usize,
        got: usize,
        context: String,
    },

    /// Declared total length is below the minimum for the expected sub-header
    #[error("Invalid header: declared length {declared} is below minimum {minimum}")]
    InvalidHeader { declared: usize, minimum: usize },

    /// Growing the message would run past its fixed capacity
    #[error("Capacity exceeded: need {requested} more bytes, {used} of {capacity} already used")]
    CapacityExceeded {
        requested: usize,
        used: usize,
        capacity: usize,
    },

    /// Attribute length is inconsistent with the remaining stream
    #[error("Malformed attribute at offset {offset}: declared length {declared_len}, {remaining} bytes remaining (action: {suggested_action})")]
    MalformedAttribute {
        offset: usize,
        declared_len: usize,
        remaining: usize,
        suggested_action: String,
    },

    /// Attribute payload does not fit the 16-bit length field
    #[error("Attribute {attr_type} too large: {size} bytes exceeds the 16-bit length field")]
    AttributeTooLarge { attr_type: u16, size: usize },

    /// Nest token does not point at an open nest of this message
    #[error("Nest at offset {offset} is not open in this message (length {len})")]
    NestNotOpen { offset: usize, len: usize },
}

impl ProtocolError {
    pub fn message_too_small(need: usize, got: usize, context: impl Into<String>) -> Self {
        Self::MessageTooSmall {
            need,
            got,
            context: context.into(),
        }
    }

    /// Create a MalformedAttribute error with a hint derived from the mismatch
    pub fn malformed_attribute(offset: usize, declared_len: usize, remaining: usize) -> Self {
        let suggested_action = if declared_len < crate::NLA_HDRLEN {
            "length below attribute header size - stream is corrupt or misaligned"
        } else if declared_len > remaining * 2 {
            "likely corrupted attribute length field"
        } else {
            "truncated message - check the enclosing message or nest length"
        };

        Self::MalformedAttribute {
            offset,
            declared_len,
            remaining,
            suggested_action: suggested_action.to_string(),
        }
    }

    pub fn capacity_exceeded(requested: usize, used: usize, capacity: usize) -> Self {
        Self::CapacityExceeded {
            requested,
            used,
            capacity,
        }
    }
}

/// Result type for protocol operations
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
