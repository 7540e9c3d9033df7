//! # Attribute Stream Parsing
//!
//! ## Purpose
//!
//! Lazy, zero-copy traversal of a netlink attribute stream. Each step reads a
//! 4-byte [`NlAttr`] header, yields a view over exactly the declared length,
//! and advances by that length rounded up to the attribute alignment.
//!
//! ## End of Stream vs Malformed Stream
//!
//! - Fewer than [`NLA_HDRLEN`] bytes left: normal end, iteration stops.
//! - Declared length below the header size or past the remaining bytes: the
//!   iterator yields one [`ProtocolError::MalformedAttribute`] and then stops.
//!   [`AttrIter::remaining`] still reports the unconsumed bytes.
//!
//! ## Nesting
//!
//! An attribute with [`NLA_F_NESTED`](netlink_types::NLA_F_NESTED) set carries
//! another attribute stream as its payload; [`Attr::nested`] starts a fresh
//! iterator over it.

use std::iter::FusedIterator;

use netlink_types::{NlAttr, NLA_HDRLEN};
use zerocopy::FromBytes;

use crate::error::{ProtocolError, ProtocolResult};
use crate::layout::nla_align;

/// Shape of an attribute as seen by consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Type tag is zero, the attribute only fills space
    Padding,
    /// Opaque payload
    Leaf,
    /// Payload is an attribute stream
    Nested,
}

/// Borrowed view of one attribute inside a stream
#[derive(Debug, Clone, Copy)]
pub struct Attr<'a> {
    header: &'a NlAttr,
    payload: &'a [u8],
    padding: &'a [u8],
    offset: usize,
}

impl<'a> Attr<'a> {
    pub fn header(&self) -> &'a NlAttr {
        self.header
    }

    /// Type tag including flag bits
    pub fn raw_type(&self) -> u16 {
        self.header.raw_type()
    }

    /// Concrete type with flag bits masked off
    pub fn attr_type(&self) -> u16 {
        self.header.attr_type()
    }

    pub fn is_nested(&self) -> bool {
        self.header.is_nested()
    }

    pub fn kind(&self) -> AttrKind {
        if self.raw_type() == 0 {
            AttrKind::Padding
        } else if self.is_nested() {
            AttrKind::Nested
        } else {
            AttrKind::Leaf
        }
    }

    /// Payload length (declared length minus the attribute header)
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Alignment bytes between this attribute and the next one
    pub fn padding(&self) -> &'a [u8] {
        self.padding
    }

    pub fn padlen(&self) -> usize {
        self.padding.len()
    }

    /// Offset of the attribute header within the stream it was read from
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Iterate the payload as an attribute stream
    pub fn nested(&self) -> AttrIter<'a> {
        AttrIter::new(self.payload)
    }

    pub fn get_u8(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    pub fn get_u16(&self) -> Option<u16> {
        self.payload
            .get(..2)
            .and_then(|b| b.try_into().ok())
            .map(u16::from_ne_bytes)
    }

    pub fn get_u32(&self) -> Option<u32> {
        self.payload
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_ne_bytes)
    }

    pub fn get_u64(&self) -> Option<u64> {
        self.payload
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .map(u64::from_ne_bytes)
    }

    /// Payload as a string, up to the first NUL
    pub fn get_string(&self) -> Option<&'a str> {
        let end = self
            .payload
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.payload.len());
        std::str::from_utf8(&self.payload[..end]).ok()
    }
}

/// Iterator over an attribute stream
///
/// Yields `Ok(Attr)` for each well-formed attribute, at most one `Err` for a
/// malformed one, then `None` forever.
#[derive(Debug, Clone)]
pub struct AttrIter<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> AttrIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }

    /// Bytes not yet consumed by the iterator
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = ProtocolResult<Attr<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let rest = &self.data[self.pos..];
        let header = match NlAttr::ref_from_prefix(rest) {
            Some(header) => header,
            None => {
                self.done = true;
                return None;
            }
        };

        let declared = header.len() as usize;
        if declared < NLA_HDRLEN || declared > rest.len() {
            self.done = true;
            return Some(Err(ProtocolError::malformed_attribute(
                self.pos,
                declared,
                rest.len(),
            )));
        }

        let advance = nla_align(declared).min(rest.len());
        let attr = Attr {
            header,
            payload: &rest[NLA_HDRLEN..declared],
            padding: &rest[declared..advance],
            offset: self.pos,
        };
        self.pos += advance;

        Some(Ok(attr))
    }
}

impl FusedIterator for AttrIter<'_> {}

/// Find the first attribute of a given type in a stream
///
/// Flag bits are masked off both sides before comparing and padding
/// attributes never match. A malformed stream is reported rather than
/// treated as "not found".
pub fn find_attr(data: &[u8], attr_type: u16) -> ProtocolResult<Option<Attr<'_>>> {
    let wanted = attr_type & netlink_types::NLA_TYPE_MASK;
    for attr in AttrIter::new(data) {
        let attr = attr?;
        // Type 0 only fills space, flag bits or not
        if attr.kind() == AttrKind::Padding || attr.attr_type() == 0 {
            continue;
        }
        if attr.attr_type() == wanted {
            return Ok(Some(attr));
        }
    }
    Ok(None)
}
