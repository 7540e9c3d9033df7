//! # Attribute Construction
//!
//! ## Purpose
//!
//! Appends attributes to an [`NlMsg`], including nested attribute streams.
//! Every attribute starts on an aligned offset and is followed by zeroed
//! padding, so the result parses with [`AttrIter`](crate::AttrIter).
//!
//! ## Nesting
//!
//! ```text
//! let nest = msg.nest_start(IFLA_LINKINFO)?;   // header with NLA_F_NESTED, len 4
//! msg.put_string(IFLA_INFO_KIND, "veth")?;     // children land inside the nest
//! msg.nest_end(nest)?;                         // nest length fixed up
//! ```

use netlink_types::{NlAttr, NLA_F_NESTED, NLA_HDRLEN, NLMSG_HDRLEN};
use tracing::debug;
use zerocopy::{AsBytes, FromBytes};

use crate::error::{ProtocolError, ProtocolResult};
use crate::layout::{align, nla_attr_size, nla_total_size};
use crate::msg::NlMsg;

/// Position of an open nest, returned by [`NlMsg::nest_start`]
#[must_use = "an open nest must be closed with nest_end or nest_cancel"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestToken {
    offset: usize,
    attr_type: u16,
}

impl NestToken {
    /// Offset of the nest's attribute header within the message
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn attr_type(&self) -> u16 {
        self.attr_type
    }
}

impl NlMsg {
    /// Reserve an aligned attribute with room for `payload_len` bytes
    ///
    /// Returns the payload region. The attribute header is written; the
    /// trailing pad bytes are zeroed.
    pub fn reserve_attr(&mut self, attr_type: u16, payload_len: usize) -> ProtocolResult<&mut [u8]> {
        let declared = nla_attr_size(payload_len);
        let declared_u16 = u16::try_from(declared).map_err(|_| ProtocolError::AttributeTooLarge {
            attr_type,
            size: payload_len,
        })?;

        let used = self.len();
        let lead = align(used) - used;
        self.reserve(lead + nla_total_size(payload_len), 0)?;

        let start = used + lead;
        let attr = &mut self.buf[start..start + declared];
        attr[..NLA_HDRLEN].copy_from_slice(NlAttr::new(declared_u16, attr_type).as_bytes());
        debug!(
            "Reserved attribute type={}, payload={} at offset {}",
            attr_type & netlink_types::NLA_TYPE_MASK,
            payload_len,
            start
        );

        Ok(&mut attr[NLA_HDRLEN..])
    }

    /// Append an attribute with the given payload
    pub fn put_attr(&mut self, attr_type: u16, data: &[u8]) -> ProtocolResult<()> {
        self.reserve_attr(attr_type, data.len())?.copy_from_slice(data);
        Ok(())
    }

    pub fn put_u8(&mut self, attr_type: u16, value: u8) -> ProtocolResult<()> {
        self.put_attr(attr_type, &[value])
    }

    pub fn put_u16(&mut self, attr_type: u16, value: u16) -> ProtocolResult<()> {
        self.put_attr(attr_type, &value.to_ne_bytes())
    }

    pub fn put_u32(&mut self, attr_type: u16, value: u32) -> ProtocolResult<()> {
        self.put_attr(attr_type, &value.to_ne_bytes())
    }

    pub fn put_u64(&mut self, attr_type: u16, value: u64) -> ProtocolResult<()> {
        self.put_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a NUL-terminated string attribute
    pub fn put_string(&mut self, attr_type: u16, value: &str) -> ProtocolResult<()> {
        let payload = self.reserve_attr(attr_type, value.len() + 1)?;
        payload[..value.len()].copy_from_slice(value.as_bytes());
        payload[value.len()] = 0;
        Ok(())
    }

    /// Append an attribute without payload
    pub fn put_flag(&mut self, attr_type: u16) -> ProtocolResult<()> {
        self.put_attr(attr_type, &[])
    }

    /// Open a nested attribute; later attributes become its children
    pub fn nest_start(&mut self, attr_type: u16) -> ProtocolResult<NestToken> {
        let used = self.len();
        let offset = align(used);
        self.put_attr(attr_type | NLA_F_NESTED, &[])?;
        Ok(NestToken { offset, attr_type })
    }

    /// Close a nest, fixing its length to cover every child
    ///
    /// Returns the nest's declared length.
    pub fn nest_end(&mut self, nest: NestToken) -> ProtocolResult<usize> {
        let used = self.open_nest(&nest)?;

        let nest_len = used - nest.offset;
        let nest_len_u16 = u16::try_from(nest_len).map_err(|_| ProtocolError::AttributeTooLarge {
            attr_type: nest.attr_type,
            size: nest_len,
        })?;

        let header = NlAttr::mut_from_prefix(&mut self.buf[nest.offset..]).ok_or(
            ProtocolError::NestNotOpen {
                offset: nest.offset,
                len: used,
            },
        )?;
        header.set_len(nest_len_u16);
        debug!("Closed nest type={}, len={}", nest.attr_type, nest_len);

        Ok(nest_len)
    }

    /// Drop a nest and everything appended since it was opened
    pub fn nest_cancel(&mut self, nest: NestToken) -> ProtocolResult<()> {
        let used = self.open_nest(&nest)?;

        self.buf[nest.offset..used].fill(0);
        self.hdr_mut().set_len(nest.offset as u32);
        debug!("Cancelled nest type={} at offset {}", nest.attr_type, nest.offset);
        Ok(())
    }

    /// Check that `nest` points at a nest header opened in this message
    ///
    /// Returns the bytes in use.
    fn open_nest(&self, nest: &NestToken) -> ProtocolResult<usize> {
        let used = self.len().min(self.max_size());
        let not_open = || ProtocolError::NestNotOpen {
            offset: nest.offset,
            len: used,
        };

        if nest.offset < NLMSG_HDRLEN || nest.offset + NLA_HDRLEN > used {
            return Err(not_open());
        }
        let header = NlAttr::ref_from_prefix(&self.buf[nest.offset..]).ok_or_else(not_open)?;
        if header.raw_type() != nest.attr_type | NLA_F_NESTED {
            return Err(not_open());
        }

        Ok(used)
    }
}
