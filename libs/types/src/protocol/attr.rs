//! Attribute header record

use zerocopy::byteorder::{NativeEndian, U16};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::protocol::constants::{NLA_F_NESTED, NLA_F_NET_BYTEORDER, NLA_HDRLEN, NLA_TYPE_MASK};

/// Attribute header (4 bytes)
///
/// `nla_len` counts this header plus the payload but not the trailing
/// alignment padding. The two top bits of `nla_type` are flags.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct NlAttr {
    nla_len: U16<NativeEndian>,
    nla_type: U16<NativeEndian>,
}

const _: () = assert!(std::mem::size_of::<NlAttr>() == NLA_HDRLEN);

impl NlAttr {
    /// Attribute header size in bytes
    pub const SIZE: usize = NLA_HDRLEN;

    pub fn new(len: u16, raw_type: u16) -> Self {
        Self {
            nla_len: U16::new(len),
            nla_type: U16::new(raw_type),
        }
    }

    /// Declared length, header included
    pub fn len(&self) -> u16 {
        self.nla_len.get()
    }

    pub fn set_len(&mut self, len: u16) {
        self.nla_len.set(len);
    }

    /// Type tag including flag bits
    pub fn raw_type(&self) -> u16 {
        self.nla_type.get()
    }

    /// Concrete type with the flag bits masked off
    pub fn attr_type(&self) -> u16 {
        self.raw_type() & NLA_TYPE_MASK
    }

    pub fn is_nested(&self) -> bool {
        self.raw_type() & NLA_F_NESTED != 0
    }

    pub fn is_net_byteorder(&self) -> bool {
        self.raw_type() & NLA_F_NET_BYTEORDER != 0
    }
}
