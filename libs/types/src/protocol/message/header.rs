//! Message Header Implementation

use zerocopy::byteorder::{NativeEndian, I32, U16, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::protocol::constants::{NLMSGERR_LEN, NLMSG_HDRLEN};

/// Netlink message header (16 bytes)
///
/// Fields are stored in host byte order behind accessors so the struct can be
/// viewed in place at any offset of a byte buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct NlMsgHdr {
    nlmsg_len: U32<NativeEndian>,
    nlmsg_type: U16<NativeEndian>,
    nlmsg_flags: U16<NativeEndian>,
    nlmsg_seq: U32<NativeEndian>,
    nlmsg_pid: U32<NativeEndian>,
}

const _: () = assert!(std::mem::size_of::<NlMsgHdr>() == NLMSG_HDRLEN);

impl NlMsgHdr {
    /// Header size in bytes
    pub const SIZE: usize = NLMSG_HDRLEN;

    /// Build a header from its five scalar fields
    pub fn new(len: u32, msg_type: u16, flags: u16, seq: u32, pid: u32) -> Self {
        Self {
            nlmsg_len: U32::new(len),
            nlmsg_type: U16::new(msg_type),
            nlmsg_flags: U16::new(flags),
            nlmsg_seq: U32::new(seq),
            nlmsg_pid: U32::new(pid),
        }
    }

    /// Header template carrying only a type and flags
    pub fn with_type(msg_type: u16, flags: u16) -> Self {
        Self::new(0, msg_type, flags, 0, 0)
    }

    /// Total length of the message including this header
    pub fn len(&self) -> u32 {
        self.nlmsg_len.get()
    }

    pub fn msg_type(&self) -> u16 {
        self.nlmsg_type.get()
    }

    pub fn flags(&self) -> u16 {
        self.nlmsg_flags.get()
    }

    pub fn seq(&self) -> u32 {
        self.nlmsg_seq.get()
    }

    /// Originating port id
    pub fn pid(&self) -> u32 {
        self.nlmsg_pid.get()
    }

    pub fn set_len(&mut self, len: u32) {
        self.nlmsg_len.set(len);
    }

    pub fn set_msg_type(&mut self, msg_type: u16) {
        self.nlmsg_type.set(msg_type);
    }

    pub fn set_flags(&mut self, flags: u16) {
        self.nlmsg_flags.set(flags);
    }

    pub fn set_seq(&mut self, seq: u32) {
        self.nlmsg_seq.set(seq);
    }

    pub fn set_pid(&mut self, pid: u32) {
        self.nlmsg_pid.set(pid);
    }

    /// True when the declared length can at least hold the header itself
    pub fn has_valid_len(&self) -> bool {
        self.len() as usize >= Self::SIZE
    }
}

impl Default for NlMsgHdr {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

/// Payload of an `NLMSG_ERROR` message (20 bytes)
///
/// `error` is zero for an acknowledgement and a negated errno otherwise.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct NlMsgErr {
    error: I32<NativeEndian>,
    msg: NlMsgHdr,
}

const _: () = assert!(std::mem::size_of::<NlMsgErr>() == NLMSGERR_LEN);

impl NlMsgErr {
    /// Error payload size in bytes
    pub const SIZE: usize = NLMSGERR_LEN;

    pub fn new(error: i32, msg: NlMsgHdr) -> Self {
        Self {
            error: I32::new(error),
            msg,
        }
    }

    /// Negated errno, or zero for an ack
    pub fn error(&self) -> i32 {
        self.error.get()
    }

    /// Header of the request that caused this error
    pub fn original(&self) -> &NlMsgHdr {
        &self.msg
    }
}
