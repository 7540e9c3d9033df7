//! Generic netlink sub-header

use zerocopy::byteorder::{NativeEndian, U16};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::protocol::constants::GENL_HDRLEN;

/// Generic netlink header (4 bytes)
///
/// Present at the start of the payload of every `NETLINK_GENERIC` message.
/// Nothing in the netlink header announces it; the socket protocol does.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct GenlMsgHdr {
    pub cmd: u8,
    pub version: u8,
    reserved: U16<NativeEndian>,
}

const _: () = assert!(std::mem::size_of::<GenlMsgHdr>() == GENL_HDRLEN);

impl GenlMsgHdr {
    pub const SIZE: usize = GENL_HDRLEN;

    pub fn new(cmd: u8, version: u8) -> Self {
        Self {
            cmd,
            version,
            reserved: U16::new(0),
        }
    }

    pub fn reserved(&self) -> u16 {
        self.reserved.get()
    }

    pub fn set_reserved(&mut self, reserved: u16) {
        self.reserved.set(reserved);
    }
}
