//! Protocol constants
//!
//! Values are fixed by the kernel ABI and must never change.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Alignment unit of messages and attributes
pub const NLMSG_ALIGNTO: usize = 4;

/// Length of the netlink message header
pub const NLMSG_HDRLEN: usize = 16;

/// Alignment unit of attributes
pub const NLA_ALIGNTO: usize = 4;

/// Length of the attribute header
pub const NLA_HDRLEN: usize = 4;

/// Length of the generic netlink sub-header
pub const GENL_HDRLEN: usize = 4;

/// Length of the error payload (error code + original header)
pub const NLMSGERR_LEN: usize = 20;

/// Protocol id of a message that has not been bound to a socket family
pub const NL_PROTOCOL_UNSET: i32 = -1;

/// Routing/device hook
pub const NETLINK_ROUTE: i32 = 0;

/// Netfilter subsystem
pub const NETLINK_NETFILTER: i32 = 12;

/// Generic netlink, the only family whose payload starts with [`crate::GenlMsgHdr`]
pub const NETLINK_GENERIC: i32 = 16;

/// Address family of netlink sockets
pub const AF_NETLINK: u16 = 16;

// Header flag bits (nlmsg_flags)

/// It is a request message
pub const NLM_F_REQUEST: u16 = 0x01;
/// Multipart message, terminated by NLMSG_DONE
pub const NLM_F_MULTI: u16 = 0x02;
/// Reply with ack, with zero or error code
pub const NLM_F_ACK: u16 = 0x04;
/// Echo this request
pub const NLM_F_ECHO: u16 = 0x08;
/// Dump was inconsistent due to sequence change
pub const NLM_F_DUMP_INTR: u16 = 0x10;
/// Dump was filtered as requested
pub const NLM_F_DUMP_FILTERED: u16 = 0x20;

// Modifiers to GET request
pub const NLM_F_ROOT: u16 = 0x100;
pub const NLM_F_MATCH: u16 = 0x200;
pub const NLM_F_ATOMIC: u16 = 0x400;
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

// Modifiers to NEW request
pub const NLM_F_REPLACE: u16 = 0x100;
pub const NLM_F_EXCL: u16 = 0x200;
pub const NLM_F_CREATE: u16 = 0x400;
pub const NLM_F_APPEND: u16 = 0x800;

// Attribute type bits (nla_type)

/// Attribute payload is itself an attribute stream
pub const NLA_F_NESTED: u16 = 1 << 15;
/// Attribute payload is stored in network byte order
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
/// Mask selecting the concrete attribute type
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

// Message metadata flags (not on the wire)

/// Sender credentials were captured by the receive path
pub const NL_MSG_CRED_PRESENT: u32 = 1;

/// Control message types shared by every netlink family
///
/// Types below 0x10 are reserved for control messages.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum ControlMsgType {
    /// Nothing, ignore
    Noop = 1,
    /// Error report, payload is an error code plus the offending header
    Error = 2,
    /// End of a multipart message
    Done = 3,
    /// Data lost
    Overrun = 4,
}

impl ControlMsgType {
    /// Display name used in dumps
    pub fn name(self) -> &'static str {
        match self {
            ControlMsgType::Noop => "NOOP",
            ControlMsgType::Error => "ERROR",
            ControlMsgType::Done => "DONE",
            ControlMsgType::Overrun => "OVERRUN",
        }
    }
}

pub const NLMSG_NOOP: u16 = ControlMsgType::Noop as u16;
pub const NLMSG_ERROR: u16 = ControlMsgType::Error as u16;
pub const NLMSG_DONE: u16 = ControlMsgType::Done as u16;
pub const NLMSG_OVERRUN: u16 = ControlMsgType::Overrun as u16;

/// First message type available to families
pub const NLMSG_MIN_TYPE: u16 = 0x10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_type_roundtrip() {
        for raw in 1u16..=4 {
            let ty = ControlMsgType::try_from(raw).unwrap();
            assert_eq!(u16::from(ty), raw);
        }
        assert!(ControlMsgType::try_from(0u16).is_err());
        assert!(ControlMsgType::try_from(NLMSG_MIN_TYPE).is_err());
    }

    #[test]
    fn test_type_mask_strips_flag_bits() {
        assert_eq!(NLA_TYPE_MASK, 0x3fff);
        assert_eq!((5 | NLA_F_NESTED) & NLA_TYPE_MASK, 5);
        assert_eq!((7 | NLA_F_NET_BYTEORDER | NLA_F_NESTED) & NLA_TYPE_MASK, 7);
    }

    #[test]
    fn test_dump_is_root_and_match() {
        assert_eq!(NLM_F_DUMP, 0x300);
    }
}
