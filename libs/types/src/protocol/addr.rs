//! Message metadata carried beside the wire bytes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::protocol::constants::AF_NETLINK;

/// Netlink socket address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SockaddrNl {
    pub family: u16,
    /// Port id, 0 addresses the kernel
    pub pid: u32,
    /// Multicast group mask
    pub groups: u32,
}

impl SockaddrNl {
    pub fn new(pid: u32, groups: u32) -> Self {
        Self {
            family: AF_NETLINK,
            pid,
            groups,
        }
    }

    /// Address of the kernel
    pub fn kernel() -> Self {
        Self::new(0, 0)
    }
}

impl Default for SockaddrNl {
    fn default() -> Self {
        Self::kernel()
    }
}

/// Sender credentials (`struct ucred`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ucred {
    pub pid: i32,
    pub uid: u32,
    pub gid: u32,
}
