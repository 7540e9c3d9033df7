//! Netlink protocol records
//!
//! Header, attribute, generic sub-header and error payload records, plus the
//! metadata types carried next to a message (addresses, credentials).

pub mod addr;
pub mod attr;
pub mod constants;
pub mod genl;
pub mod message;

pub use addr::{SockaddrNl, Ucred};
pub use attr::NlAttr;
pub use constants::*;
pub use genl::GenlMsgHdr;
pub use message::{NlMsgErr, NlMsgHdr};
