//! # Netlink Message Codec
//!
//! ## Purpose
//!
//! Construction, inspection and debug dumping of netlink messages: the
//! length-prefixed, 4-byte-aligned records exchanged between user space and
//! the kernel. This crate is the "rules" layer on top of the plain wire
//! records in `netlink-types`.
//!
//! ## Architecture Role
//!
//! ```text
//! netlink-types → [netlink-codec] → socket layer
//!      ↑                ↓                ↓
//!  Wire records    Size arithmetic    send/recv
//!  NlMsgHdr        NlMsg buffers      (not here)
//!  NlAttr          Attribute parsing
//!  Constants       Debug dumps
//! ```
//!
//! ## What This Crate Contains
//! - Size and alignment arithmetic ([`layout`])
//! - [`NlMsg`]: fixed-capacity message buffer with metadata
//! - Attribute construction ([`NestToken`], `put_*`) and zero-copy parsing ([`AttrIter`])
//! - Process-wide allocation defaults ([`MsgConfig`])
//! - Human-readable dumps ([`MsgDumper`], [`nl_msg_dump`])
//!
//! ## What This Crate Does NOT Contain
//! - Sockets, send/receive loops or multicast membership
//! - Family-specific message caches (plug them in through [`MsgTypeResolver`])
//!
//! ## Example
//!
//! ```rust
//! use netlink_codec::{NlMsg, NLM_F_REQUEST};
//!
//! let mut msg = NlMsg::alloc_simple(0x10, NLM_F_REQUEST);
//! msg.put_string(3, "lo")?;
//! assert_eq!(msg.len(), 24);
//! # Ok::<(), netlink_codec::ProtocolError>(())
//! ```

pub mod attr;
pub mod builder;
pub mod config;
pub mod dump;
pub mod error;
pub mod layout;
pub mod msg;
pub mod names;
pub mod resolver;
pub mod sink;

// Wire records and constants
pub use netlink_types::*;

pub use attr::{find_attr, Attr, AttrIter, AttrKind};
pub use builder::NestToken;
pub use config::{default_size, page_size, set_default_size, MsgConfig};
pub use dump::{dump_to_lines, nl_msg_dump, MsgDumper};
pub use error::{ProtocolError, ProtocolResult};
pub use msg::{NlMsg, SharedMsg};
pub use names::{msg_flags_to_str, msg_type_to_str, strerror};
pub use resolver::{CacheOps, CacheOpsRegistry, MsgTypeInfo, MsgTypeResolver, NoResolver};
pub use sink::{DumpSink, TracingSink};
