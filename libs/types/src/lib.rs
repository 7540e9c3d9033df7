//! # Netlink Wire Types
//!
//! Bit-exact record layouts and constants for netlink message framing.
//!
//! ## Design Philosophy
//!
//! - **Wire Fidelity**: Every record matches the kernel layout byte for byte
//! - **Zero-Copy Views**: Records are `Unaligned` zerocopy structs, so they can
//!   be viewed in place at any offset of a message buffer
//! - **Host Byte Order**: Netlink fields travel in native endianness
//! - **No Logic**: Size arithmetic, iteration and dumping live in the codec crate
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────┬────────────────┬──────────────────────────────┐
//! │ NlMsgHdr     │ family header  │ attributes (NlAttr + data)   │
//! │ (16 bytes)   │ (e.g. genl, 4) │ each padded to 4 bytes       │
//! └──────────────┴────────────────┴──────────────────────────────┘
//! ```

pub mod protocol;

pub use protocol::*;
