//! # Message Header and Error Payload
//!
//! ## Purpose
//!
//! Defines the fixed 16-byte header that starts every netlink message and the
//! error payload carried by `NLMSG_ERROR` replies.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────┬──────────┬───────────┬──────────┬──────────┐
//! │ len (u32)  │ type u16 │ flags u16 │ seq u32  │ pid u32  │
//! └────────────┴──────────┴───────────┴──────────┴──────────┘
//!                        16 bytes, host byte order
//! ```
//!
//! `len` counts the header plus the payload. A header whose `len` is below
//! [`NLMSG_HDRLEN`](crate::NLMSG_HDRLEN) is invalid and must be rejected
//! before the payload is touched.
//!
//! ## Error Payload
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┐
//! │ error (i32)  │ copy of the request NlMsgHdr │
//! └──────────────┴──────────────────────────────┘
//! ```

pub mod header;

pub use header::*;
