//! # Message Layout Arithmetic
//!
//! ## Purpose
//!
//! Pure size and padding computations that define where every byte of a
//! netlink message lives. Everything else in the crate derives offsets from
//! these functions, so they must agree bit for bit with the kernel.
//!
//! ## Layout
//!
//! ```text
//! <----------------------- total_size(payload) ----------------------->
//! <------------------- msg_size(payload) ------------------>
//! ┌──────────────┬──────────────────┬─────────────────────┬──────────┐
//! │ NlMsgHdr     │ family header    │ attribute region    │ pad      │
//! └──────────────┴──────────────────┴─────────────────────┴──────────┘
//!                ^ payload          ^ attr_data_offset(hdrlen)
//! ```
//!
//! Alignment is always [`NLMSG_ALIGNTO`] (4 bytes). Rounding is
//! `(n + (align - 1)) & !(align - 1)`.

use netlink_types::{NlMsgHdr, NLA_ALIGNTO, NLA_HDRLEN, NLMSG_ALIGNTO, NLMSG_HDRLEN};

/// Round a length up to the message alignment boundary
#[inline]
pub const fn align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of a message with the given payload, without trailing padding
#[inline]
pub const fn msg_size(payload: usize) -> usize {
    NLMSG_HDRLEN + payload
}

/// Size of a message with the given payload, padding included
#[inline]
pub const fn total_size(payload: usize) -> usize {
    align(msg_size(payload))
}

/// Number of padding bytes after a payload of the given length
#[inline]
pub const fn padlen(payload: usize) -> usize {
    total_size(payload) - msg_size(payload)
}

/// Length of the payload announced by a header
///
/// Callers are expected to check [`NlMsgHdr::has_valid_len`] first; a header
/// shorter than itself reports an empty payload.
#[inline]
pub fn payload_len(hdr: &NlMsgHdr) -> usize {
    (hdr.len() as usize).saturating_sub(NLMSG_HDRLEN)
}

/// Offset from the start of the message to the first attribute
#[inline]
pub const fn attr_data_offset(hdrlen: usize) -> usize {
    NLMSG_HDRLEN + align(hdrlen)
}

/// Length of the attribute region after a family header of `hdrlen` bytes
///
/// Clamps at zero: a message may carry only its family header.
#[inline]
pub fn attr_len(hdr: &NlMsgHdr, hdrlen: usize) -> usize {
    payload_len(hdr).saturating_sub(align(hdrlen))
}

/// True if the header announces room for a family header of `hdrlen` bytes
#[inline]
pub fn valid_hdr(hdr: &NlMsgHdr, hdrlen: usize) -> bool {
    hdr.len() as usize >= total_size(hdrlen)
}

/// Round a length up to the attribute alignment boundary
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Declared length of an attribute carrying `payload` bytes
#[inline]
pub const fn nla_attr_size(payload: usize) -> usize {
    NLA_HDRLEN + payload
}

/// Stream footprint of an attribute carrying `payload` bytes
#[inline]
pub const fn nla_total_size(payload: usize) -> usize {
    nla_align(nla_attr_size(payload))
}

/// Padding bytes that follow an attribute carrying `payload` bytes
#[inline]
pub const fn nla_padlen(payload: usize) -> usize {
    nla_total_size(payload) - nla_attr_size(payload)
}
