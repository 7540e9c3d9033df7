//! # Netlink Message Buffer
//!
//! ## Purpose
//!
//! [`NlMsg`] owns one contiguous, zero-initialised byte region whose size is
//! fixed at allocation time. The netlink header lives at offset 0 and is
//! accessed in place; the header's `nlmsg_len` marks how much of the region
//! is in use. Growth is bounded by the capacity and never reallocates.
//!
//! ## Lifecycle
//!
//! ```text
//! alloc / alloc_size / alloc_with ─┐
//! inherit / alloc_simple ──────────┼─→ NlMsg ─→ reserve / append / put_attr ─→ as_bytes()
//! convert(raw bytes) ──────────────┘     │
//!                                        └─→ share() → Rc<RefCell<NlMsg>>
//! ```
//!
//! Ownership replaces manual reference counting: a message is freed when its
//! last owner drops it. [`NlMsg::share`] produces a counted handle whose
//! strong count starts at 1.
//!
//! ## Metadata
//!
//! Besides the wire bytes a message carries its socket protocol (unset is
//! `-1`), optional source and destination addresses, and sender credentials
//! that are only visible once the receive path has captured them.

use std::cell::RefCell;
use std::rc::Rc;

use netlink_types::{
    NlMsgHdr, SockaddrNl, Ucred, NLMSG_HDRLEN, NL_MSG_CRED_PRESENT, NL_PROTOCOL_UNSET,
};
use tracing::debug;
use zerocopy::FromBytes;

use crate::attr::{find_attr, Attr, AttrIter};
use crate::config::{self, MsgConfig};
use crate::error::{ProtocolError, ProtocolResult};
use crate::layout::{align, attr_data_offset, total_size, valid_hdr};

/// Counted handle to a message shared between owners
pub type SharedMsg = Rc<RefCell<NlMsg>>;

/// Netlink message with fixed capacity
#[derive(Debug, Clone)]
pub struct NlMsg {
    pub(crate) buf: Vec<u8>,
    protocol: i32,
    flags: u32,
    src: Option<SockaddrNl>,
    dst: Option<SockaddrNl>,
    creds: Option<Ucred>,
}

impl NlMsg {
    /// Allocate a message using the process-wide default capacity
    pub fn alloc() -> Self {
        Self::alloc_size(config::default_size())
    }

    /// Allocate a message using an explicit configuration
    pub fn alloc_with(config: &MsgConfig) -> Self {
        Self::alloc_size(config.default_size)
    }

    /// Allocate an empty message able to hold `len` bytes in total
    ///
    /// `len` is raised to the header size if smaller. The header is zeroed
    /// except for `nlmsg_len`, which covers the header alone.
    pub fn alloc_size(len: usize) -> Self {
        let len = len.max(NLMSG_HDRLEN);
        let mut msg = Self {
            buf: vec![0u8; len],
            protocol: NL_PROTOCOL_UNSET,
            flags: 0,
            src: None,
            dst: None,
            creds: None,
        };
        msg.hdr_mut().set_len(total_size(0) as u32);
        debug!("Allocated new message, maxlen={}", len);
        msg
    }

    /// Allocate a message and copy type, flags, sequence and port from a template
    ///
    /// The template's length and payload are not copied.
    pub fn inherit(template: Option<&NlMsgHdr>) -> Self {
        let mut msg = Self::alloc();
        if let Some(template) = template {
            let hdr = msg.hdr_mut();
            hdr.set_msg_type(template.msg_type());
            hdr.set_flags(template.flags());
            hdr.set_seq(template.seq());
            hdr.set_pid(template.pid());
        }
        msg
    }

    /// Allocate a message carrying only a type and flags
    pub fn alloc_simple(msg_type: u16, flags: u16) -> Self {
        let msg = Self::inherit(Some(&NlMsgHdr::with_type(msg_type, flags)));
        debug!("Allocated new simple message, type={}, flags={:#x}", msg_type, flags);
        msg
    }

    /// Adopt raw message bytes, typically as received from a socket
    ///
    /// The vector becomes the message storage: bytes past `nlmsg_len` are
    /// dropped and the region is padded to the alignment boundary.
    pub fn convert(mut raw: Vec<u8>) -> ProtocolResult<Self> {
        let hdr = NlMsgHdr::read_from_prefix(raw.as_slice()).ok_or_else(|| {
            ProtocolError::message_too_small(NLMSG_HDRLEN, raw.len(), "netlink header")
        })?;

        let declared = hdr.len() as usize;
        if declared < NLMSG_HDRLEN {
            return Err(ProtocolError::InvalidHeader {
                declared,
                minimum: NLMSG_HDRLEN,
            });
        }
        if declared > raw.len() {
            return Err(ProtocolError::message_too_small(
                declared,
                raw.len(),
                "declared message length",
            ));
        }

        raw.truncate(declared);
        raw.resize(align(declared), 0);
        debug!("Converted raw message, len={}, maxlen={}", declared, raw.len());

        Ok(Self {
            buf: raw,
            protocol: NL_PROTOCOL_UNSET,
            flags: 0,
            src: None,
            dst: None,
            creds: None,
        })
    }

    /// Turn the message into a reference-counted handle
    pub fn share(self) -> SharedMsg {
        Rc::new(RefCell::new(self))
    }

    /// Header view, aliasing the first 16 bytes of the buffer
    pub fn hdr(&self) -> &NlMsgHdr {
        NlMsgHdr::ref_from_prefix(&self.buf).expect("message buffer is never shorter than its header")
    }

    pub fn hdr_mut(&mut self) -> &mut NlMsgHdr {
        NlMsgHdr::mut_from_prefix(&mut self.buf)
            .expect("message buffer is never shorter than its header")
    }

    /// Overwrite the four scalar header fields in one step
    pub fn put_header(&mut self, pid: u32, seq: u32, msg_type: u16, flags: u16) -> &mut NlMsgHdr {
        let hdr = self.hdr_mut();
        hdr.set_msg_type(msg_type);
        hdr.set_flags(flags);
        hdr.set_pid(pid);
        hdr.set_seq(seq);
        debug!(
            "Added netlink header type={}, flags={}, pid={}, seq={}",
            msg_type, flags, pid, seq
        );
        hdr
    }

    /// Bytes in use, as declared by the header
    pub fn len(&self) -> usize {
        self.hdr().len() as usize
    }

    /// True when the message carries no payload
    pub fn is_empty(&self) -> bool {
        self.len() <= NLMSG_HDRLEN
    }

    /// Fixed capacity of the message
    pub fn max_size(&self) -> usize {
        self.buf.len()
    }

    /// Offset of the first byte after the aligned message
    pub fn tail(&self) -> usize {
        align(self.len())
    }

    /// Declared message bytes clamped to the buffer
    fn end(&self) -> usize {
        self.len().min(self.buf.len())
    }

    /// Header plus payload, exactly `nlmsg_len` bytes when the header is sane
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.end()]
    }

    /// Payload following the header
    pub fn data(&self) -> &[u8] {
        let end = self.end().max(NLMSG_HDRLEN);
        &self.buf[NLMSG_HDRLEN..end]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        let end = self.end().max(NLMSG_HDRLEN);
        &mut self.buf[NLMSG_HDRLEN..end]
    }

    /// Grow the message by `len` bytes rounded up to `pad`
    ///
    /// `pad` must be zero (no rounding) or a power of two. The pad bytes are
    /// zeroed. Returns the `len` reserved bytes.
    pub fn reserve(&mut self, len: usize, pad: usize) -> ProtocolResult<&mut [u8]> {
        let tlen = if pad > 0 {
            (len + (pad - 1)) & !(pad - 1)
        } else {
            len
        };

        let used = self.len();
        if used < NLMSG_HDRLEN {
            return Err(ProtocolError::InvalidHeader {
                declared: used,
                minimum: NLMSG_HDRLEN,
            });
        }
        let capacity = self.buf.len();
        let new_len = used
            .checked_add(tlen)
            .filter(|&n| n <= capacity)
            .ok_or_else(|| ProtocolError::capacity_exceeded(tlen, used, capacity))?;
        let new_len_u32 = u32::try_from(new_len)
            .map_err(|_| ProtocolError::capacity_exceeded(tlen, used, capacity))?;

        self.hdr_mut().set_len(new_len_u32);
        self.buf[used + len..new_len].fill(0);
        debug!("Reserved {} ({}) bytes, pad={}, nlmsg_len={}", tlen, len, pad, new_len);

        Ok(&mut self.buf[used..used + len])
    }

    /// Append bytes to the payload
    pub fn append(&mut self, data: &[u8]) -> ProtocolResult<()> {
        self.append_padded(data, 0)
    }

    /// Append bytes to the payload, padding the message to `pad`
    pub fn append_padded(&mut self, data: &[u8], pad: usize) -> ProtocolResult<()> {
        self.reserve(data.len(), pad)?.copy_from_slice(data);
        debug!("Appended {} bytes", data.len());
        Ok(())
    }

    /// Iterate the attributes following a family header of `hdrlen` bytes
    pub fn attrs(&self, hdrlen: usize) -> AttrIter<'_> {
        AttrIter::new(self.attr_region(hdrlen))
    }

    /// First attribute of `attr_type` after a family header of `hdrlen` bytes
    pub fn find_attr(&self, hdrlen: usize, attr_type: u16) -> ProtocolResult<Option<Attr<'_>>> {
        find_attr(self.attr_region(hdrlen), attr_type)
    }

    /// True if the message is long enough for a family header of `hdrlen` bytes
    pub fn valid_hdr(&self, hdrlen: usize) -> bool {
        valid_hdr(self.hdr(), hdrlen)
    }

    fn attr_region(&self, hdrlen: usize) -> &[u8] {
        let end = self.end();
        let start = attr_data_offset(hdrlen).min(end);
        &self.buf[start..end]
    }

    pub fn protocol(&self) -> i32 {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: i32) {
        self.protocol = protocol;
    }

    pub fn src(&self) -> Option<&SockaddrNl> {
        self.src.as_ref()
    }

    pub fn set_src(&mut self, addr: SockaddrNl) {
        self.src = Some(addr);
    }

    pub fn dst(&self) -> Option<&SockaddrNl> {
        self.dst.as_ref()
    }

    pub fn set_dst(&mut self, addr: SockaddrNl) {
        self.dst = Some(addr);
    }

    /// Sender credentials, only once the receive path captured them
    pub fn creds(&self) -> Option<&Ucred> {
        if self.flags & NL_MSG_CRED_PRESENT != 0 {
            self.creds.as_ref()
        } else {
            None
        }
    }

    /// Record sender credentials and mark them present
    pub fn set_creds(&mut self, creds: Ucred) {
        self.creds = Some(creds);
        self.flags |= NL_MSG_CRED_PRESENT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlink_types::{NLM_F_ACK, NLM_F_REQUEST, NETLINK_ROUTE};

    #[test]
    fn test_alloc_size_clamps_to_header() {
        let msg = NlMsg::alloc_size(4);
        assert_eq!(msg.max_size(), 16);
        assert_eq!(msg.len(), 16);
        assert!(msg.is_empty());
    }

    #[test]
    fn test_fresh_header_is_zeroed() {
        let msg = NlMsg::alloc_size(128);
        let hdr = msg.hdr();
        assert_eq!(hdr.len() as usize, total_size(0));
        assert_eq!(hdr.msg_type(), 0);
        assert_eq!(hdr.flags(), 0);
        assert_eq!(hdr.seq(), 0);
        assert_eq!(hdr.pid(), 0);
        assert_eq!(msg.protocol(), NL_PROTOCOL_UNSET);
        assert!(msg.data().is_empty());
    }

    #[test]
    fn test_reserve_pads_and_zeroes() {
        let mut msg = NlMsg::alloc_size(64);
        msg.reserve(5, 4).unwrap().copy_from_slice(&[1, 2, 3, 4, 5]);
        assert_eq!(msg.len(), 24);
        assert_eq!(msg.data(), &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_append_without_padding() {
        let mut msg = NlMsg::alloc_size(64);
        msg.append(&[0xab; 10]).unwrap();
        assert_eq!(msg.len(), 26);
        assert_eq!(msg.tail(), 28);
        assert_eq!(msg.as_bytes().len(), 26);
    }

    #[test]
    fn test_append_failure_leaves_message_untouched() {
        let mut msg = NlMsg::alloc_size(32);
        msg.append(&[1; 8]).unwrap();
        let err = msg.append(&[2; 9]).unwrap_err();
        assert!(matches!(err, ProtocolError::CapacityExceeded { requested: 9, used: 24, capacity: 32 }));
        assert_eq!(msg.len(), 24);
        msg.append(&[3; 8]).unwrap();
        assert_eq!(msg.len(), 32);
    }

    #[test]
    fn test_reserve_refuses_header_shorter_than_itself() {
        let mut msg = NlMsg::alloc_size(64);
        msg.hdr_mut().set_len(0);

        assert!(matches!(
            msg.append(&[1, 1, 1, 1]),
            Err(ProtocolError::InvalidHeader { declared: 0, minimum: 16 })
        ));
        assert!(matches!(
            msg.put_u32(1, 1),
            Err(ProtocolError::InvalidHeader { .. })
        ));
        assert!(msg.nest_start(2).is_err());
        assert_eq!(msg.hdr().len(), 0);
        assert!(msg.buf[..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_put_header() {
        let mut msg = NlMsg::alloc_size(64);
        msg.append(&[0; 4]).unwrap();
        msg.put_header(77, 3, 0x12, NLM_F_REQUEST | NLM_F_ACK);

        let hdr = msg.hdr();
        assert_eq!(hdr.pid(), 77);
        assert_eq!(hdr.seq(), 3);
        assert_eq!(hdr.msg_type(), 0x12);
        assert_eq!(hdr.flags(), NLM_F_REQUEST | NLM_F_ACK);
        // Length is not a header "field" for put_header
        assert_eq!(hdr.len(), 20);
    }

    #[test]
    fn test_header_view_aliases_buffer() {
        let mut msg = NlMsg::alloc_size(64);
        msg.hdr_mut().set_seq(0x0102_0304);
        assert_eq!(&msg.as_bytes()[8..12], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_convert_adopts_bytes() {
        let mut raw = NlMsgHdr::new(22, 0x10, 0, 9, 0).as_bytes_vec();
        raw.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        raw.extend_from_slice(&[0xee; 10]); // trailing garbage past nlmsg_len

        let msg = NlMsg::convert(raw).unwrap();
        assert_eq!(msg.len(), 22);
        assert_eq!(msg.max_size(), 24);
        assert_eq!(msg.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(msg.hdr().seq(), 9);
    }

    #[test]
    fn test_convert_rejects_bad_lengths() {
        assert!(matches!(
            NlMsg::convert(vec![0; 8]),
            Err(ProtocolError::MessageTooSmall { need: 16, got: 8, .. })
        ));
        assert!(matches!(
            NlMsg::convert(NlMsgHdr::new(8, 0, 0, 0, 0).as_bytes_vec()),
            Err(ProtocolError::InvalidHeader { declared: 8, minimum: 16 })
        ));
        assert!(matches!(
            NlMsg::convert(NlMsgHdr::new(40, 0, 0, 0, 0).as_bytes_vec()),
            Err(ProtocolError::MessageTooSmall { need: 40, got: 16, .. })
        ));
    }

    #[test]
    fn test_metadata_accessors() {
        let mut msg = NlMsg::alloc_size(64);
        msg.set_protocol(NETLINK_ROUTE);
        msg.set_src(SockaddrNl::new(100, 0));
        msg.set_dst(SockaddrNl::kernel());

        assert_eq!(msg.protocol(), NETLINK_ROUTE);
        assert_eq!(msg.src().unwrap().pid, 100);
        assert_eq!(msg.dst(), Some(&SockaddrNl::kernel()));
    }

    #[test]
    fn test_credentials_hidden_until_captured() {
        let mut msg = NlMsg::alloc_size(64);
        assert!(msg.creds().is_none());

        let creds = Ucred { pid: 42, uid: 1000, gid: 1000 };
        msg.set_creds(creds);
        assert_eq!(msg.creds(), Some(&creds));
    }

    #[test]
    fn test_share_counts_owners() {
        let shared = NlMsg::alloc_size(64).share();
        assert_eq!(Rc::strong_count(&shared), 1);

        let other = Rc::clone(&shared);
        other.borrow_mut().append(&[1, 2, 3, 4]).unwrap();
        assert_eq!(Rc::strong_count(&shared), 2);
        assert_eq!(shared.borrow().len(), 20);

        drop(other);
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    trait AsBytesVec {
        fn as_bytes_vec(&self) -> Vec<u8>;
    }

    impl AsBytesVec for NlMsgHdr {
        fn as_bytes_vec(&self) -> Vec<u8> {
            zerocopy::AsBytes::as_bytes(self).to_vec()
        }
    }
}
