//! # Message Dump Engine
//!
//! ## Purpose
//!
//! Renders a netlink message as a human-readable trace for debugging live
//! traffic. The dump walks the header, the generic netlink sub-header when
//! the protocol carries one, any leading family payload, the attribute tree
//! and, for `NLMSG_ERROR` replies, the embedded header of the failed request.
//!
//! ## Output
//!
//! ```text
//! --------------------------   BEGIN NETLINK MESSAGE ---------------------------
//!   [NETLINK HEADER] 16 octets
//!     .nlmsg_len = 36
//!     .type = 16 <route/link::new>
//!     .flags = 5 <REQUEST,ACK>
//!     .seq = 1
//!     .port = 0
//!   [ATTR 03] 3 octets
//!     6c 6f 00                                        lo.
//!   [PADDING] 1 octets
//!     00                                              .
//! ---------------------------  END NETLINK MESSAGE   ---------------------------
//! ```
//!
//! ## Failure Model
//!
//! Dumping never fails. Sections whose bytes are missing are skipped, and a
//! malformed attribute stream ends with a `[LEFTOVER]` line.

use std::fmt::Write;

use netlink_types::{
    GenlMsgHdr, NlMsgErr, NlMsgHdr, GENL_HDRLEN, NETLINK_GENERIC, NLMSG_ERROR, NLMSG_HDRLEN,
};
use tracing::debug;
use zerocopy::FromBytes;

use crate::attr::{AttrIter, AttrKind};
use crate::layout::{align, payload_len};
use crate::msg::NlMsg;
use crate::names::{msg_flags_to_str, msg_type_to_str, strerror};
use crate::resolver::{MsgTypeInfo, MsgTypeResolver, NoResolver};
use crate::sink::{DumpSink, TracingSink};

const BEGIN_BANNER: &str =
    "--------------------------   BEGIN NETLINK MESSAGE ---------------------------";
const END_BANNER: &str =
    "---------------------------  END NETLINK MESSAGE   ---------------------------";

/// Bytes per hex line at depth zero
const HEX_LINE_WIDTH: usize = 16;

/// Dump a message through `tracing` at debug level
pub fn nl_msg_dump(msg: &NlMsg, resolver: &dyn MsgTypeResolver) {
    let mut sink = TracingSink;
    MsgDumper::new(&mut sink, resolver).dump(msg);
}

/// Dump a message into a vector of lines without resolving family names
pub fn dump_to_lines(msg: &NlMsg) -> Vec<String> {
    let mut lines = Vec::new();
    MsgDumper::new(&mut lines, &NoResolver).dump(msg);
    lines
}

/// Writes the trace of one message into a [`DumpSink`]
pub struct MsgDumper<'a, S: DumpSink + ?Sized> {
    sink: &'a mut S,
    resolver: &'a dyn MsgTypeResolver,
}

impl<'a, S: DumpSink + ?Sized> MsgDumper<'a, S> {
    pub fn new(sink: &'a mut S, resolver: &'a dyn MsgTypeResolver) -> Self {
        Self { sink, resolver }
    }

    fn emit(&mut self, line: &str) {
        self.sink.line(line);
    }

    /// Full trace of a message, framed by banner lines
    pub fn dump(&mut self, msg: &NlMsg) {
        let hdr = *msg.hdr();

        self.emit(BEGIN_BANNER);
        self.emit(&format!("  [NETLINK HEADER] {} octets", NlMsgHdr::SIZE));
        self.print_hdr(msg.protocol(), &hdr);

        if hdr.msg_type() == NLMSG_ERROR {
            self.dump_error_msg(msg);
        } else if payload_len(&hdr) > 0 {
            self.print_msg(msg);
        }

        self.emit(END_BANNER);
    }

    /// Hex and ASCII columns, `16 - 2 * depth` bytes per line
    pub fn dump_hex(&mut self, bytes: &[u8], depth: usize) {
        let limit = HEX_LINE_WIDTH.saturating_sub(2 * depth).max(1);
        let prefix = "  ".repeat(depth);

        for chunk in bytes.chunks(limit) {
            let mut hex = String::with_capacity(limit * 3);
            for byte in chunk {
                let _ = write!(hex, "{:02x} ", byte);
            }
            let ascii: String = chunk
                .iter()
                .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
                .collect();

            self.emit(&format!(
                "{}    {:<width$}{}",
                prefix,
                hex,
                ascii,
                width = limit * 3
            ));
        }
    }

    /// Scalar fields of a netlink header
    pub fn print_hdr(&mut self, protocol: i32, hdr: &NlMsgHdr) {
        let msg_type = hdr.msg_type();
        let type_name = match self.resolver.resolve(protocol, msg_type) {
            Some(info) => format!("{}::{}", info.ops_name, info.type_name),
            None => msg_type_to_str(msg_type),
        };

        self.emit(&format!("    .nlmsg_len = {}", hdr.len()));
        self.emit(&format!("    .type = {} <{}>", msg_type, type_name));
        self.emit(&format!(
            "    .flags = {} <{}>",
            hdr.flags(),
            msg_flags_to_str(hdr.flags())
        ));
        self.emit(&format!("    .seq = {}", hdr.seq()));
        self.emit(&format!("    .port = {}", hdr.pid()));
    }

    fn print_genl_hdr(&mut self, ghdr: &GenlMsgHdr) {
        self.emit(&format!("  [GENERIC NETLINK HEADER] {} octets", GENL_HDRLEN));
        self.emit(&format!("    .cmd = {}", ghdr.cmd));
        self.emit(&format!("    .version = {}", ghdr.version));
        self.emit(&format!("    .unused = {}", ghdr.reserved()));
    }

    /// Generic header plus any family header behind it
    ///
    /// Returns the payload offset past what was printed and shrinks
    /// `payloadlen` accordingly. Prints nothing if the payload is shorter
    /// than the generic header.
    fn print_genl_msg(
        &mut self,
        payload: &[u8],
        info: Option<MsgTypeInfo<'_>>,
        payloadlen: &mut usize,
    ) -> usize {
        if *payloadlen < GENL_HDRLEN {
            return 0;
        }
        let ghdr = match GenlMsgHdr::ref_from_prefix(payload) {
            Some(ghdr) => ghdr,
            None => return 0,
        };

        self.print_genl_hdr(ghdr);
        *payloadlen -= GENL_HDRLEN;
        let mut offset = GENL_HDRLEN;

        if let Some(info) = info {
            let hdrsize = info.hdr_size.saturating_sub(GENL_HDRLEN);
            if hdrsize > 0 {
                if *payloadlen < hdrsize {
                    return offset;
                }
                self.emit(&format!("  [HEADER] {} octets", hdrsize));
                self.dump_hex(&payload[offset..offset + hdrsize], 0);
                *payloadlen -= hdrsize;
                offset += hdrsize;
            }
        }

        offset
    }

    /// Payload of a non-error message: sub-headers, raw payload, attributes
    pub fn print_msg(&mut self, msg: &NlMsg) {
        let hdr = *msg.hdr();
        let payload = msg.data();
        let resolver = self.resolver;
        let info = resolver.resolve(msg.protocol(), hdr.msg_type());

        let mut payloadlen = payload.len();
        let mut attrlen = 0;
        if let Some(info) = info {
            attrlen = payload.len().saturating_sub(align(info.hdr_size));
            payloadlen -= attrlen;
        }

        let mut offset = 0;
        if msg.protocol() == NETLINK_GENERIC {
            offset = self.print_genl_msg(payload, info, &mut payloadlen);
        }

        if payloadlen > 0 {
            self.emit(&format!("  [PAYLOAD] {} octets", payloadlen));
            let raw = payload.get(offset..offset + payloadlen).unwrap_or(&[]);
            self.dump_hex(raw, 0);
        }

        if attrlen > 0 {
            let start = payload.len() - attrlen;
            self.dump_attrs(&payload[start..], 0);
        }
    }

    /// Attribute stream, recursing into nested attributes
    pub fn dump_attrs(&mut self, data: &[u8], depth: usize) {
        let prefix = "  ".repeat(depth);
        let mut attrs = AttrIter::new(data);

        while let Some(next) = attrs.next() {
            let attr = match next {
                Ok(attr) => attr,
                Err(err) => {
                    debug!("Attribute dump stopped: {}", err);
                    break;
                }
            };

            let alen = attr.len();
            match attr.kind() {
                AttrKind::Padding => {
                    self.emit(&format!("{}  [ATTR PADDING] {} octets", prefix, alen));
                    self.dump_hex(attr.payload(), depth);
                }
                AttrKind::Leaf => {
                    self.emit(&format!("{}  [ATTR {:02}] {} octets", prefix, attr.attr_type(), alen));
                    self.dump_hex(attr.payload(), depth);
                }
                AttrKind::Nested => {
                    self.emit(&format!(
                        "{}  [ATTR {:02} NESTED] {} octets",
                        prefix,
                        attr.attr_type(),
                        alen
                    ));
                    self.dump_attrs(attr.payload(), depth + 1);
                }
            }

            let padding = attr.padding();
            if !padding.is_empty() {
                self.emit(&format!("{}  [PADDING] {} octets", prefix, padding.len()));
                self.dump_hex(padding, depth);
            }
        }

        if attrs.remaining() > 0 {
            self.emit(&format!("{}  [LEFTOVER] {} octets", prefix, attrs.remaining()));
        }
    }

    /// Error code and the header of the request that failed
    pub fn dump_error_msg(&mut self, msg: &NlMsg) {
        self.emit(&format!("  [ERRORMSG] {} octets", NlMsgErr::SIZE));

        let err = match NlMsgErr::read_from_prefix(msg.data()) {
            Some(err) => err,
            None => return,
        };

        self.emit(&format!(
            "    .error = {} \"{}\"",
            err.error(),
            strerror(err.error().wrapping_neg())
        ));
        self.emit(&format!("  [ORIGINAL MESSAGE] {} octets", NLMSG_HDRLEN));
        self.print_hdr(msg.protocol(), err.original());
    }
}
