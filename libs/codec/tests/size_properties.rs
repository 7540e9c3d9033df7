//! Property tests for message and attribute size arithmetic

use netlink_codec::layout::{
    align, attr_len, msg_size, nla_attr_size, nla_padlen, nla_total_size, padlen, payload_len,
    total_size, valid_hdr,
};
use netlink_codec::{NlMsgHdr, NLA_ALIGNTO, NLMSG_ALIGNTO, NLMSG_HDRLEN};
use proptest::prelude::*;

proptest! {
    #[test]
    fn total_size_is_aligned_and_covers_payload(n in 0usize..1 << 20) {
        prop_assert_eq!(total_size(n) % NLMSG_ALIGNTO, 0);
        prop_assert!(total_size(n) >= msg_size(n));
        prop_assert!(total_size(n) - msg_size(n) < NLMSG_ALIGNTO);
        prop_assert_eq!(padlen(n), total_size(n) - msg_size(n));
    }

    #[test]
    fn align_is_idempotent(n in 0usize..1 << 20) {
        prop_assert_eq!(align(align(n)), align(n));
    }

    #[test]
    fn attribute_padding_is_below_alignment(n in 0usize..u16::MAX as usize) {
        prop_assert_eq!(nla_total_size(n) % NLA_ALIGNTO, 0);
        prop_assert!(nla_padlen(n) < NLA_ALIGNTO);
        prop_assert_eq!(nla_attr_size(n) + nla_padlen(n), nla_total_size(n));
    }

    #[test]
    fn attribute_region_never_negative(len in 0u32..4096, hdrlen in 0usize..256) {
        let hdr = NlMsgHdr::new(len, 0, 0, 0, 0);
        let region = attr_len(&hdr, hdrlen);

        prop_assert!(region <= payload_len(&hdr));
        if valid_hdr(&hdr, hdrlen) {
            prop_assert_eq!(region, len as usize - NLMSG_HDRLEN - align(hdrlen));
        }
    }
}
