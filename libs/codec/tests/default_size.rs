//! Process-wide default capacity
//!
//! Kept in its own test binary: the default is global state and the other
//! suites allocate with it.

use netlink_codec::{default_size, page_size, set_default_size, MsgConfig, NlMsg, NLMSG_HDRLEN};

#[test_log::test]
fn test_default_capacity_updates() {
    assert_eq!(default_size(), page_size());
    assert_eq!(NlMsg::alloc().max_size(), page_size());

    set_default_size(1024);
    assert_eq!(NlMsg::alloc().max_size(), 1024);
    assert_eq!(NlMsg::alloc_simple(16, 0).max_size(), 1024);

    // Raised to an empty message
    set_default_size(3);
    assert_eq!(default_size(), NLMSG_HDRLEN);
    assert_eq!(NlMsg::alloc().max_size(), NLMSG_HDRLEN);

    MsgConfig::new(2048).install();
    assert_eq!(NlMsg::inherit(None).max_size(), 2048);

    // Explicit configuration ignores the global
    assert_eq!(NlMsg::alloc_with(&MsgConfig::new(64)).max_size(), 64);

    set_default_size(page_size());
}
