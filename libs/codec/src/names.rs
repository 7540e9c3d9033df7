//! Display names for header fields

use netlink_types::{
    ControlMsgType, NLM_F_ACK, NLM_F_APPEND, NLM_F_ATOMIC, NLM_F_CREATE, NLM_F_DUMP_FILTERED,
    NLM_F_DUMP_INTR, NLM_F_ECHO, NLM_F_EXCL, NLM_F_MATCH, NLM_F_MULTI, NLM_F_REPLACE,
    NLM_F_REQUEST, NLM_F_ROOT,
};
use nix::errno::Errno;

/// Header flags in the order they are rendered
///
/// Several modifiers share a bit; the first name listed claims it.
const FLAG_NAMES: &[(&str, u16)] = &[
    ("REQUEST", NLM_F_REQUEST),
    ("MULTI", NLM_F_MULTI),
    ("ACK", NLM_F_ACK),
    ("ECHO", NLM_F_ECHO),
    ("DUMP_INTR", NLM_F_DUMP_INTR),
    ("DUMP_FILTERED", NLM_F_DUMP_FILTERED),
    ("ROOT", NLM_F_ROOT),
    ("MATCH", NLM_F_MATCH),
    ("ATOMIC", NLM_F_ATOMIC),
    ("REPLACE", NLM_F_REPLACE),
    ("EXCL", NLM_F_EXCL),
    ("CREATE", NLM_F_CREATE),
    ("APPEND", NLM_F_APPEND),
];

/// Name of a control message type, or its hex value
pub fn msg_type_to_str(msg_type: u16) -> String {
    match ControlMsgType::try_from(msg_type) {
        Ok(ty) => ty.name().to_string(),
        Err(_) => format!("{:#x}", msg_type),
    }
}

/// Comma-separated flag names, unknown bits appended as hex
pub fn msg_flags_to_str(flags: u16) -> String {
    let mut rest = flags;
    let mut names: Vec<String> = Vec::new();

    for &(name, bit) in FLAG_NAMES {
        if rest & bit == 0 {
            continue;
        }
        rest &= !bit;
        names.push(name.to_string());
    }

    if rest != 0 {
        names.push(format!("{:#x}", rest));
    }

    names.join(",")
}

/// Platform description of an errno value
pub fn strerror(errno: i32) -> String {
    if errno == 0 {
        return "Success".to_string();
    }
    match Errno::from_raw(errno) {
        Errno::UnknownErrno => format!("Unknown error {}", errno),
        known => known.desc().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_type_names() {
        assert_eq!(msg_type_to_str(1), "NOOP");
        assert_eq!(msg_type_to_str(2), "ERROR");
        assert_eq!(msg_type_to_str(3), "DONE");
        assert_eq!(msg_type_to_str(4), "OVERRUN");
        assert_eq!(msg_type_to_str(0x12), "0x12");
        assert_eq!(msg_type_to_str(0), "0x0");
    }

    #[test]
    fn test_flags_known_then_unknown() {
        let flags = NLM_F_ACK | NLM_F_REQUEST | 0x4000;
        assert_eq!(msg_flags_to_str(flags), "REQUEST,ACK,0x4000");
    }

    #[test]
    fn test_shared_bits_prefer_get_modifiers() {
        assert_eq!(msg_flags_to_str(NLM_F_CREATE | NLM_F_EXCL), "MATCH,ATOMIC");
        assert_eq!(msg_flags_to_str(NLM_F_APPEND), "APPEND");
        assert_eq!(msg_flags_to_str(0), "");
    }

    #[test]
    fn test_strerror() {
        assert_eq!(strerror(2), "No such file or directory");
        assert_eq!(strerror(0), "Success");
    }
}
