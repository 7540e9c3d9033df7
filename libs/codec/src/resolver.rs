//! Message type resolution
//!
//! The dump engine asks a [`MsgTypeResolver`] for a display name and the
//! family header size of a `(protocol, type)` pair. The registry of real
//! families lives outside this crate; [`CacheOpsRegistry`] is a simple
//! in-memory implementation.

use std::collections::HashMap;

/// Resolved description of a message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgTypeInfo<'a> {
    /// Name of the family/operations set, e.g. `route/link`
    pub ops_name: &'a str,
    /// Name of the message type, e.g. `new`
    pub type_name: &'a str,
    /// Family header length preceding the attributes, generic header included
    pub hdr_size: usize,
}

/// Maps a protocol and message type to a display name
pub trait MsgTypeResolver {
    fn resolve(&self, protocol: i32, msg_type: u16) -> Option<MsgTypeInfo<'_>>;
}

/// Resolver that knows no families
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl MsgTypeResolver for NoResolver {
    fn resolve(&self, _protocol: i32, _msg_type: u16) -> Option<MsgTypeInfo<'_>> {
        None
    }
}

/// One family's message types
#[derive(Debug, Clone)]
pub struct CacheOps {
    pub name: String,
    pub protocol: i32,
    pub hdr_size: usize,
    pub msg_types: Vec<(u16, String)>,
}

impl CacheOps {
    pub fn new(name: impl Into<String>, protocol: i32, hdr_size: usize) -> Self {
        Self {
            name: name.into(),
            protocol,
            hdr_size,
            msg_types: Vec::new(),
        }
    }

    pub fn with_type(mut self, msg_type: u16, name: impl Into<String>) -> Self {
        self.msg_types.push((msg_type, name.into()));
        self
    }
}

/// In-memory registry of [`CacheOps`]
#[derive(Debug, Clone, Default)]
pub struct CacheOpsRegistry {
    ops: Vec<CacheOps>,
    index: HashMap<(i32, u16), (usize, usize)>,
}

impl CacheOpsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family; earlier registrations win on conflicting types
    pub fn register(&mut self, ops: CacheOps) -> &mut Self {
        let slot = self.ops.len();
        for (pos, (msg_type, _)) in ops.msg_types.iter().enumerate() {
            self.index.entry((ops.protocol, *msg_type)).or_insert((slot, pos));
        }
        self.ops.push(ops);
        self
    }
}

impl MsgTypeResolver for CacheOpsRegistry {
    fn resolve(&self, protocol: i32, msg_type: u16) -> Option<MsgTypeInfo<'_>> {
        let (slot, pos) = *self.index.get(&(protocol, msg_type))?;
        let ops = &self.ops[slot];
        Some(MsgTypeInfo {
            ops_name: &ops.name,
            type_name: &ops.msg_types[pos].1,
            hdr_size: ops.hdr_size,
        })
    }
}
