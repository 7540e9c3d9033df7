//! Line sinks for message dumps

use tracing::debug;

/// Ordered, write-only destination for dump lines
pub trait DumpSink {
    fn line(&mut self, line: &str);
}

/// Emits each line as a `tracing` debug event on target `netlink::dump`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DumpSink for TracingSink {
    fn line(&mut self, line: &str) {
        debug!(target: "netlink::dump", "{}", line);
    }
}

/// Collects lines in memory
impl DumpSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<S: DumpSink + ?Sized> DumpSink for &mut S {
    fn line(&mut self, line: &str) {
        (**self).line(line);
    }
}
