pub mod channel;
pub mod probe;

pub use channel::{ChannelRecord, GroupTag, RawChannel, UNKNOWN_NAME};
pub use probe::{ProbeResult, ProbeStatus, ProbeSummary};
