//! Network-facing services

pub mod stream_prober;

pub use stream_prober::{EndpointCheck, StreamProber};
