//! Adapters - concrete implementations of the outbound ports plus the
//! inbound HTTP channel.

pub mod http;
pub mod storage;
